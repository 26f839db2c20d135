//! Margin command implementation
//!
//! Runs the bank margin analysis, optionally with coupon and volatility
//! sensitivity sweeps.

use pricer_pricing::mc::PathSimulator;
use pricer_risk::margin::{BankMarginAnalysis, BankMarginAnalyzer};
use pricer_risk::scenarios::MarginScenario;
use pricer_risk::sensitivity::{coupon_sensitivity, volatility_sensitivity, SensitivityPoint};
use serde::Serialize;
use tracing::info;

use super::{emit_json, row, rule, separator, OutputFormat, RunArgs};
use crate::config::DealFile;
use crate::Result;

const COUPON_GRID_STEPS: usize = 10;
const VOLATILITY_FACTORS: [f64; 5] = [0.5, 0.75, 1.0, 1.25, 1.5];

#[derive(Debug, Serialize)]
struct Sensitivities {
    coupon: Vec<SensitivityPoint>,
    volatility: Vec<SensitivityPoint>,
}

#[derive(Debug, Serialize)]
struct MarginReport {
    #[serde(flatten)]
    analysis: BankMarginAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    sensitivities: Option<Sensitivities>,
}

/// Run the margin command
pub fn run(deal: &DealFile, args: &RunArgs, scenarios: bool, sensitivity: bool) -> Result<()> {
    let underlyings = deal.underlyings()?;
    let model = deal.model()?;
    let config = deal.simulation_config(args.coupon)?;
    let mc = deal.monte_carlo(args.paths, args.seed)?;

    info!(deal = %args.deal.display(), scenarios, sensitivity, "Analysing bank margin");
    let analysis = BankMarginAnalyzer::new(&underlyings, &model, &config, &mc)
        .with_cost_model(deal.cost_model.clone())
        .with_benchmark(deal.benchmark.clone())
        .with_solver_settings(deal.solver.clone())
        .with_scenarios(if scenarios {
            MarginScenario::presets()
        } else {
            Vec::new()
        })
        .analyse()?;

    let sensitivities = if sensitivity {
        let settings = &deal.solver;
        let ensemble = PathSimulator::new(&underlyings, &model, &config, &mc)?
            .presimulate(settings.validation_paths, settings.validation_seed())?;
        let step = (settings.upper_bound - settings.lower_bound) / COUPON_GRID_STEPS as f64;
        let grid: Vec<f64> = (0..=COUPON_GRID_STEPS)
            .map(|i| settings.lower_bound + step * i as f64)
            .collect();
        Some(Sensitivities {
            coupon: coupon_sensitivity(&ensemble, &grid, config.principal())?,
            volatility: volatility_sensitivity(&underlyings, &model, &config, &mc, &VOLATILITY_FACTORS)?,
        })
    } else {
        None
    };

    let report = MarginReport {
        analysis,
        sensitivities,
    };
    match args.format {
        OutputFormat::Json => emit_json(&report, args.output.as_ref()),
        OutputFormat::Table => {
            print_table(&report);
            Ok(())
        }
    }
}

fn pct(x: f64) -> String {
    format!("{:.2}%", x * 100.0)
}

fn print_table(report: &MarginReport) {
    let a = &report.analysis;
    rule(true);
    row("Offered coupon / period", pct(a.offered_coupon));
    row("Offered coupon / year", pct(a.offered_coupon_annual));
    row(
        "Fair coupon / period",
        if a.solver.converged {
            pct(a.fair_coupon)
        } else {
            format!("{} (unconverged)", pct(a.fair_coupon))
        },
    );
    row("Spread / period", pct(a.spread));
    row("Benchmark / year", pct(a.benchmark_rate));
    row("Competitiveness", a.competitiveness.label());
    separator();
    row("Principal", format!("{:.2}", a.principal));
    row("Market price", format!("{:.2}", a.market_price));
    row("Gross margin", format!("{:.2} ({})", a.margin_absolute, pct(a.margin_pct)));
    if let Some(annual) = a.margin_annualised {
        row("Gross margin / year", pct(annual));
    }
    row("Operational cost", format!("{:.2}", a.costs.operational));
    row("Risk buffer", format!("{:.2}", a.costs.risk_buffer));
    row("Capital cost", format!("{:.2}", a.costs.capital));
    row("Net margin", format!("{:.2}", a.net_margin));
    row("Status", a.status.label());
    separator();
    row("Expected loss", format!("{:.2}", a.capital.expected_loss));
    row(
        &format!("VaR {}", pct(a.capital.confidence_level)),
        format!("{:.2}", a.capital.value_at_risk),
    );
    row("Expected shortfall", format!("{:.2}", a.capital.expected_shortfall));
    row(
        "Regulatory capital",
        if a.capital.floor_binding {
            format!("{:.2} (floor)", a.capital.regulatory_capital)
        } else {
            format!("{:.2}", a.capital.regulatory_capital)
        },
    );
    row("RAROC", pct(a.raroc));
    if let Some(breakeven) = a.breakeven_coupon {
        row("Breakeven coupon / period", pct(breakeven));
    }
    if !a.scenarios.is_empty() {
        separator();
        for scenario in &a.scenarios {
            row(&scenario.name, format!("{:.2} ({})", scenario.margin, pct(scenario.margin_pct)));
        }
        if let Some(vol) = a.margin_volatility {
            row("Margin volatility", format!("{:.2}", vol));
        }
    }
    if let Some(sens) = &report.sensitivities {
        separator();
        for point in &sens.coupon {
            row(&format!("Coupon {}", pct(point.input)), format!("{:.2}", point.margin));
        }
        for point in &sens.volatility {
            row(&format!("Volatility x{:.2}", point.input), format!("{:.2}", point.margin));
        }
    }
    rule(false);
}
