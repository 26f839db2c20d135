//! Price command implementation
//!
//! Runs the full Monte Carlo at the deal's coupon schedule and reports the
//! payoff distribution.

use chrono::NaiveDate;
use pricer_pricing::autocall::DiscountMode;
use pricer_pricing::mc::{DetailedTraces, PathSimulator};
use serde::Serialize;
use tracing::info;

use super::{emit_json, row, rule, separator, OutputFormat, RunArgs};
use crate::config::DealFile;
use crate::Result;

/// Serialisable summary of a pricing run.
#[derive(Debug, Serialize)]
pub struct PriceReport {
    symbols: Vec<String>,
    pricing_date: Option<NaiveDate>,
    observation_dates: Option<Vec<NaiveDate>>,
    principal: f64,
    coupons: Vec<f64>,
    fx_spot: f64,
    fx_spot_estimated: bool,
    discount_mode: DiscountMode,
    n_paths: usize,
    seed: u64,
    price: f64,
    price_pct: f64,
    std_error: f64,
    mean_nominal_payoff: f64,
    exercise_probabilities: Vec<f64>,
    survival_probabilities: Vec<f64>,
    maturity_probability: f64,
    expected_life_years: f64,
    degenerate_steps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    traces: Option<DetailedTraces>,
}

/// Run the price command
pub fn run(deal: &DealFile, args: &RunArgs) -> Result<()> {
    let underlyings = deal.underlyings()?;
    let model = deal.model()?;
    let config = deal.simulation_config(args.coupon)?;
    let mc = deal.monte_carlo(args.paths, args.seed)?;

    info!(deal = %args.deal.display(), n_paths = mc.n_paths(), "Pricing autocall");
    let simulator = PathSimulator::new(&underlyings, &model, &config, &mc)?;
    let result = simulator.simulate();
    let distribution = &result.distribution;

    let report = PriceReport {
        symbols: underlyings.iter().map(|u| u.symbol.clone()).collect(),
        pricing_date: config.pricing_date(),
        observation_dates: config.observation_dates(),
        principal: config.principal(),
        coupons: config.coupons().to_vec(),
        fx_spot: config.fx_spot(),
        fx_spot_estimated: config.fx_spot_estimated(),
        discount_mode: mc.discount_mode(),
        n_paths: mc.n_paths(),
        seed: mc.seed(),
        price: result.price(),
        price_pct: result.price() / config.principal(),
        std_error: distribution.present_value_std_error(),
        mean_nominal_payoff: distribution.mean_nominal_payoff(),
        exercise_probabilities: distribution.exercise_probabilities(),
        survival_probabilities: distribution.survival_probabilities(),
        maturity_probability: distribution.maturity_probability(),
        expected_life_years: distribution.expected_life_years(),
        degenerate_steps: distribution.degenerate_steps(),
        traces: result.detailed.clone(),
    };

    match args.format {
        OutputFormat::Json => emit_json(&report, args.output.as_ref()),
        OutputFormat::Table => {
            print_table(&report);
            Ok(())
        }
    }
}

fn print_table(report: &PriceReport) {
    rule(true);
    row("Basket", report.symbols.join("/"));
    row("Principal", format!("{:.2}", report.principal));
    row(
        "FX spot",
        if report.fx_spot_estimated {
            format!("{:.4} (est.)", report.fx_spot)
        } else {
            format!("{:.4}", report.fx_spot)
        },
    );
    row("Paths", report.n_paths);
    separator();
    row("Price", format!("{:.2}", report.price));
    row("Price / principal", format!("{:.4}%", report.price_pct * 100.0));
    row("Std error", format!("{:.4}", report.std_error));
    row("Mean nominal payoff", format!("{:.2}", report.mean_nominal_payoff));
    row("Expected life (years)", format!("{:.3}", report.expected_life_years));
    separator();
    for (k, p) in report.exercise_probabilities.iter().enumerate() {
        row(&format!("Call at observation {}", k + 1), format!("{:.2}%", p * 100.0));
    }
    row("Held to maturity", format!("{:.2}%", report.maturity_probability * 100.0));
    if report.degenerate_steps > 0 {
        row("Degenerate correlation steps", report.degenerate_steps);
    }
    rule(false);

    if let Some(traces) = &report.traces {
        for (index, trace) in &traces.paths {
            println!("\nPath {index}");
            for line in &trace.timeline {
                println!("  {line}");
            }
        }
    }
}
