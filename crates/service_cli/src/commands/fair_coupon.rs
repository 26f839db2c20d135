//! Fair-coupon command implementation
//!
//! Searches the flat coupon that prices the note at par (or a given target).

use pricer_optimiser::fair_coupon::{FairCouponResult, FairCouponSolver};
use pricer_pricing::mc::PathSimulator;
use serde::Serialize;
use tracing::info;

use super::{emit_json, row, rule, separator, OutputFormat, RunArgs};
use crate::config::DealFile;
use crate::Result;

#[derive(Debug, Serialize)]
struct FairCouponReport {
    principal: f64,
    periods_per_year: f64,
    fair_coupon_annual: f64,
    #[serde(flatten)]
    result: FairCouponResult,
}

/// Run the fair-coupon command
pub fn run(deal: &DealFile, args: &RunArgs, target: Option<f64>) -> Result<()> {
    let underlyings = deal.underlyings()?;
    let model = deal.model()?;
    let config = deal.simulation_config(args.coupon)?;
    let mc = deal.monte_carlo(args.paths, args.seed)?;

    let mut settings = deal.solver.clone();
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    let solver = FairCouponSolver::new(settings)?;
    let target = target.unwrap_or(config.principal());

    info!(deal = %args.deal.display(), target, "Solving fair coupon");
    let simulator = PathSimulator::new(&underlyings, &model, &config, &mc)?;
    let result = solver.solve(&simulator, target)?;

    let report = FairCouponReport {
        principal: config.principal(),
        periods_per_year: config.periods_per_year(),
        fair_coupon_annual: result.fair_coupon * config.periods_per_year(),
        result,
    };

    match args.format {
        OutputFormat::Json => emit_json(&report, args.output.as_ref()),
        OutputFormat::Table => {
            let r = &report.result;
            rule(true);
            row("Target", format!("{:.2}", r.target));
            row("Fair coupon / period", format!("{:.4}%", r.fair_coupon * 100.0));
            row("Fair coupon / year", format!("{:.4}%", report.fair_coupon_annual * 100.0));
            separator();
            row("Validated price", format!("{:.2}", r.price));
            row("Relative error", format!("{:.2e}", r.relative_error));
            row("Evaluations (fast/precise)", format!("{}/{}", r.fast_evaluations, r.precise_evaluations));
            row("Source", format!("{:?}", r.source));
            row("Status", if r.converged { "Converged" } else { "Not converged" });
            rule(false);
            Ok(())
        }
    }
}
