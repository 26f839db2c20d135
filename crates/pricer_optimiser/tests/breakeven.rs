//! Fair-coupon search against simulated ensembles.

use approx::assert_relative_eq;
use pricer_core::market_data::curves::CurveEnum;
use pricer_models::instruments::SimulationConfig;
use pricer_models::models::{CorrelationMatrix, DccGarchModel, DccParams, GarchParams};
use pricer_models::underlying::UnderlyingSpec;
use pricer_optimiser::fair_coupon::{FairCouponSettings, FairCouponSolver};
use pricer_pricing::mc::{MonteCarloConfig, PathSimulator};
use pricer_pricing::presim::calculate_price_from_presimulated;

fn setup() -> (Vec<UnderlyingSpec>, DccGarchModel, SimulationConfig) {
    let underlyings = vec![
        UnderlyingSpec::new("AMZN", 180.0, false, 0.0).unwrap(),
        UnderlyingSpec::new("AAPL", 190.0, true, 0.005).unwrap(),
        UnderlyingSpec::new("GOOGL", 170.0, true, 0.004).unwrap(),
        UnderlyingSpec::new("META", 480.0, true, 0.004).unwrap(),
    ];
    let garch = GarchParams::new(3e-6, 0.07, 0.91, 0.0, 3.5e-4)
        .unwrap()
        .with_student_t(6.0)
        .unwrap();
    let mut rows = vec![vec![0.55; 4]; 4];
    for (i, row) in rows.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    let dcc = DccParams::new(0.02, 0.95, CorrelationMatrix::from_rows(&rows).unwrap()).unwrap();
    let model = DccGarchModel::new(vec![garch; 4], dcc, None).unwrap();
    let deal = SimulationConfig::builder()
        .coupons(vec![0.0; 4])
        .spacing_days(126)
        .horizon_days(504)
        .principal(10_000.0)
        .domestic_curve(CurveEnum::flat(0.11))
        .foreign_curve(CurveEnum::flat(0.045))
        .fx_spot(5.4)
        .build()
        .unwrap();
    (underlyings, model, deal)
}

fn settings() -> FairCouponSettings {
    FairCouponSettings {
        exploration_paths: 500,
        validation_paths: 2_000,
        seed: 2024,
        ..Default::default()
    }
}

#[test]
fn test_breakeven_coupon_prices_at_par() {
    let (underlyings, model, deal) = setup();
    let mc = MonteCarloConfig::builder().n_paths(1).build().unwrap();
    let simulator = PathSimulator::new(&underlyings, &model, &deal, &mc).unwrap();

    let solver = FairCouponSolver::new(settings()).unwrap();
    let result = solver.solve(&simulator, deal.principal()).unwrap();

    assert!(result.converged);
    assert!(result.fair_coupon > 0.0 && result.fair_coupon < 0.5);
    assert_relative_eq!(result.price, deal.principal(), max_relative = 1e-3);
    assert!(result.evaluations <= 2_002);
}

#[test]
fn test_fair_coupon_reprices_on_validation_ensemble() {
    let (underlyings, model, deal) = setup();
    let mc = MonteCarloConfig::builder().n_paths(1).build().unwrap();
    let simulator = PathSimulator::new(&underlyings, &model, &deal, &mc).unwrap();
    let settings = settings();

    let validation = simulator
        .presimulate(settings.validation_paths, settings.validation_seed())
        .unwrap();
    let result = FairCouponSolver::new(settings).unwrap().solve(&simulator, 10_000.0).unwrap();

    let repriced =
        calculate_price_from_presimulated(&validation, &[result.fair_coupon; 4], 10_000.0).unwrap();
    assert_relative_eq!(repriced, result.price, max_relative = 1e-12);
}

#[test]
fn test_full_simulation_at_fair_coupon_is_near_par() {
    let (underlyings, model, deal) = setup();
    let mc = MonteCarloConfig::builder().n_paths(1).build().unwrap();
    let simulator = PathSimulator::new(&underlyings, &model, &deal, &mc).unwrap();
    let result = FairCouponSolver::new(settings()).unwrap().solve(&simulator, 10_000.0).unwrap();

    let priced_deal = deal.with_flat_coupon(result.fair_coupon).unwrap();
    let full_mc = MonteCarloConfig::builder().n_paths(4_000).seed(99).build().unwrap();
    let full = PathSimulator::new(&underlyings, &model, &priced_deal, &full_mc)
        .unwrap()
        .simulate();

    assert_relative_eq!(full.price(), 10_000.0, max_relative = 0.05);
}
