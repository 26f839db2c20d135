//! End-to-end bank margin analysis on a four-stock basket.
//!
//! # Test Categories
//!
//! 1. **Zero coupon**: every path is a gain for the bank, capital sits at the floor
//! 2. **Rich coupon**: the bank loses money and the labels say so
//! 3. **Scenarios**: preset sweep ordering and margin volatility

use approx::assert_relative_eq;
use pricer_core::market_data::curves::CurveEnum;
use pricer_models::instruments::SimulationConfig;
use pricer_models::models::{CorrelationMatrix, DccGarchModel, DccParams, GarchParams};
use pricer_models::underlying::UnderlyingSpec;
use pricer_optimiser::fair_coupon::FairCouponSettings;
use pricer_pricing::mc::MonteCarloConfig;
use pricer_risk::margin::{BankMarginAnalyzer, Competitiveness, MarginStatus};
use pricer_risk::scenarios::MarginScenario;

// ============================================================================
// Fixtures
// ============================================================================

fn basket() -> Vec<UnderlyingSpec> {
    vec![
        UnderlyingSpec::new("AMZN", 180.0, false, 0.0).unwrap(),
        UnderlyingSpec::new("AAPL", 190.0, true, 0.005).unwrap(),
        UnderlyingSpec::new("GOOGL", 170.0, true, 0.004).unwrap(),
        UnderlyingSpec::new("META", 480.0, true, 0.004).unwrap(),
    ]
}

fn model() -> DccGarchModel {
    let garch = GarchParams::new(3e-6, 0.07, 0.91, 0.0, 3.5e-4)
        .unwrap()
        .with_student_t(6.0)
        .unwrap();
    let mut rows = vec![vec![0.5; 4]; 4];
    for (i, row) in rows.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    let dcc = DccParams::new(0.02, 0.95, CorrelationMatrix::from_rows(&rows).unwrap()).unwrap();
    DccGarchModel::new(vec![garch; 4], dcc, None).unwrap()
}

fn deal(coupon: f64) -> SimulationConfig {
    SimulationConfig::builder()
        .coupons(vec![coupon; 4])
        .spacing_days(126)
        .horizon_days(504)
        .principal(10_000.0)
        .domestic_curve(CurveEnum::flat(0.11))
        .foreign_curve(CurveEnum::flat(0.045))
        .fx_spot(5.45)
        .build()
        .unwrap()
}

fn mc() -> MonteCarloConfig {
    MonteCarloConfig::builder().n_paths(500).seed(99).build().unwrap()
}

fn solver() -> FairCouponSettings {
    FairCouponSettings {
        exploration_paths: 400,
        validation_paths: 1_000,
        max_evaluations: 400,
        seed: 7,
        ..Default::default()
    }
}

// ============================================================================
// Zero coupon
// ============================================================================

#[test]
fn test_zero_coupon_note_is_pure_margin() {
    let (underlyings, model, deal, mc) = (basket(), model(), deal(0.0), mc());
    let analysis = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
        .with_solver_settings(solver())
        .with_scenarios(Vec::new())
        .analyse()
        .unwrap();

    // Discounting alone keeps every present value under par
    assert!(analysis.market_price < 10_000.0);
    assert!(analysis.margin_absolute > 0.0);
    assert_eq!(analysis.capital.value_at_risk, 0.0);
    assert_eq!(analysis.capital.expected_loss, 0.0);
    assert!(analysis.capital.floor_binding);
    assert_relative_eq!(analysis.capital.regulatory_capital, 300.0, epsilon = 1e-9);

    // Two-year horizon
    assert_relative_eq!(analysis.costs.operational, 100.0, epsilon = 1e-9);
    assert_relative_eq!(analysis.costs.risk_buffer, 100.0, epsilon = 1e-9);
    assert_relative_eq!(analysis.costs.capital, 36.0, epsilon = 1e-9);

    assert!(analysis.fair_coupon > 0.0);
    assert!(analysis.spread > 0.0);
    assert_eq!(analysis.competitiveness, Competitiveness::BelowMarket);
    assert!(analysis.breakeven_coupon.unwrap() > 0.0);

    let exercised: f64 = analysis.exercise_probabilities.iter().sum();
    assert_relative_eq!(exercised + analysis.maturity_probability, 1.0, epsilon = 1e-12);
}

// ============================================================================
// Rich coupon
// ============================================================================

#[test]
fn test_rich_coupon_loses_money() {
    let (underlyings, model, deal, mc) = (basket(), model(), deal(0.40), mc());
    let analysis = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
        .with_solver_settings(solver())
        .with_scenarios(Vec::new())
        .analyse()
        .unwrap();

    assert!(analysis.offered_coupon > analysis.fair_coupon);
    assert!(analysis.net_margin < 0.0);
    assert_eq!(analysis.status, MarginStatus::Negative);
    assert!(analysis.raroc < 0.0);
    assert_eq!(analysis.competitiveness, Competitiveness::Attractive);
    assert!(analysis.breakeven_coupon.unwrap() < 0.40);
    assert!(analysis.capital.expected_shortfall >= analysis.capital.value_at_risk);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_preset_scenarios() {
    let (underlyings, model, deal, mc) = (basket(), model(), deal(0.05), mc());
    let analysis = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
        .with_solver_settings(solver())
        .analyse()
        .unwrap();

    let names: Vec<&str> = analysis.scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Base", "Stress", "Optimistic", "Domestic +100bp", "Domestic -100bp"]
    );

    let base = &analysis.scenarios[0];
    assert_eq!(base.scenario, MarginScenario::Base);
    assert_relative_eq!(base.price, analysis.market_price, epsilon = 1e-9);

    // Same paths, heavier discounting
    assert!(analysis.scenarios[3].margin > base.margin);
    assert!(analysis.scenarios[4].margin < base.margin);

    let stress = analysis.scenarios[1].margin;
    let optimistic = analysis.scenarios[2].margin;
    assert_relative_eq!(
        analysis.margin_volatility.unwrap(),
        (stress - optimistic).abs() / 2.0,
        epsilon = 1e-12
    );
}
