//! # Pricer Pricing (Layer 3: Monte Carlo Engine)
//!
//! DCC-GARCH Monte Carlo simulation of the four-underlying autocall note:
//!
//! - [`mc`]: Path simulator, configuration and payoff distribution
//! - [`autocall`]: Observation state machine and dual-currency discounting
//! - [`presim`]: Coupon-independent timing ensembles for fast repricing
//! - [`rng`]: Seeded per-path generators and innovation samplers
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::market_data::curves::CurveEnum;
//! use pricer_models::instruments::SimulationConfig;
//! use pricer_models::models::{DccGarchModel, GarchParams};
//! use pricer_models::underlying::UnderlyingSpec;
//! use pricer_pricing::mc::{MonteCarloConfig, PathSimulator};
//! use pricer_pricing::presim::calculate_price_from_presimulated;
//!
//! let underlyings: Vec<UnderlyingSpec> = ["A", "B", "C", "D"]
//!     .iter()
//!     .map(|s| UnderlyingSpec::new(*s, 100.0, false, 0.0).unwrap())
//!     .collect();
//! let garch = GarchParams::new(1e-6, 0.05, 0.9, 0.0, 1e-4).unwrap();
//! let model = DccGarchModel::uncorrelated(vec![garch; 4]).unwrap();
//! let deal = SimulationConfig::builder()
//!     .coupons(vec![0.05; 2])
//!     .spacing_days(126)
//!     .horizon_days(252)
//!     .principal(1000.0)
//!     .domestic_curve(CurveEnum::flat(0.10))
//!     .foreign_curve(CurveEnum::flat(0.05))
//!     .fx_spot(5.0)
//!     .build()
//!     .unwrap();
//! let mc = MonteCarloConfig::builder().n_paths(100).seed(42).build().unwrap();
//!
//! let simulator = PathSimulator::new(&underlyings, &model, &deal, &mc).unwrap();
//! let price = simulator.simulate().price();
//!
//! let ensemble = simulator.presimulate(100, 42).unwrap();
//! let repriced = calculate_price_from_presimulated(&ensemble, deal.coupons(), 1000.0).unwrap();
//! assert!((price - repriced).abs() < 1e-9 * price);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod autocall;
pub mod mc;
pub mod presim;
pub mod rng;
