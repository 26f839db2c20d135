//! Monte Carlo engine for the autocall note.
//!
//! # Architecture
//!
//! ```text
//! PathSimulator
//! ├── MonteCarloConfig   (paths, seed, traces, discount mode)
//! ├── DccGarchModel      (per-asset GARCH, DCC overlay, innovations)
//! ├── SimulationConfig   (coupons, schedule, curves, FX spot)
//! └── per path
//!     ├── PricerRng           (seed + path index)
//!     ├── AutocallLifecycle   (Alive → Exercised | Matured)
//!     └── CashFlowDiscounter  (present-value factor per observation)
//! ```
//!
//! [`PathSimulator::simulate`] returns a [`SimulationResult`];
//! [`PathSimulator::presimulate`] keeps only the exercise timing for
//! repricing under other coupon schedules.

mod config;
mod error;
mod result;
mod simulator;

pub use config::{
    MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_SEED, MAX_PATHS,
};
pub use error::{ConfigError, SimulationError};
pub use result::{DetailedTraces, PathOutcome, PathTrace, PayoffDistribution, SimulationResult};
pub use simulator::PathSimulator;
