//! # Pricer Risk (L4: Application)
//!
//! Bank margin economics of the autocall note.
//!
//! The issuing bank receives the principal and hedges the note's present
//! value. This crate turns the payoff distribution into a margin
//! decomposition:
//!
//! - [`margin::CostModel`] / [`margin::BenchmarkConfig`]: operating costs,
//!   capital parameters and the market reference coupon
//! - [`margin::CapitalMetrics`]: expected loss, VaR, expected shortfall,
//!   unexpected loss and regulatory capital from per-path margins
//! - [`margin::BankMarginAnalyzer`]: fair coupon, gross and net margin,
//!   RAROC, breakeven coupon and competitiveness
//! - [`scenarios`]: volatility and domestic-rate shocks
//! - [`sensitivity`]: coupon and volatility sweeps
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! │  margin/      cost, capital, analyser   │
//! │  scenarios    shocked re-pricing        │
//! │  sensitivity  coupon / vol sweeps       │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │  pricer_optimiser (L3)  fair coupon     │
//! │  pricer_pricing   (L3)  path simulator  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pricer_risk::margin::{path_margins, CapitalMetrics, CostModel};
//!
//! // Present values of five paths on a principal of 1000
//! let pvs = [980.0, 990.0, 1000.0, 1010.0, 1060.0];
//! let margins = path_margins(&pvs, 1000.0);
//! let capital = CapitalMetrics::from_margins(&margins, 1000.0, &CostModel::default()).unwrap();
//!
//! assert!(capital.value_at_risk > 0.0);
//! assert!(capital.regulatory_capital >= 30.0);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod error;
pub mod margin;
pub mod scenarios;
pub mod sensitivity;

pub use error::RiskError;
