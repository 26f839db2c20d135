//! Autocall payoff engine: lifecycle state machine and cash-flow discounting.

pub mod discount;
pub mod state;

pub use discount::{CashFlowDiscounter, DiscountLeg, DiscountMode};
pub use state::{AutocallLifecycle, AutocallState};
