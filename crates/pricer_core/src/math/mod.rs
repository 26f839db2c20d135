//! Numerical helpers shared by the pricing and risk layers.

pub mod stats;

pub use stats::{mean, quantile, sample_std, standard_error, tail_mean};
