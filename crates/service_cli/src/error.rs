//! CLI error types.

use pricer_core::market_data::MarketDataError;
use pricer_models::ModelError;
use pricer_optimiser::SolverError;
use pricer_pricing::mc::{ConfigError, SimulationError};
use pricer_risk::RiskError;
use thiserror::Error;

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors raised while loading a deal file or running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Deal file content is inconsistent.
    #[error("Invalid deal file: {0}")]
    InvalidDeal(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Deal file is not valid TOML for the expected layout.
    #[error("Failed to parse deal file: {0}")]
    Parse(#[from] toml::de::Error),

    /// JSON output failed.
    #[error("Failed to serialise output: {0}")]
    Json(#[from] serde_json::Error),

    /// Curve construction failed.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Model or deal construction failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Monte Carlo settings rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Simulator setup failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Fair-coupon search failed.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Margin analysis failed.
    #[error(transparent)]
    Risk(#[from] RiskError),
}
