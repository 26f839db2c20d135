//! Instrument definitions.
//!
//! The workspace prices a single product, the four-asset autocall note.

pub mod autocall;

pub use autocall::{SimulationConfig, SimulationConfigBuilder};
