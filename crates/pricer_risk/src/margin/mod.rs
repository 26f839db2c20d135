//! Bank margin economics: cost model, capital and the analysis pipeline.

pub mod analyzer;
pub mod capital;
pub mod config;

pub use analyzer::{BankMarginAnalysis, BankMarginAnalyzer, CostBreakdown, MarginStatus};
pub use capital::{path_margins, CapitalMetrics};
pub use config::{BenchmarkConfig, Competitiveness, CostModel};
