//! CLI command implementations
//!
//! Each submodule implements one subcommand against a loaded
//! [`DealFile`](crate::config::DealFile).

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::Result;

pub mod fair_coupon;
pub mod margin;
pub mod price;

/// Output rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table on stdout
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Arguments shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Path to the TOML deal file
    pub deal: PathBuf,

    /// Override the number of Monte Carlo paths
    #[arg(short = 'n', long)]
    pub paths: Option<usize>,

    /// Override the base seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Replace the coupon schedule with a flat coupon per period
    #[arg(long)]
    pub coupon: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write JSON output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Write `value` as JSON to `output`, or stdout.
pub(crate) fn emit_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "Wrote results");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub(crate) fn row(label: &str, value: impl std::fmt::Display) {
    println!("│ {:<28} │ {:>20} │", label, value.to_string());
}

pub(crate) fn rule(top: bool) {
    if top {
        println!("┌──────────────────────────────┬──────────────────────┐");
    } else {
        println!("└──────────────────────────────┴──────────────────────┘");
    }
}

pub(crate) fn separator() {
    println!("├──────────────────────────────┼──────────────────────┤");
}
