//! Autocall CLI - pricing, fair-coupon search and bank margin analysis
//!
//! # Commands
//!
//! - `autocall price <deal.toml>` - Monte Carlo price and exercise profile
//! - `autocall fair-coupon <deal.toml>` - Flat coupon that prices the note at par
//! - `autocall margin <deal.toml>` - Margin, capital, RAROC and scenarios
//!
//! # Architecture
//!
//! As the service layer this crate only wires the pricing crates together:
//! it reads a TOML deal file, builds the model and deal terms, and renders
//! results as a table or JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

use commands::RunArgs;
use config::DealFile;
pub use error::{CliError, Result};

/// Autocall note pricing CLI
#[derive(Parser)]
#[command(name = "autocall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the note at its coupon schedule
    Price {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Search the coupon that prices the note at a target
    FairCoupon {
        #[command(flatten)]
        run: RunArgs,

        /// Target price (defaults to the principal)
        #[arg(short, long)]
        target: Option<f64>,
    },

    /// Analyse the bank margin of the deal
    Margin {
        #[command(flatten)]
        run: RunArgs,

        /// Skip the scenario sweep
        #[arg(long)]
        no_scenarios: bool,

        /// Add coupon and volatility sensitivity sweeps
        #[arg(long)]
        sensitivity: bool,
    },
}

impl Commands {
    fn run_args(&self) -> &RunArgs {
        match self {
            Self::Price { run } | Self::FairCoupon { run, .. } | Self::Margin { run, .. } => run,
        }
    }
}

fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let args = cli.command.run_args();
    let deal = DealFile::load(&args.deal)
        .with_context(|| format!("loading deal file {}", args.deal.display()))?;

    init_tracing(cli.verbose, &deal.logging.level);
    debug!(deal = %args.deal.display(), "Deal file loaded");

    let outcome = match &cli.command {
        Commands::Price { run } => commands::price::run(&deal, run),
        Commands::FairCoupon { run, target } => commands::fair_coupon::run(&deal, run, *target),
        Commands::Margin {
            run,
            no_scenarios,
            sensitivity,
        } => commands::margin::run(&deal, run, !no_scenarios, *sensitivity),
    };
    outcome.context("command failed")
}
