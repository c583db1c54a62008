mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::AnalyzeArgs;
use commands::financing::FinancingArgs;
use commands::market::MarketArgs;

/// Underwrite short-term-rental acquisitions
#[derive(Parser)]
#[command(
    name = "stru",
    version,
    about = "Short-term-rental underwriting",
    long_about = "Underwrite a short-term-rental property from its listing and a set of \
                  comparable listings. Produces financing, best/average/worst revenue \
                  scenarios, cash flow, ROI, cap rate and DSCR with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. warn, debug, str_underwriting_core=trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// YAML or JSON file overriding the default assumptions
    #[arg(long, global = true)]
    assumptions: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a full underwriting report for a subject property
    Analyze(AnalyzeArgs),
    /// Compute down payment, loan and mortgage payment only
    Financing(FinancingArgs),
    /// Aggregate comparable listings into market rate and occupancy
    Market(MarketArgs),
    /// Print the assumptions in effect
    Assumptions,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let assumptions = match input::config::load_assumptions(cli.assumptions.as_deref()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args, &assumptions),
        Commands::Financing(args) => commands::financing::run_financing(args, &assumptions),
        Commands::Market(args) => commands::market::run_market(args, &assumptions),
        Commands::Assumptions => commands::assumptions::run_assumptions(&assumptions),
        Commands::Version => {
            println!("stru {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
