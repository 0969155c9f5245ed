mod commands;
mod input;
mod logging;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::catalog::CatalogArgs;
use commands::product::ProductArgs;

/// Markdown pricing for perishable inventory
#[derive(Parser)]
#[command(
    name = "markdown",
    version,
    about = "Markdown pricing for perishable inventory",
    long_about = "Recommends discounts for perishable products from shelf life, stock \
                  pressure, category policy and seasonal demand. Also produces restock \
                  quantities, per-product performance scores and portfolio rollups."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Engine configuration file (.yaml, .yml or .json)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Log line format on stderr
    #[arg(long, default_value = "pretty", global = true)]
    log_format: logging::LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a discount for one product
    Discount(ProductArgs),
    /// Performance score, financial projection and demand outlook for one product
    Metrics(ProductArgs),
    /// Recommend the next restock quantity for one product
    Restock(ProductArgs),
    /// Rank a catalog by urgency and potential loss
    Portfolio(CatalogArgs),
    /// Per-category risk rollup for a catalog
    Categories(CatalogArgs),
    /// Catalog counts and averages
    Stats(CatalogArgs),
    /// Print the effective engine configuration
    Policies,
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
    logging::init(&cli.log_level, &cli.log_format);

    let date = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let result = match cli.command {
        Commands::Version => {
            println!("markdown {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        command => run(command, cli.config.as_deref(), date),
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(
    command: Commands,
    config: Option<&str>,
    date: NaiveDate,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let engine = commands::load_engine(config)?;
    tracing::debug!(%date, "reference date");

    match command {
        Commands::Discount(args) => commands::product::run_discount(&engine, args, date),
        Commands::Metrics(args) => commands::product::run_metrics(&engine, args, date),
        Commands::Restock(args) => commands::product::run_restock(&engine, args),
        Commands::Portfolio(args) => commands::catalog::run_portfolio(&engine, args, date),
        Commands::Categories(args) => commands::catalog::run_categories(&engine, args, date),
        Commands::Stats(args) => commands::catalog::run_stats(&engine, args),
        Commands::Policies => commands::run_policies(&engine),
        Commands::Version => Ok(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
    }
}
