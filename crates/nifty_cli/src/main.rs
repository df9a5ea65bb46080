mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nifty")]
#[command(version, about = "Nifty tuple assertion CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate delimited data against an expectation file
    Validate {
        /// Path to the expectation file (YAML or TOML)
        expectations: String,

        /// Path to the delimited data file, one tuple per line
        #[arg(short, long)]
        data: String,

        /// Field delimiter of the data file
        #[arg(long, default_value = ";")]
        delimiter: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Check an expectation file without validating data
    Check {
        /// Path to the expectation file (YAML or TOML)
        expectations: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate {
            expectations,
            data,
            delimiter,
            format,
        } => commands::validate::execute(&expectations, &data, &delimiter, &format),

        Commands::Check {
            expectations,
            format,
        } => commands::check::execute(&expectations, &format),
    }
}
