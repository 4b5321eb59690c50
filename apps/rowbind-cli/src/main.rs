use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use config::ConfigOverrides;
use error::CliResult;

#[derive(Parser)]
#[command(name = "rowbind")]
#[command(about = "Rowbind CLI - Check and convert CSV files against a record shape")]
#[command(version)]
struct Cli {
    /// Time format for time columns: "rfc3339" or a strftime pattern with an offset
    #[arg(long, global = true)]
    time_format: Option<String>,

    /// Separator between column name and flags in field tags
    #[arg(long, global = true)]
    tag_sep: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the header and every row of a CSV file
    Check {
        /// Record shape file (YAML)
        #[arg(short, long)]
        shape: PathBuf,

        /// CSV file to check
        csv: PathBuf,
    },

    /// Convert a CSV file to JSON lines
    Convert {
        /// Record shape file (YAML)
        #[arg(short, long)]
        shape: PathBuf,

        /// CSV file to convert
        csv: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip rows that fail to decode instead of stopping
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Print the column bindings resolved from a shape file
    Shape {
        /// Record shape file (YAML)
        #[arg(short, long)]
        shape: PathBuf,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        time_format: cli.time_format,
        tag_sep: cli.tag_sep,
    };

    match cli.command {
        Commands::Check { shape, csv } => commands::check::execute(shape, csv, overrides),

        Commands::Convert {
            shape,
            csv,
            output,
            skip_invalid,
        } => commands::convert::execute(shape, csv, output, skip_invalid, overrides),

        Commands::Shape { shape } => commands::shape::execute(shape, overrides),
    }
}
