//! scandiff: semantic diff tool for network scan reports
//!
//! Compares two Nmap XML scan reports and reports host state changes, port
//! state changes, and changes to service and OS detection.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use scandiff::{
    cli::{self, exit_codes},
    config::{DiffConfig, DiffOptions, OutputConfig},
    reports::OutputFormat,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scandiff")]
#[command(version)]
#[command(about = "Compare two scan reports and display a list of their differences")]
#[command(after_help = "EXIT CODES:
    0  No differences found
    1  Differences found
    2  Error occurred

EXAMPLES:
    # Text diff of two scans of the same network
    scandiff yesterday.xml today.xml

    # Structured output for machine consumption
    scandiff --xml yesterday.xml today.xml

    # Everything, including unchanged hosts and ports
    scandiff -v yesterday.xml today.xml")]
struct Cli {
    /// The "before" scan report
    file_a: PathBuf,

    /// The "after" scan report
    file_b: PathBuf,

    /// Also show hosts and ports that haven't changed
    #[arg(short, long)]
    verbose: bool,

    /// Display output in text format (default)
    #[arg(long, conflicts_with = "xml")]
    text: bool,

    /// Display output in XML format
    #[arg(long)]
    xml: bool,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so they never mix into the diff itself.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let format = if cli.xml {
        OutputFormat::Xml
    } else {
        OutputFormat::Text
    };
    let config = DiffConfig {
        path_a: cli.file_a,
        path_b: cli.file_b,
        output: OutputConfig {
            format,
            file: cli.output_file,
        },
        options: DiffOptions {
            verbose: cli.verbose,
        },
    };

    match cli::run_diff(config) {
        Ok(code) => process::exit(code),
        Err(err) => {
            tracing::error!("{err:#}");
            process::exit(exit_codes::ERROR);
        }
    }
}
