mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "restitch")]
#[command(about = "Restitch - reassemble fragmented pipeline log records", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reassemble pipeline sequences and print them
    Process {
        /// Input file to process ("-" or omitted reads stdin)
        input: Option<String>,

        /// Output destination ("-" prints to stdout)
        #[arg(short, long, default_value = "-")]
        output: String,

        /// Emit JSON instead of the plain text rendering
        #[arg(long)]
        json: bool,

        /// List orphaned fragment ids in JSON output
        #[arg(long)]
        include_orphans: bool,
    },

    /// Check input for structural anomalies without printing sequences
    Verify {
        /// Input file to verify ("-" or omitted reads stdin)
        input: Option<String>,

        /// Exit non-zero if any error-severity anomaly is found
        #[arg(long)]
        strict: bool,
    },

    /// Print ingest statistics
    Stats {
        /// Input file to read ("-" or omitted reads stdin)
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let writer = match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path))?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(cli.log_file.is_none())
                .with_writer(writer),
        )
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Process {
            input,
            output,
            json,
            include_orphans,
        } => commands::process::execute(input.as_deref(), &output, json, include_orphans),

        Commands::Verify { input, strict } => commands::verify::execute(input.as_deref(), strict),

        Commands::Stats { input } => commands::stats::execute(input.as_deref()),
    }
}
