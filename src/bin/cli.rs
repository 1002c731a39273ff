// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL Dimensions CLI

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use stl_dimensions::batch::{BatchConfig, BatchRunner, ReportWriter, StlDiscovery};
use stl_dimensions::cli::Reporter;
use stl_dimensions::try_measure_file;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stl-dimensions")]
#[command(about = "Measure bounding box, volume and triangle count of STL files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory to scan for STL files
    #[arg(value_name = "DIR")]
    dir: Option<String>,

    /// Directory for the CSV / log reports (defaults to DIR)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Only scan the top-level directory
    #[arg(long)]
    no_recursive: bool,

    /// Also write a JSON report
    #[arg(long)]
    json: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Hide the progress bar and summary
    #[arg(short, long)]
    quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure a single STL file
    Measure {
        /// Input STL file
        file: String,

        /// Print the measurement as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Measure { file, json }) => measure_command(file, *json),
        Some(Commands::Version) => {
            println!("STL Dimensions v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => batch_command(&cli),
    };

    if let Err(err) = result {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn batch_command(cli: &Cli) -> Result<()> {
    let mut config = BatchConfig::load(cli.config.as_deref())?;
    if cli.output_dir.is_some() {
        config.output_dir = cli.output_dir.clone();
    }
    if cli.jobs.is_some() {
        config.parallelism = cli.jobs.filter(|&n| n > 0);
    }
    if cli.no_recursive {
        config.recursive = false;
    }
    if cli.json {
        config.write_json = true;
    }
    if cli.quiet {
        config.progress = false;
    }
    config.verbose |= cli.verbose;

    let root = PathBuf::from(cli.dir.as_deref().unwrap_or("."));
    let files = StlDiscovery::discover(&root, config.recursive)?;

    if files.is_empty() {
        if !cli.quiet {
            Reporter::report_warning(&format!("No STL files found in {}", root.display()));
        }
        return Ok(());
    }

    if config.verbose {
        Reporter::report_info(&format!(
            "Analyzing {} unique STL file(s) in {}",
            files.len(),
            root.display()
        ));
    }

    let precision = config.precision;
    let runner = BatchRunner::new(config);
    let outcome = runner.run_files(&root, files)?;
    let paths = ReportWriter::write_all(&outcome, runner.config(), &Local::now())?;

    if !cli.quiet {
        Reporter::report_batch_summary(&outcome, &paths, precision);
    }

    Ok(())
}

fn measure_command(file: &str, json: bool) -> Result<()> {
    if !Path::new(file).exists() {
        anyhow::bail!("Input file not found: {}", file);
    }

    let start = Instant::now();
    let measurement =
        try_measure_file(file).with_context(|| format!("Failed to measure {}", file))?;
    let duration = start.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&measurement)?);
    } else {
        Reporter::report_measurement(file, &measurement, duration);
        if measurement.status.is_ok() {
            Reporter::success(&format!(
                "{} measured in {}",
                file.bold(),
                Reporter::format_duration(duration)
            ));
        }
    }

    Ok(())
}
