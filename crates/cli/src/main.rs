//! RedNet CLI - Relay Tower Network Analysis
//!
//! Loads a tower topology, reports its health, and computes minimum-latency
//! routes between towers with CSV and text exports.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// RedNet CLI - Route optimization for relay tower networks
#[derive(Parser)]
#[command(name = "rednet")]
#[command(author = "RedNet Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tower network health dashboard and shortest-path reports")]
#[command(long_about = r#"
RedNet analyzes a relay tower network described as a JSON edge list:

  {"edges": [{"source": "A", "target": "B", "latencia": 10}, ...]}

Features:
  - Dashboard with tower count, link count and average latency
  - Detection of isolated towers and towers with high average latency
  - Minimum-latency path between two towers
  - CSV and text report export of a computed path

Examples:
  rednet summary topology.json
  rednet path topology.json A C --csv route.csv --report route.txt
  rednet config --set analysis.latency_threshold=25
"#)]
struct Cli {
    /// Override the latency threshold used to flag towers
    #[arg(short, long, global = true, env = "REDNET_LATENCY_THRESHOLD")]
    threshold: Option<f64>,

    /// Configuration file (defaults to ~/.rednet/config.toml)
    #[arg(long, global = true, env = "REDNET_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the network dashboard and anomalies
    Summary {
        /// Topology JSON file
        file: PathBuf,

        /// Print the health report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the minimum-latency path between two towers
    Path {
        /// Topology JSON file
        file: PathBuf,

        /// Origin tower
        origin: String,

        /// Destination tower
        destination: String,

        /// Write the path as CSV (order,tower)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write a text report of the path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Print a single configuration value
        #[arg(long)]
        get: Option<String>,

        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rednet={0},rednet_cli={0},warn", log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(config::Config::config_path);
    let mut config = config::Config::load_from(&config_path)?;

    // Command-line overrides only apply to this run
    let mut run_config = config.clone();
    if cli.no_color {
        run_config.display.color = false;
    }
    if let Some(threshold) = cli.threshold {
        run_config.analysis = run_config.analysis.with_latency_threshold(threshold);
        run_config.analysis.validate()?;
    }

    match cli.command {
        Commands::Summary { file, json } => {
            commands::summary(&file, &run_config, json)?;
        }
        Commands::Path {
            file,
            origin,
            destination,
            csv,
            report,
        } => {
            commands::path(
                &file,
                &origin,
                &destination,
                csv.as_ref(),
                report.as_ref(),
                &run_config,
            )?;
        }
        Commands::Config { show, get, set } => {
            if show {
                commands::show_config(&config, &config_path)?;
            } else if let Some(key) = get {
                commands::get_config(&config, &key)?;
            } else if let Some(kv) = set {
                commands::set_config(&mut config, &config_path, &kv)?;
            } else {
                commands::show_config(&config, &config_path)?;
            }
        }
    }

    Ok(())
}
