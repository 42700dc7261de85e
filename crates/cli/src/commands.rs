//! CLI subcommand handlers
//!
//! Each command runs inside its own network session built from a topology file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use rednet::{NetworkSession, PathError, PathReport, TopologyDocument};

use crate::{config::Config, output::OutputHandler};

/// Load a topology file into a fresh session
pub fn open_session(file: &Path, config: &Config) -> Result<NetworkSession> {
    let document = TopologyDocument::from_path(file)
        .with_context(|| format!("Could not load topology from {}", file.display()))?;

    let mut session = NetworkSession::with_config(config.analysis.clone())?;
    session
        .load(&document)
        .with_context(|| format!("Topology in {} was rejected", file.display()))?;

    tracing::debug!(session = %session.id, file = %file.display(), "session ready");
    Ok(session)
}

/// Show the dashboard and anomaly report for a topology
pub fn summary(file: &Path, config: &Config, json: bool) -> Result<()> {
    let session = open_session(file, config)?;
    let health = session.health();

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    let output = OutputHandler::new(config.display.color, config.display.decimals);
    output.print_dashboard(&health.summary);
    output.print_anomalies(&health.isolated, &health.high_latency, health.latency_threshold);
    output.print_components(&health.components);
    output.print_issues(&health.issues);
    println!();

    Ok(())
}

/// Compute the shortest path between two towers and optionally export it
pub fn path(
    file: &Path,
    origin: &str,
    destination: &str,
    csv: Option<&PathBuf>,
    report: Option<&PathBuf>,
    config: &Config,
) -> Result<()> {
    let output = OutputHandler::new(config.display.color, config.display.decimals);
    let session = open_session(file, config)?;

    let path = match session.shortest_path(origin, destination) {
        Ok(path) => path,
        Err(PathError::UnknownNode(tower)) => {
            output.print_error(&format!("Tower {} does not exist in this topology.", tower));
            return Ok(());
        }
        Err(PathError::NoPath {
            origin,
            destination,
        }) => {
            output.print_error(&format!(
                "There is no path between {} and {}.",
                origin, destination
            ));
            return Ok(());
        }
    };

    output.print_path(&path);

    let export = PathReport::new(&path).with_timestamp(Utc::now());
    if let Some(csv_path) = csv {
        export
            .write_csv(csv_path)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        output.print_file_operation("Wrote CSV", &csv_path.display().to_string());
    }
    if let Some(report_path) = report {
        export
            .write_text(report_path, config.display.decimals)
            .with_context(|| format!("Failed to write {}", report_path.display()))?;
        output.print_file_operation("Wrote report", &report_path.display().to_string());
    }
    println!();

    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config, path: &Path) -> Result<()> {
    let output = OutputHandler::new(config.display.color, config.display.decimals);
    output.print_header("Configuration");

    println!("  {} {}", "File:".dimmed(), path.display());
    println!();

    let toml_str = toml::to_string_pretty(config)?;
    for line in toml_str.lines() {
        if line.starts_with('[') {
            println!("{}", line.bright_cyan());
        } else if line.contains('=') {
            let parts: Vec<&str> = line.splitn(2, '=').collect();
            println!("  {}={}", parts[0].bright_white(), parts[1].dimmed());
        } else {
            println!("{}", line);
        }
    }
    println!();

    Ok(())
}

/// Print one configuration value
pub fn get_config(config: &Config, key: &str) -> Result<()> {
    let value = config
        .get(key)
        .with_context(|| format!("Unknown configuration key: {}", key))?;
    println!("{}", value);
    Ok(())
}

/// Set a configuration value from a `key=value` pair and persist it
pub fn set_config(config: &mut Config, path: &Path, kv: &str) -> Result<()> {
    let (key, value) = kv
        .split_once('=')
        .with_context(|| format!("Expected key=value, got {}", kv))?;

    config.set(key.trim(), value.trim())?;
    config.save_to(path)?;

    let output = OutputHandler::new(config.display.color, config.display.decimals);
    output.print_success(&format!("Set {} = {}", key.trim(), value.trim()));
    Ok(())
}
