//! Configuration management for RedNet CLI
//!
//! Handles loading and saving configuration from ~/.rednet/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rednet::AnalysisConfig;
use serde::{Deserialize, Serialize};

/// Configuration for RedNet CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    /// Decimal places for latency values
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

fn default_true() -> bool {
    true
}

fn default_decimals() -> usize {
    2
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            decimals: default_decimals(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rednet")
            .join("config.toml")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a configuration value by key path (e.g., "analysis.latency_threshold")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["analysis", "latency_threshold"] => Some(self.analysis.latency_threshold.to_string()),
            ["display", "color"] => Some(self.display.color.to_string()),
            ["display", "decimals"] => Some(self.display.decimals.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["analysis", "latency_threshold"] => {
                let threshold: f64 = value
                    .parse()
                    .with_context(|| format!("Not a number: {}", value))?;
                let analysis = self.analysis.clone().with_latency_threshold(threshold);
                analysis.validate()?;
                self.analysis = analysis;
            }
            ["display", "color"] => {
                self.display.color = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got {}", value))?
            }
            ["display", "decimals"] => {
                self.display.decimals = value
                    .parse()
                    .with_context(|| format!("Not a whole number: {}", value))?
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        Ok(())
    }
}
