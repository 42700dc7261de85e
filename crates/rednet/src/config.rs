//! Configuration for network analysis

use serde::{Deserialize, Serialize};

use crate::{RednetError, Result, DEFAULT_LATENCY_THRESHOLD};

/// Tunables for the analysis passes run over a session's graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Average latency above which a tower is flagged
    #[serde(default = "default_latency_threshold")]
    pub latency_threshold: f64,
}

fn default_latency_threshold() -> f64 {
    DEFAULT_LATENCY_THRESHOLD
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            latency_threshold: default_latency_threshold(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_latency_threshold(mut self, threshold: f64) -> Self {
        self.latency_threshold = threshold;
        self
    }

    /// Reject thresholds that would make every comparison meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.latency_threshold.is_finite() || self.latency_threshold < 0.0 {
            return Err(RednetError::ConfigError(format!(
                "latency_threshold must be a finite, non-negative number, got {}",
                self.latency_threshold
            )));
        }
        Ok(())
    }
}
