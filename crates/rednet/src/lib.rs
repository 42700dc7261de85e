//! # RedNet - Relay Tower Network Analysis
//!
//! Models a network of relay towers as an undirected graph whose links are
//! weighted by latency, and answers three questions over it:
//!
//! - **Health**: which towers are isolated or show an abnormal average latency
//! - **Routing**: what is the minimum-latency path between two towers
//! - **Reporting**: how to emit that path as CSV rows or a text report
//!
//! ## Architecture
//!
//! ```text
//! TopologyDocument (JSON) ──► loader ──► TowerGraph
//!                                            │
//!                             ┌──────────────┴──────────────┐
//!                      NetworkAnalyzer                 PathEngine
//!                             │                             │
//!                      NetworkHealth                   TowerPath ──► PathReport
//! ```
//!
//! A [`NetworkSession`] owns one graph and is the unit a host hands to each
//! user or request. Nothing in this crate shares a graph between sessions.

pub mod config;
pub mod report;
pub mod session;
pub mod topology;

pub use config::AnalysisConfig;
pub use report::PathReport;
pub use session::NetworkSession;
pub use topology::{
    analyzer::{NetworkAnalyzer, DEFAULT_LATENCY_THRESHOLD},
    engine::{PathEngine, TowerPath},
    graph::{Link, TowerGraph, TowerId},
    loader::{EdgeRecord, LoadError, TopologyDocument},
};

use serde::Serialize;

/// Rejections raised by the graph store when inserting towers or links
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("Invalid latency {weight} on link {from} - {to}: must be a finite, non-negative number")]
    InvalidWeight { from: String, to: String, weight: f64 },

    #[error("Link endpoints must be distinct towers, got {0} twice")]
    SelfLoop(String),

    #[error("Tower identifier is empty")]
    EmptyTowerId,
}

/// Failures of a shortest-path query. Both are client errors and carry no path data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Tower not found: {0}")]
    UnknownNode(String),

    #[error("No path found from {origin} to {destination}")]
    NoPath { origin: String, destination: String },
}

/// Main error type for RedNet operations
#[derive(Debug, thiserror::Error)]
pub enum RednetError {
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Routing error: {0}")]
    Path(#[from] PathError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, RednetError>;

/// Dashboard metrics of a loaded network
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    pub tower_count: usize,
    pub link_count: usize,
    /// Mean latency over all links, 0 when there are none
    pub average_latency: f64,
}

impl Default for NetworkSummary {
    fn default() -> Self {
        Self {
            tower_count: 0,
            link_count: 0,
            average_latency: 0.0,
        }
    }
}

/// Kind of anomaly found by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Tower with no links at all
    IsolatedTower,
    /// Tower whose mean link latency exceeds the threshold
    HighLatency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Warning,
    Critical,
}

/// An anomaly detected in the network
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedIssue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    pub description: String,
    pub towers: Vec<TowerId>,
}

/// Full health report of a session's network, with tower lists sorted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHealth {
    pub summary: NetworkSummary,
    pub latency_threshold: f64,
    pub isolated: Vec<TowerId>,
    pub high_latency: Vec<TowerId>,
    pub components: Vec<Vec<TowerId>>,
    pub issues: Vec<DetectedIssue>,
}

impl NetworkHealth {
    /// True when no tower is isolated or above the latency threshold
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}
