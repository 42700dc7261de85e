//! Topology loading - Builds a tower graph from an uploaded edge list

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::graph::TowerGraph;
use crate::TopologyError;

/// One link of an uploaded topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "latencia", alias = "latency")]
    pub latency: f64,
}

impl EdgeRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, latency: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            latency,
        }
    }
}

/// Uploaded topology description.
///
/// `towers` lists towers that should exist even without links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyDocument {
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub towers: Vec<String>,
}

/// Errors raised while reading or applying a topology document
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid topology document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Edge record {index} rejected: {source}")]
    Record {
        index: usize,
        #[source]
        source: TopologyError,
    },

    #[error("Tower entry {index} rejected: {source}")]
    Tower {
        index: usize,
        #[source]
        source: TopologyError,
    },
}

impl TopologyDocument {
    pub fn from_edges(edges: Vec<EdgeRecord>) -> Self {
        Self {
            edges,
            towers: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Build a fresh graph from every record, failing on the first bad one
    pub fn build(&self) -> Result<TowerGraph, LoadError> {
        let mut graph = TowerGraph::new();

        for (index, record) in self.edges.iter().enumerate() {
            let previous = graph
                .add_link(&record.source, &record.target, record.latency)
                .map_err(|source| LoadError::Record { index, source })?;
            if let Some(previous) = previous {
                tracing::debug!(
                    index,
                    source = %record.source,
                    target = %record.target,
                    previous,
                    latency = record.latency,
                    "duplicate link overwritten"
                );
            }
        }

        for (index, tower) in self.towers.iter().enumerate() {
            graph
                .add_tower(tower)
                .map_err(|source| LoadError::Tower { index, source })?;
        }

        Ok(graph)
    }

    /// Replace `graph` wholesale with this document's topology.
    ///
    /// The target graph is only touched once the whole document is accepted.
    pub fn load_into(&self, graph: &mut TowerGraph) -> Result<(), LoadError> {
        let fresh = self.build()?;
        *graph = fresh;
        Ok(())
    }
}
