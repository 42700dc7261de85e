//! Network sessions
//!
//! A session owns exactly one tower graph. Hosts create one per user or
//! request, load a topology into it, run queries, and drop it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    AnalysisConfig, NetworkAnalyzer, NetworkHealth, NetworkSummary, PathEngine, PathError,
    Result, TopologyDocument, TowerGraph, TowerPath,
};

/// Exclusively owned graph plus the settings used to analyze it
#[derive(Debug, Clone)]
pub struct NetworkSession {
    pub id: Uuid,
    pub loaded_at: Option<DateTime<Utc>>,
    graph: TowerGraph,
    config: AnalysisConfig,
}

impl Default for NetworkSession {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            loaded_at: None,
            graph: TowerGraph::new(),
            config: AnalysisConfig::default(),
        }
    }

    /// Create a session with a validated analysis configuration
    pub fn with_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn graph(&self) -> &TowerGraph {
        &self.graph
    }

    /// Rebuild the graph from a topology document.
    ///
    /// On failure the previously loaded topology is kept.
    pub fn load(&mut self, document: &TopologyDocument) -> Result<NetworkSummary> {
        let span = tracing::info_span!("session", id = %self.id);
        let _enter = span.enter();

        document.load_into(&mut self.graph)?;
        self.loaded_at = Some(Utc::now());

        let summary = self.summary();
        tracing::info!(
            towers = summary.tower_count,
            links = summary.link_count,
            "topology loaded"
        );
        Ok(summary)
    }

    /// Drop every tower and link
    pub fn clear(&mut self) {
        self.graph.clear();
        self.loaded_at = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn analyzer(&self) -> NetworkAnalyzer<'_> {
        NetworkAnalyzer::from_config(&self.graph, &self.config)
    }

    pub fn summary(&self) -> NetworkSummary {
        self.analyzer().summary()
    }

    /// Run every analysis pass and collect the results for display
    pub fn health(&self) -> NetworkHealth {
        let span = tracing::info_span!("session", id = %self.id);
        let _enter = span.enter();

        let analyzer = self.analyzer();
        NetworkHealth {
            summary: analyzer.summary(),
            latency_threshold: analyzer.threshold(),
            isolated: analyzer.isolated_nodes().into_iter().collect(),
            high_latency: analyzer.flagged_high_latency().into_iter().collect(),
            components: analyzer.connected_components(),
            issues: analyzer.detect_issues(),
        }
    }

    pub fn shortest_path(
        &self,
        origin: &str,
        destination: &str,
    ) -> std::result::Result<TowerPath, PathError> {
        let span = tracing::info_span!("session", id = %self.id);
        let _enter = span.enter();

        PathEngine::shortest_path(&self.graph, origin, destination)
    }
}
