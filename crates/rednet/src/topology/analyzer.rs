//! Network analyzer - Latency statistics and anomaly detection over a tower graph

use std::collections::{BTreeSet, HashSet, VecDeque};

use indexmap::IndexMap;

use super::graph::{TowerGraph, TowerId};
use crate::{AnalysisConfig, DetectedIssue, IssueKind, IssueSeverity, NetworkSummary};

/// Average latency above which a tower is reported, in latency units
pub const DEFAULT_LATENCY_THRESHOLD: f64 = 30.0;

/// Read-only analysis passes over a borrowed graph
pub struct NetworkAnalyzer<'a> {
    graph: &'a TowerGraph,
    latency_threshold: f64,
}

impl<'a> NetworkAnalyzer<'a> {
    pub fn new(graph: &'a TowerGraph) -> Self {
        Self {
            graph,
            latency_threshold: DEFAULT_LATENCY_THRESHOLD,
        }
    }

    pub fn from_config(graph: &'a TowerGraph, config: &AnalysisConfig) -> Self {
        Self::new(graph).with_threshold(config.latency_threshold)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.latency_threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.latency_threshold
    }

    /// Mean latency of each tower's incident links.
    ///
    /// Towers without links have no defined average and are left out.
    pub fn average_latency_per_node(&self) -> IndexMap<TowerId, f64> {
        self.graph
            .nodes()
            .filter_map(|tower| {
                let latencies = self.graph.neighbors_of(tower.as_str());
                if latencies.is_empty() {
                    return None;
                }
                let total: f64 = latencies.iter().map(|(_, w)| w).sum();
                Some((tower.clone(), total / latencies.len() as f64))
            })
            .collect()
    }

    /// Towers whose average latency is strictly above `threshold`
    pub fn high_latency_nodes(&self, threshold: f64) -> BTreeSet<TowerId> {
        self.average_latency_per_node()
            .into_iter()
            .filter(|(_, avg)| *avg > threshold)
            .map(|(tower, _)| tower)
            .collect()
    }

    /// High-latency towers using the configured threshold
    pub fn flagged_high_latency(&self) -> BTreeSet<TowerId> {
        self.high_latency_nodes(self.latency_threshold)
    }

    /// Towers with no incident links
    pub fn isolated_nodes(&self) -> BTreeSet<TowerId> {
        self.graph
            .nodes()
            .filter(|tower| self.graph.degree(tower.as_str()) == 0)
            .cloned()
            .collect()
    }

    /// Mean latency over every link in the graph, 0 when there are none
    pub fn overall_average_latency(&self) -> f64 {
        let edges = self.graph.edges();
        if edges.is_empty() {
            return 0.0;
        }
        edges.iter().map(|l| l.latency).sum::<f64>() / edges.len() as f64
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            tower_count: self.graph.node_count(),
            link_count: self.graph.edge_count(),
            average_latency: self.overall_average_latency(),
        }
    }

    /// Connected components, each sorted, ordered by their smallest tower
    pub fn connected_components(&self) -> Vec<Vec<TowerId>> {
        let mut components = Vec::new();
        let mut visited: HashSet<&TowerId> = HashSet::new();

        for start in self.graph.nodes() {
            if !visited.insert(start) {
                continue;
            }

            let mut component = vec![start.clone()];
            let mut queue = VecDeque::from([start]);

            while let Some(tower) = queue.pop_front() {
                for (neighbor, _) in self.graph.neighbors_of(tower.as_str()) {
                    if visited.insert(neighbor) {
                        component.push(neighbor.clone());
                        queue.push_back(neighbor);
                    }
                }
            }

            component.sort();
            components.push(component);
        }

        components.sort();
        components
    }

    /// Detect isolated and high-latency towers, most severe first
    pub fn detect_issues(&self) -> Vec<DetectedIssue> {
        let mut issues = Vec::new();

        let isolated = self.isolated_nodes();
        if !isolated.is_empty() {
            tracing::warn!(count = isolated.len(), "isolated towers detected");
            issues.push(DetectedIssue {
                kind: IssueKind::IsolatedTower,
                severity: IssueSeverity::Critical,
                description: format!(
                    "{} tower(s) have no links: {}",
                    isolated.len(),
                    join(&isolated)
                ),
                towers: isolated.into_iter().collect(),
            });
        }

        let averages = self.average_latency_per_node();
        let mut high: Vec<(&TowerId, f64)> = averages
            .iter()
            .filter(|(_, avg)| **avg > self.latency_threshold)
            .map(|(tower, avg)| (tower, *avg))
            .collect();
        high.sort_by(|a, b| a.0.cmp(b.0));

        if !high.is_empty() {
            tracing::warn!(
                count = high.len(),
                threshold = self.latency_threshold,
                "towers above latency threshold"
            );
        }

        for (tower, avg) in high {
            let severity = if avg > self.latency_threshold * 2.0 {
                IssueSeverity::Critical
            } else {
                IssueSeverity::Warning
            };
            issues.push(DetectedIssue {
                kind: IssueKind::HighLatency,
                severity,
                description: format!(
                    "Tower '{}' averages {:.2} latency over its links (threshold {})",
                    tower, avg, self.latency_threshold
                ),
                towers: vec![tower.clone()],
            });
        }

        // Stable sort keeps identifier order within a severity
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));
        issues
    }
}

fn join(towers: &BTreeSet<TowerId>) -> String {
    towers
        .iter()
        .map(TowerId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &BTreeSet<TowerId>) -> Vec<&str> {
        set.iter().map(TowerId::as_str).collect()
    }

    fn triangle() -> TowerGraph {
        let mut graph = TowerGraph::new();
        graph.add_link("A", "B", 10.0).unwrap();
        graph.add_link("B", "C", 20.0).unwrap();
        graph.add_link("A", "C", 50.0).unwrap();
        graph
    }

    #[test]
    fn test_average_latency_per_node() {
        let mut graph = triangle();
        graph.add_tower("G").unwrap();
        let analyzer = NetworkAnalyzer::new(&graph);

        let averages = analyzer.average_latency_per_node();
        assert_eq!(averages.len(), 3);
        assert_eq!(averages["A"], 30.0);
        assert_eq!(averages["B"], 15.0);
        assert_eq!(averages["C"], 35.0);
        assert!(!averages.contains_key("G"));
    }

    #[test]
    fn test_high_latency_is_strictly_above_threshold() {
        let graph = triangle();
        let analyzer = NetworkAnalyzer::new(&graph);

        // A averages exactly 30 and is not flagged
        assert_eq!(names(&analyzer.flagged_high_latency()), vec!["C"]);
        assert_eq!(names(&analyzer.high_latency_nodes(10.0)), vec!["A", "B", "C"]);
        assert!(analyzer.high_latency_nodes(100.0).is_empty());
    }

    #[test]
    fn test_isolated_nodes() {
        let mut graph = TowerGraph::new();
        graph.add_link("E", "F", 3.0).unwrap();
        graph.add_tower("G").unwrap();

        let analyzer = NetworkAnalyzer::new(&graph);
        assert_eq!(names(&analyzer.isolated_nodes()), vec!["G"]);
    }

    #[test]
    fn test_overall_average_latency() {
        let graph = triangle();
        let analyzer = NetworkAnalyzer::new(&graph);
        let avg = analyzer.overall_average_latency();
        assert!((avg - 80.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_graph_without_links() {
        let mut graph = TowerGraph::new();
        graph.add_tower("X").unwrap();
        graph.add_tower("Y").unwrap();
        let analyzer = NetworkAnalyzer::new(&graph);

        assert_eq!(analyzer.overall_average_latency(), 0.0);
        assert!(analyzer.average_latency_per_node().is_empty());
        assert!(analyzer.flagged_high_latency().is_empty());
        assert_eq!(names(&analyzer.isolated_nodes()), vec!["X", "Y"]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = TowerGraph::new();
        let analyzer = NetworkAnalyzer::new(&graph);
        assert_eq!(analyzer.summary(), NetworkSummary::default());
        assert!(analyzer.detect_issues().is_empty());
        assert!(analyzer.connected_components().is_empty());
    }

    #[test]
    fn test_connected_components() {
        let mut graph = TowerGraph::new();
        graph.add_link("D", "C", 5.0).unwrap();
        graph.add_link("A", "B", 5.0).unwrap();
        graph.add_tower("Z").unwrap();

        let components = NetworkAnalyzer::new(&graph).connected_components();
        let components: Vec<Vec<&str>> = components
            .iter()
            .map(|c| c.iter().map(TowerId::as_str).collect())
            .collect();
        assert_eq!(components, vec![vec!["A", "B"], vec!["C", "D"], vec!["Z"]]);
    }

    #[test]
    fn test_detect_issues_orders_by_severity() {
        let mut graph = TowerGraph::new();
        graph.add_link("A", "B", 40.0).unwrap();
        graph.add_link("C", "D", 70.0).unwrap();
        graph.add_tower("G").unwrap();

        let issues = NetworkAnalyzer::new(&graph).detect_issues();
        let summary: Vec<(IssueKind, IssueSeverity, Vec<&str>)> = issues
            .iter()
            .map(|i| (i.kind, i.severity, i.towers.iter().map(TowerId::as_str).collect()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (IssueKind::IsolatedTower, IssueSeverity::Critical, vec!["G"]),
                (IssueKind::HighLatency, IssueSeverity::Critical, vec!["C"]),
                (IssueKind::HighLatency, IssueSeverity::Critical, vec!["D"]),
                (IssueKind::HighLatency, IssueSeverity::Warning, vec!["A"]),
                (IssueKind::HighLatency, IssueSeverity::Warning, vec!["B"]),
            ]
        );
    }

    #[test]
    fn test_from_config_threshold() {
        let graph = triangle();
        let config = AnalysisConfig::default().with_latency_threshold(12.0);
        let analyzer = NetworkAnalyzer::from_config(&graph, &config);
        assert_eq!(analyzer.threshold(), 12.0);
        assert_eq!(names(&analyzer.flagged_high_latency()), vec!["A", "B", "C"]);
    }
}
