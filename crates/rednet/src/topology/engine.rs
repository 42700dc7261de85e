//! Path engine - Minimum-latency routing between towers

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use super::graph::{TowerGraph, TowerId};
use crate::PathError;

/// A route through the network, origin first.
///
/// Only the engine builds paths, so a path always holds at least its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerPath {
    #[serde(rename = "path")]
    towers: Vec<TowerId>,
    cost: f64,
}

impl TowerPath {
    fn single(tower: TowerId) -> Self {
        Self {
            towers: vec![tower],
            cost: 0.0,
        }
    }

    pub fn towers(&self) -> &[TowerId] {
        &self.towers
    }

    /// Sum of link latencies along the path.
    ///
    /// Floating-point addition is order dependent, so the cost of the reverse
    /// route may differ in the last bits with fractional latencies.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn origin(&self) -> &TowerId {
        &self.towers[0]
    }

    pub fn destination(&self) -> &TowerId {
        &self.towers[self.towers.len() - 1]
    }

    /// Number of links traversed
    pub fn hops(&self) -> usize {
        self.towers.len() - 1
    }

    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }
}

/// State for Dijkstra's algorithm
#[derive(Clone, PartialEq)]
struct DijkstraState<'a> {
    cost: f64,
    tower: &'a TowerId,
}

impl Eq for DijkstraState<'_> {}

impl Ord for DijkstraState<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; equal costs pop in identifier order
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.tower.cmp(self.tower))
    }
}

impl PartialOrd for DijkstraState<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Engine for shortest-path queries over a tower graph
pub struct PathEngine;

impl PathEngine {
    /// Find the minimum-latency path between two towers.
    ///
    /// Identifiers are normalized before lookup. Ties between equal-cost paths
    /// are broken deterministically: towers are settled in (cost, identifier)
    /// order, neighbors are relaxed in identifier order, and a predecessor is
    /// only replaced by a strictly cheaper one. The first settled tower that
    /// reaches a given cost therefore keeps its place on the path.
    pub fn shortest_path(
        graph: &TowerGraph,
        origin: &str,
        destination: &str,
    ) -> Result<TowerPath, PathError> {
        let from = graph
            .resolve(origin)
            .ok_or_else(|| PathError::UnknownNode(display_id(origin)))?;
        let to = graph
            .resolve(destination)
            .ok_or_else(|| PathError::UnknownNode(display_id(destination)))?;

        if from == to {
            return Ok(TowerPath::single(from.clone()));
        }

        let mut dist: HashMap<&TowerId, f64> = HashMap::new();
        let mut prev: HashMap<&TowerId, &TowerId> = HashMap::new();
        let mut settled: HashSet<&TowerId> = HashSet::new();
        let mut heap = BinaryHeap::new();

        dist.insert(from, 0.0);
        heap.push(DijkstraState { cost: 0.0, tower: from });

        while let Some(DijkstraState { cost, tower }) = heap.pop() {
            if !settled.insert(tower) {
                continue;
            }
            tracing::trace!(tower = %tower, cost, "settled");

            if tower == to {
                let path = Self::reconstruct(&prev, from, to, cost);
                tracing::debug!(
                    origin = %from,
                    destination = %to,
                    cost = path.cost,
                    hops = path.hops(),
                    "shortest path found"
                );
                return Ok(path);
            }

            let Some(neighbors) = graph.adjacency_of(tower) else {
                continue;
            };
            let mut neighbors: Vec<(&TowerId, f64)> =
                neighbors.iter().map(|(n, w)| (n, *w)).collect();
            neighbors.sort_by(|a, b| a.0.cmp(b.0));

            for (next, latency) in neighbors {
                if settled.contains(next) {
                    continue;
                }

                let next_cost = cost + latency;
                if next_cost < *dist.get(next).unwrap_or(&f64::INFINITY) {
                    dist.insert(next, next_cost);
                    prev.insert(next, tower);
                    heap.push(DijkstraState {
                        cost: next_cost,
                        tower: next,
                    });
                }
            }
        }

        tracing::debug!(origin = %from, destination = %to, "no path between towers");
        Err(PathError::NoPath {
            origin: from.to_string(),
            destination: to.to_string(),
        })
    }

    /// Check if a path exists between two towers
    pub fn path_exists(graph: &TowerGraph, origin: &str, destination: &str) -> bool {
        Self::shortest_path(graph, origin, destination).is_ok()
    }

    fn reconstruct(
        prev: &HashMap<&TowerId, &TowerId>,
        from: &TowerId,
        to: &TowerId,
        cost: f64,
    ) -> TowerPath {
        let mut towers = vec![to.clone()];
        let mut current = to;

        while current != from {
            match prev.get(current) {
                Some(&p) => {
                    towers.push(p.clone());
                    current = p;
                }
                None => break,
            }
        }
        towers.reverse();

        TowerPath { towers, cost }
    }
}

fn display_id(raw: &str) -> String {
    TowerId::normalize(raw)
        .map(|id| id.to_string())
        .unwrap_or_else(|| raw.to_string())
}
