//! Graph model for relay tower networks

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::TopologyError;

/// Canonical identifier of a tower.
///
/// Identifiers are trimmed and upper-cased on construction, so `"a"`, `" A "`
/// and `"A"` all name the same tower.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TowerId(String);

impl TowerId {
    /// Normalize a raw identifier. Returns `None` when nothing is left after trimming.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_uppercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TowerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TowerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An undirected latency-weighted link between two towers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub a: TowerId,
    pub b: TowerId,
    pub latency: f64,
}

impl Link {
    /// Check whether the link touches the given tower
    pub fn touches(&self, tower: &str) -> bool {
        self.a.as_str() == tower || self.b.as_str() == tower
    }
}

/// In-memory undirected weighted graph of towers and links.
///
/// Each link is stored in both endpoints' adjacency maps, keyed by the other
/// endpoint, so a pair of towers has at most one link. Iteration order follows
/// insertion order and is stable as long as the graph is not mutated.
#[derive(Debug, Clone, Default)]
pub struct TowerGraph {
    adjacency: IndexMap<TowerId, IndexMap<TowerId, f64>>,
    link_count: usize,
}

impl TowerGraph {
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
            link_count: 0,
        }
    }

    /// Remove every tower and link
    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.link_count = 0;
    }

    /// Add a tower without links. Existing towers are left untouched.
    pub fn add_tower(&mut self, raw: &str) -> Result<TowerId, TopologyError> {
        let id = TowerId::normalize(raw).ok_or(TopologyError::EmptyTowerId)?;
        self.adjacency.entry(id.clone()).or_default();
        Ok(id)
    }

    /// Insert or overwrite the link between `a` and `b`.
    ///
    /// Both endpoints are created if absent. A second link between the same
    /// pair replaces the first one's latency (last write wins) and the previous
    /// latency is returned. Nothing is mutated when validation fails.
    ///
    /// Endpoints go through [`TowerId::normalize`], which trims surrounding
    /// whitespace as well as upper-casing. Plain upper-casing of uploaded
    /// names would keep `" A"` and `"A"` as two towers; here they are one, and
    /// a blank name is rejected with [`TopologyError::EmptyTowerId`].
    pub fn add_link(&mut self, a: &str, b: &str, latency: f64) -> Result<Option<f64>, TopologyError> {
        let a = TowerId::normalize(a).ok_or(TopologyError::EmptyTowerId)?;
        let b = TowerId::normalize(b).ok_or(TopologyError::EmptyTowerId)?;

        if !latency.is_finite() || latency < 0.0 {
            return Err(TopologyError::InvalidWeight {
                from: a.to_string(),
                to: b.to_string(),
                weight: latency,
            });
        }
        if a == b {
            return Err(TopologyError::SelfLoop(a.to_string()));
        }

        let previous = self
            .adjacency
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), latency);
        self.adjacency.entry(b).or_default().insert(a, latency);

        if previous.is_none() {
            self.link_count += 1;
        }
        Ok(previous)
    }

    /// Look up the canonical identifier of a tower from a raw name
    pub fn resolve(&self, raw: &str) -> Option<&TowerId> {
        let id = TowerId::normalize(raw)?;
        self.adjacency.get_key_value(id.as_str()).map(|(k, _)| k)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.resolve(raw).is_some()
    }

    /// All towers, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &TowerId> + '_ {
        self.adjacency.keys()
    }

    /// All links, each reported once
    pub fn edges(&self) -> Vec<Link> {
        let mut links = Vec::with_capacity(self.link_count);

        for (index, (a, neighbors)) in self.adjacency.iter().enumerate() {
            for (b, latency) in neighbors {
                // Emit from the endpoint inserted first
                let b_index = self.adjacency.get_index_of(b.as_str()).unwrap_or(usize::MAX);
                if index < b_index {
                    links.push(Link {
                        a: a.clone(),
                        b: b.clone(),
                        latency: *latency,
                    });
                }
            }
        }

        links
    }

    /// Neighbors of a tower with the latency of the connecting link.
    /// Unknown towers have no neighbors.
    pub fn neighbors_of(&self, raw: &str) -> Vec<(&TowerId, f64)> {
        let Some(id) = TowerId::normalize(raw) else {
            return Vec::new();
        };

        self.adjacency
            .get(id.as_str())
            .map(|neighbors| neighbors.iter().map(|(n, w)| (n, *w)).collect())
            .unwrap_or_default()
    }

    /// Number of links incident to a tower
    pub fn degree(&self, raw: &str) -> usize {
        TowerId::normalize(raw)
            .and_then(|id| self.adjacency.get(id.as_str()).map(IndexMap::len))
            .unwrap_or(0)
    }

    /// Latency of the link between two towers, if they are directly connected
    pub fn latency_between(&self, a: &str, b: &str) -> Option<f64> {
        let a = TowerId::normalize(a)?;
        let b = TowerId::normalize(b)?;
        self.adjacency.get(a.as_str())?.get(b.as_str()).copied()
    }

    pub(crate) fn adjacency_of(&self, id: &TowerId) -> Option<&IndexMap<TowerId, f64>> {
        self.adjacency.get(id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.link_count
    }
}
