//! Topology module - Graph model and algorithms for tower networks

pub mod analyzer;
pub mod engine;
pub mod graph;
pub mod loader;

pub use analyzer::NetworkAnalyzer;
pub use engine::{PathEngine, TowerPath};
pub use graph::{Link, TowerGraph, TowerId};
pub use loader::TopologyDocument;
