use std::collections::BTreeSet;

use proptest::prelude::*;
use rednet::{NetworkAnalyzer, PathEngine, PathError, TowerGraph};

const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Small graphs: up to 6 towers, integer latencies so sums compare exactly
fn arb_graph() -> impl Strategy<Value = TowerGraph> {
    let link = (0..NAMES.len(), 0..NAMES.len(), 0u32..50);
    (
        prop::collection::vec(link, 0..14),
        prop::collection::vec(0..NAMES.len(), 0..3),
    )
        .prop_map(|(links, lonely)| {
            let mut graph = TowerGraph::new();
            for (a, b, w) in links {
                if a != b {
                    graph.add_link(NAMES[a], NAMES[b], w as f64).unwrap();
                }
            }
            for t in lonely {
                graph.add_tower(NAMES[t]).unwrap();
            }
            graph
        })
}

/// Same shape with tenths as latencies, where addition order shows in the last bits
fn arb_fractional_graph() -> impl Strategy<Value = TowerGraph> {
    let link = (0..NAMES.len(), 0..NAMES.len(), 1u32..50);
    prop::collection::vec(link, 0..14).prop_map(|links| {
        let mut graph = TowerGraph::new();
        for (a, b, w) in links {
            if a != b {
                graph.add_link(NAMES[a], NAMES[b], w as f64 / 10.0).unwrap();
            }
        }
        graph
    })
}

/// Minimum cost over all simple paths, by exhaustive search
fn brute_force(graph: &TowerGraph, from: &str, to: &str) -> Option<f64> {
    fn walk(
        graph: &TowerGraph,
        at: &str,
        to: &str,
        cost: f64,
        seen: &mut BTreeSet<String>,
        best: &mut Option<f64>,
    ) {
        if at == to {
            if best.map_or(true, |b| cost < b) {
                *best = Some(cost);
            }
            return;
        }
        for (next, w) in graph.neighbors_of(at) {
            if seen.insert(next.to_string()) {
                walk(graph, next.as_str(), to, cost + w, seen, best);
                seen.remove(next.as_str());
            }
        }
    }

    let mut best = None;
    let mut seen = BTreeSet::from([from.to_string()]);
    walk(graph, from, to, 0.0, &mut seen, &mut best);
    best
}

proptest! {
    #[test]
    fn dijkstra_matches_brute_force(graph in arb_graph(), i in 0..NAMES.len(), j in 0..NAMES.len()) {
        let (from, to) = (NAMES[i], NAMES[j]);
        let result = PathEngine::shortest_path(&graph, from, to);

        if !graph.contains(from) || !graph.contains(to) {
            prop_assert!(matches!(result, Err(PathError::UnknownNode(_))));
            return Ok(());
        }

        match (result, brute_force(&graph, from, to)) {
            (Ok(path), Some(expected)) => {
                prop_assert_eq!(path.cost(), expected);
                prop_assert_eq!(path.origin().as_str(), from);
                prop_assert_eq!(path.destination().as_str(), to);

                // consecutive towers are linked and the weights add up
                let mut total = 0.0;
                for pair in path.towers().windows(2) {
                    let w = graph.latency_between(pair[0].as_str(), pair[1].as_str());
                    prop_assert!(w.is_some());
                    total += w.unwrap();
                }
                prop_assert_eq!(total, path.cost());
            }
            (Err(PathError::NoPath { .. }), None) => {}
            (other, expected) => {
                prop_assert!(false, "engine returned {:?}, brute force {:?}", other, expected);
            }
        }
    }

    #[test]
    fn cost_is_symmetric(graph in arb_graph(), i in 0..NAMES.len(), j in 0..NAMES.len()) {
        let forward = PathEngine::shortest_path(&graph, NAMES[i], NAMES[j]).map(|p| p.cost());
        let backward = PathEngine::shortest_path(&graph, NAMES[j], NAMES[i]).map(|p| p.cost());
        match (forward, backward) {
            (Ok(f), Ok(b)) => prop_assert_eq!(f, b),
            (Err(PathError::NoPath { .. }), Err(PathError::NoPath { .. })) => {}
            (Err(PathError::UnknownNode(_)), Err(PathError::UnknownNode(_))) => {}
            (f, b) => prop_assert!(false, "asymmetric results {:?} / {:?}", f, b),
        }
    }

    #[test]
    fn fractional_cost_is_symmetric_within_tolerance(
        graph in arb_fractional_graph(),
        i in 0..NAMES.len(),
        j in 0..NAMES.len(),
    ) {
        let forward = PathEngine::shortest_path(&graph, NAMES[i], NAMES[j]).map(|p| p.cost());
        let backward = PathEngine::shortest_path(&graph, NAMES[j], NAMES[i]).map(|p| p.cost());
        match (forward, backward) {
            (Ok(f), Ok(b)) => prop_assert!((f - b).abs() < 1e-9, "{} vs {}", f, b),
            (Err(PathError::NoPath { .. }), Err(PathError::NoPath { .. })) => {}
            (Err(PathError::UnknownNode(_)), Err(PathError::UnknownNode(_))) => {}
            (f, b) => prop_assert!(false, "asymmetric results {:?} / {:?}", f, b),
        }
    }

    #[test]
    fn path_to_self_is_free(graph in arb_graph(), i in 0..NAMES.len()) {
        if graph.contains(NAMES[i]) {
            let path = PathEngine::shortest_path(&graph, NAMES[i], NAMES[i]).unwrap();
            prop_assert_eq!(path.cost(), 0.0);
            prop_assert_eq!(path.towers().len(), 1);
        }
    }

    #[test]
    fn negative_weight_never_mutates(graph in arb_graph(), i in 0..NAMES.len(), w in -100.0f64..-0.001) {
        let mut mutated = graph.clone();
        let before_nodes: Vec<_> = graph.nodes().cloned().collect();

        prop_assert!(mutated.add_link(NAMES[i], "NEW", w).is_err());

        let after_nodes: Vec<_> = mutated.nodes().cloned().collect();
        prop_assert_eq!(before_nodes, after_nodes);
        prop_assert_eq!(graph.edges(), mutated.edges());
    }

    #[test]
    fn isolated_nodes_have_no_neighbors(graph in arb_graph()) {
        let isolated = NetworkAnalyzer::new(&graph).isolated_nodes();
        let expected: BTreeSet<_> = graph
            .nodes()
            .filter(|t| graph.neighbors_of(t.as_str()).is_empty())
            .cloned()
            .collect();
        prop_assert_eq!(isolated, expected);
    }

    #[test]
    fn averages_cover_linked_towers_only(graph in arb_graph()) {
        let averages = NetworkAnalyzer::new(&graph).average_latency_per_node();
        for tower in graph.nodes() {
            let neighbors = graph.neighbors_of(tower.as_str());
            match averages.get(tower.as_str()) {
                Some(avg) => {
                    prop_assert!(!neighbors.is_empty());
                    let mean = neighbors.iter().map(|(_, w)| w).sum::<f64>() / neighbors.len() as f64;
                    prop_assert!((avg - mean).abs() < 1e-9);
                }
                None => prop_assert!(neighbors.is_empty()),
            }
        }
    }
}
