// src/graph/stats.rs
//! Graph shape metrics for validation reports.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::types::{GraphStatistics, HubFile};

use super::snapshot::GraphSnapshot;

const HUB_COUNT: usize = 5;

/// Files with no incoming and no outgoing dependencies.
#[must_use]
pub fn orphans(graph: &GraphSnapshot) -> Vec<PathBuf> {
    let mut orphaned: Vec<PathBuf> = graph
        .node_paths()
        .filter(|p| graph.in_degree(p) == 0 && graph.out_degree(p) == 0)
        .cloned()
        .collect();
    orphaned.sort();
    orphaned
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute(graph: &GraphSnapshot) -> GraphStatistics {
    let total_nodes = graph.node_count();
    let total_edges = graph.edge_count();

    let mut domain_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for path in graph.node_paths() {
        *domain_distribution
            .entry(graph.domain_of(path).to_string())
            .or_default() += 1;
    }

    let average_degree = if total_nodes == 0 {
        0.0
    } else {
        (total_edges * 2) as f64 / total_nodes as f64
    };

    let (component_count, largest_component_size) = weak_components(graph);

    GraphStatistics {
        total_nodes,
        total_edges,
        average_degree,
        domain_distribution,
        component_count,
        largest_component_size,
        hub_files: hub_files(graph),
    }
}

/// Weakly connected components via BFS over the undirected view.
fn weak_components(graph: &GraphSnapshot) -> (usize, usize) {
    let mut undirected: HashMap<&Path, Vec<&Path>> = HashMap::new();
    for edge in graph.edges() {
        undirected.entry(&edge.source).or_default().push(&edge.target);
        undirected.entry(&edge.target).or_default().push(&edge.source);
    }

    let mut visited: HashSet<&Path> = HashSet::new();
    let mut count = 0;
    let mut largest = 0;

    for start in graph.node_paths() {
        if visited.contains(start.as_path()) {
            continue;
        }
        count += 1;
        let mut size = 0;
        let mut queue: VecDeque<&Path> = VecDeque::new();
        queue.push_back(start);
        visited.insert(start);

        while let Some(node) = queue.pop_front() {
            size += 1;
            if let Some(neighbors) = undirected.get(node) {
                for &n in neighbors {
                    if visited.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        largest = largest.max(size);
    }

    (count, largest)
}

fn hub_files(graph: &GraphSnapshot) -> Vec<HubFile> {
    let mut degrees: Vec<HubFile> = graph
        .node_paths()
        .map(|p| HubFile {
            file: p.clone(),
            connections: graph.in_degree(p) + graph.out_degree(p),
        })
        .collect();
    degrees.sort_by(|a, b| b.connections.cmp(&a.connections).then(a.file.cmp(&b.file)));
    degrees.truncate(HUB_COUNT);
    degrees
}
