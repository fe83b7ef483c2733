// src/policy/surface.rs
//! Public surface checker.
//!
//! Files treated as public entry points by naming or directory convention
//! should carry typed exports once they have many consumers.

use std::path::{Path, PathBuf};

use crate::graph::snapshot::GraphSnapshot;
use crate::types::PublicSurfaceViolation;

/// Importer count above which a public file must have a type association.
pub const CONSUMER_THRESHOLD: usize = 5;

const PUBLIC_STEMS: &[&str] = &["index", "public", "api"];
const PUBLIC_DIRS: &[&str] = &["public", "api"];
const CONSUMERS_SHOWN: usize = 5;

/// Scans the graph for widely-consumed public files lacking typed exports.
#[must_use]
pub fn check(graph: &GraphSnapshot) -> Vec<PublicSurfaceViolation> {
    let mut nodes: Vec<&PathBuf> = graph.node_paths().collect();
    nodes.sort();

    nodes
        .into_iter()
        .filter(|p| is_public_surface(p))
        .filter_map(|p| check_node(graph, p))
        .collect()
}

fn check_node(graph: &GraphSnapshot, path: &Path) -> Option<PublicSurfaceViolation> {
    let importers: Vec<PathBuf> = graph.predecessors(path).map(|e| e.source.clone()).collect();
    if importers.len() <= CONSUMER_THRESHOLD {
        return None;
    }
    if has_type_association(path) {
        return None;
    }

    let mut consumers = importers.clone();
    consumers.sort();
    consumers.truncate(CONSUMERS_SHOWN);

    Some(PublicSurfaceViolation {
        file_path: path.to_path_buf(),
        kind: "missing_type".to_string(),
        consumers,
        description: format!(
            "Public API used by {} files lacks type definitions",
            importers.len()
        ),
    })
}

fn is_public_surface(path: &Path) -> bool {
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        if PUBLIC_STEMS.contains(&stem) {
            return true;
        }
    }
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| PUBLIC_DIRS.contains(&s))
    })
}

fn has_type_association(path: &Path) -> bool {
    let s = path.to_string_lossy();
    s.contains("types") || s.ends_with(".d.ts")
}
