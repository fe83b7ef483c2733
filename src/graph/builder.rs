// src/graph/builder.rs
//! Builds a [`GraphSnapshot`] from classifier records.

use std::path::Path;

use crate::config::PathMap;
use crate::records::ClassifiedFile;

use super::resolver::{self, FileProber, SpecifierKind};
use super::snapshot::{DependencyEdge, FileNode, GraphSnapshot};

/// Builds the dependency graph: nodes first, then one resolution pass per
/// raw specifier. Unresolved specifiers are silently dropped; partial
/// graphs are expected and downstream code tolerates disconnected nodes.
#[must_use]
pub fn build(
    records: &[ClassifiedFile],
    pathmap: &PathMap,
    prober: &dyn FileProber,
) -> GraphSnapshot {
    let mut graph = GraphSnapshot::new();

    for record in records {
        graph.add_node(
            record.file_path.clone(),
            FileNode {
                domain: record.domain.clone(),
                confidence: record.confidence,
                requires_review: record.requires_review,
            },
        );
    }

    for record in records {
        for dep in &record.dependencies {
            add_dependency(&mut graph, pathmap, &record.file_path, dep, prober);
        }
    }

    graph
}

fn add_dependency(
    graph: &mut GraphSnapshot,
    pathmap: &PathMap,
    from: &Path,
    dep: &crate::records::RawImport,
    prober: &dyn FileProber,
) {
    let specifier = dep.specifier();

    match resolver::resolve(pathmap, from, specifier, prober) {
        Some(target) if target != from => {
            graph.ensure_node(&target);
            graph.add_edge(DependencyEdge {
                source: from.to_path_buf(),
                target,
                specifier: specifier.to_string(),
                is_type_only: dep.is_type_only(),
                is_dynamic: dep.is_dynamic(),
                line: dep.line(),
            });
        }
        Some(_) => {} // self-import, skip
        None => {
            // External packages are not edges but still feed capability inference.
            if resolver::specifier_kind(specifier) == SpecifierKind::Package {
                graph.add_external(from, specifier);
            }
        }
    }
}
