// src/graph/snapshot.rs
//! An explicit, cheaply clonable graph value type.
//!
//! Each validation run owns its own snapshot; plan simulation clones it and
//! mutates only the copy. There is no shared mutable graph state anywhere.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Node attributes assigned by the external classifier.
#[derive(Debug, Clone)]
pub struct FileNode {
    pub domain: String,
    pub confidence: f64,
    pub requires_review: bool,
}

impl FileNode {
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            domain: "unknown".to_string(),
            confidence: 0.0,
            requires_review: false,
        }
    }
}

/// A resolved dependency between two files in the analyzed tree.
#[derive(Debug, Clone)]
pub struct DependencyEdge {
    pub source: PathBuf,
    pub target: PathBuf,
    pub specifier: String,
    pub is_type_only: bool,
    pub is_dynamic: bool,
    pub line: usize,
}

/// The dependency graph plus domain map for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    nodes: HashMap<PathBuf, FileNode>,
    edges: Vec<DependencyEdge>,
    outgoing: HashMap<PathBuf, Vec<usize>>,
    incoming: HashMap<PathBuf, Vec<usize>>,
    /// Bare (external package) specifiers per node, kept for capability inference.
    externals: HashMap<PathBuf, Vec<String>>,
}

impl GraphSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, path: PathBuf, node: FileNode) {
        self.nodes.insert(path, node);
    }

    /// Inserts a placeholder node when an edge resolves to an unclassified file.
    pub fn ensure_node(&mut self, path: &Path) {
        if !self.nodes.contains_key(path) {
            self.nodes.insert(path.to_path_buf(), FileNode::placeholder());
        }
    }

    /// Adds an edge. Both endpoints must already be nodes.
    pub fn add_edge(&mut self, edge: DependencyEdge) {
        debug_assert!(self.nodes.contains_key(&edge.source));
        debug_assert!(self.nodes.contains_key(&edge.target));
        let idx = self.edges.len();
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(idx);
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(idx);
        self.edges.push(edge);
    }

    pub fn add_external(&mut self, path: &Path, specifier: &str) {
        self.externals
            .entry(path.to_path_buf())
            .or_default()
            .push(specifier.to_string());
    }

    #[must_use]
    pub fn has_node(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    #[must_use]
    pub fn node(&self, path: &Path) -> Option<&FileNode> {
        self.nodes.get(path)
    }

    #[must_use]
    pub fn domain_of(&self, path: &Path) -> &str {
        self.nodes.get(path).map_or("unknown", |n| n.domain.as_str())
    }

    pub fn node_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.nodes.keys()
    }

    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn successors(&self, path: &Path) -> impl Iterator<Item = &DependencyEdge> {
        self.outgoing
            .get(path)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    pub fn predecessors(&self, path: &Path) -> impl Iterator<Item = &DependencyEdge> {
        self.incoming
            .get(path)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    #[must_use]
    pub fn out_degree(&self, path: &Path) -> usize {
        self.outgoing.get(path).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn in_degree(&self, path: &Path) -> usize {
        self.incoming.get(path).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn externals_of(&self, path: &Path) -> &[String] {
        self.externals.get(path).map_or(&[], Vec::as_slice)
    }

    /// All edges with the given node as either endpoint, cloned for
    /// borrow-free iteration during simulation.
    #[must_use]
    pub fn edges_touching(&self, path: &Path) -> Vec<DependencyEdge> {
        let mut indices: Vec<usize> = Vec::new();
        if let Some(out) = self.outgoing.get(path) {
            indices.extend(out);
        }
        if let Some(inc) = self.incoming.get(path) {
            indices.extend(inc);
        }
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| self.edges[i].clone()).collect()
    }

    /// Relocates a node: renames it, re-points every incoming and outgoing
    /// edge, and assigns the new domain. The move-simulation primitive.
    pub fn relabel(&mut self, from: &Path, to: &Path, new_domain: &str) {
        let Some(mut node) = self.nodes.remove(from) else {
            return;
        };
        node.domain = new_domain.to_string();
        self.nodes.insert(to.to_path_buf(), node);

        for edge in &mut self.edges {
            if edge.source == from {
                edge.source = to.to_path_buf();
            }
            if edge.target == from {
                edge.target = to.to_path_buf();
            }
        }
        if let Some(ext) = self.externals.remove(from) {
            self.externals.insert(to.to_path_buf(), ext);
        }
        self.reindex();
    }

    fn reindex(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
        for (idx, edge) in self.edges.iter().enumerate() {
            self.outgoing.entry(edge.source.clone()).or_default().push(idx);
            self.incoming.entry(edge.target.clone()).or_default().push(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str) -> DependencyEdge {
        DependencyEdge {
            source: PathBuf::from(from),
            target: PathBuf::from(to),
            specifier: String::new(),
            is_type_only: false,
            is_dynamic: false,
            line: 1,
        }
    }

    fn node(domain: &str) -> FileNode {
        FileNode {
            domain: domain.to_string(),
            confidence: 1.0,
            requires_review: false,
        }
    }

    #[test]
    fn test_relabel_repoints_edges_and_domain() {
        let mut g = GraphSnapshot::new();
        g.add_node(PathBuf::from("/a.ts"), node("auth"));
        g.add_node(PathBuf::from("/b.ts"), node("ui"));
        g.add_edge(edge("/a.ts", "/b.ts"));
        g.add_edge(edge("/b.ts", "/a.ts"));

        g.relabel(Path::new("/a.ts"), Path::new("/moved/a.ts"), "shared");

        assert!(!g.has_node(Path::new("/a.ts")));
        assert_eq!(g.domain_of(Path::new("/moved/a.ts")), "shared");
        // Other node attributes survive the relabel.
        let moved = g.node(Path::new("/moved/a.ts")).unwrap();
        assert!((moved.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(g.out_degree(Path::new("/moved/a.ts")), 1);
        assert_eq!(g.in_degree(Path::new("/moved/a.ts")), 1);
        assert_eq!(
            g.successors(Path::new("/b.ts")).next().unwrap().target,
            PathBuf::from("/moved/a.ts")
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut g = GraphSnapshot::new();
        g.add_node(PathBuf::from("/a.ts"), node("auth"));
        let copy = g.clone();
        g.relabel(Path::new("/a.ts"), Path::new("/z.ts"), "misc");
        assert!(copy.has_node(Path::new("/a.ts")));
        assert!(!g.has_node(Path::new("/a.ts")));
    }
}
