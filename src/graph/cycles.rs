// src/graph/cycles.rs
//! Simple-cycle enumeration over a dependency graph.
//!
//! Enumeration can be exponential on pathological graphs, so the scan is
//! capped: once `max_cycles` is reached the result is marked truncated and
//! the search stops instead of hanging.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::types::{CyclicDependency, Severity};

use super::snapshot::GraphSnapshot;

/// Default upper bound on enumerated cycles.
pub const DEFAULT_MAX_CYCLES: usize = 1000;

/// Result of a cycle scan.
#[derive(Debug, Default)]
pub struct CycleScan {
    pub cycles: Vec<CyclicDependency>,
    pub truncated: bool,
}

/// Enumerates simple cycles and classifies each by the set of domains its
/// members span: single-domain cycles are warnings, cross-domain cycles
/// are errors.
#[must_use]
pub fn enumerate(graph: &GraphSnapshot, max_cycles: usize) -> CycleScan {
    let mut nodes: Vec<&PathBuf> = graph.node_paths().collect();
    nodes.sort();

    let order: HashMap<&Path, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_path(), i))
        .collect();

    let mut state = DfsState {
        graph,
        order: &order,
        on_path: HashSet::new(),
        path_stack: Vec::new(),
        raw_cycles: Vec::new(),
        max_cycles,
        truncated: false,
    };

    // Each cycle is discovered exactly once: the DFS rooted at node `s`
    // only visits nodes ordered at or after `s`, so a cycle is reported
    // from its smallest member.
    for start in &nodes {
        if state.truncated {
            break;
        }
        state.search(start, start);
    }

    let cycles = state
        .raw_cycles
        .into_iter()
        .map(|path| classify(graph, path))
        .collect();

    CycleScan {
        cycles,
        truncated: state.truncated,
    }
}

struct DfsState<'a> {
    graph: &'a GraphSnapshot,
    order: &'a HashMap<&'a Path, usize>,
    on_path: HashSet<PathBuf>,
    path_stack: Vec<PathBuf>,
    raw_cycles: Vec<Vec<PathBuf>>,
    max_cycles: usize,
    truncated: bool,
}

impl DfsState<'_> {
    fn search(&mut self, start: &Path, node: &Path) {
        self.on_path.insert(node.to_path_buf());
        self.path_stack.push(node.to_path_buf());

        let mut targets: Vec<PathBuf> = self
            .graph
            .successors(node)
            .map(|e| e.target.clone())
            .collect();
        targets.sort();
        targets.dedup();

        for target in targets {
            if self.truncated {
                break;
            }
            if target == start {
                self.record_cycle();
            } else if self.admissible(start, &target) {
                self.search(start, &target);
            }
        }

        self.path_stack.pop();
        self.on_path.remove(node);
    }

    fn admissible(&self, start: &Path, target: &Path) -> bool {
        if self.on_path.contains(target) {
            return false;
        }
        let (Some(&s), Some(&t)) = (self.order.get(start), self.order.get(target)) else {
            return false;
        };
        t > s
    }

    fn record_cycle(&mut self) {
        if self.raw_cycles.len() >= self.max_cycles {
            self.truncated = true;
            return;
        }
        self.raw_cycles.push(self.path_stack.clone());
    }
}

fn classify(graph: &GraphSnapshot, path: Vec<PathBuf>) -> CyclicDependency {
    let domains: BTreeSet<String> = path
        .iter()
        .map(|p| graph.domain_of(p).to_string())
        .collect();
    let severity = CyclicDependency::severity_for(&domains);
    let description = format!(
        "Circular dependency involving {} files across {} domain(s)",
        path.len(),
        domains.len()
    );
    CyclicDependency {
        cycle_path: path,
        involves_domains: domains,
        severity,
        description,
    }
}

/// Convenience predicate used by reports.
#[must_use]
pub fn has_error_cycles(scan: &CycleScan) -> bool {
    scan.cycles.iter().any(|c| c.severity == Severity::Error)
}
