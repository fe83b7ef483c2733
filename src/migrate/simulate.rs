// src/migrate/simulate.rs
//! Validates a batch of proposed moves against a deep copy of the graph.
//!
//! The live snapshot is never mutated and the filesystem is never touched;
//! all mutation happens on a private clone discarded at the end of the call.

use crate::config::Ontology;
use crate::graph::cycles;
use crate::graph::snapshot::GraphSnapshot;
use crate::policy::PolicyEngine;
use crate::report::{self, ValidationOptions};
use crate::types::{BoundaryViolation, FileMove, ValidationReport};

/// Simulates the moves and reports the violations and cycles the mutated
/// graph would have.
///
/// Policy is re-run incrementally against the edges touching each moved
/// node as soon as the move is applied, so violations introduced by
/// earlier moves in the same batch are caught. The cycle detector runs
/// once over the final mutated graph.
#[must_use]
pub fn simulate_moves(
    graph: &GraphSnapshot,
    ontology: &Ontology,
    moves: &[FileMove],
    options: &ValidationOptions,
) -> ValidationReport {
    let mut sim = graph.clone();
    let mut violations: Vec<BoundaryViolation> = Vec::new();

    for mv in moves {
        if sim.has_node(&mv.from_path) {
            sim.relabel(&mv.from_path, &mv.to_path, &mv.to_domain);
        }

        let touching = sim.edges_touching(&mv.to_path);
        let mut engine = PolicyEngine::new(&sim, ontology);
        for edge in &touching {
            if let Some(violation) = engine.evaluate(edge) {
                violations.push(violation);
            }
        }
    }

    let scan = cycles::enumerate(&sim, options.max_cycles);

    // Public surface and orphan scans are skipped for plans, matching the
    // live report's structure with empty sections.
    report::assemble(&sim, violations, scan, Vec::new(), Vec::new())
}
