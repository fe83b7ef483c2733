// src/report.rs
//! Composes the policy engine, cycle detector and public surface checker
//! into a [`ValidationReport`] over a graph snapshot.

use serde::Serialize;

use crate::config::Ontology;
use crate::graph::cycles::{self, CycleScan};
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::stats;
use crate::policy::{self, PolicyEngine};
use crate::types::{
    BoundaryViolation, PublicSurfaceViolation, Severity, ValidationReport, ViolationKind,
};

/// Live validation is lenient up to these totals; past them the report
/// refuses to green-light proceeding.
const MAX_TOLERATED_WARNINGS: usize = 10;
const MAX_TOLERATED_ERRORS: usize = 5;

/// Knobs for a validation pass.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    pub max_cycles: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_cycles: cycles::DEFAULT_MAX_CYCLES,
        }
    }
}

/// Validates the current state of a dependency graph.
#[must_use]
pub fn validate_graph(
    graph: &GraphSnapshot,
    ontology: &Ontology,
    options: &ValidationOptions,
) -> ValidationReport {
    let mut engine = PolicyEngine::new(graph, ontology);
    let violations: Vec<BoundaryViolation> = graph
        .edges()
        .iter()
        .filter_map(|edge| engine.evaluate(edge))
        .collect();

    let scan = cycles::enumerate(graph, options.max_cycles);
    let surface = policy::check_public_surface(graph);
    let orphans = stats::orphans(graph);

    assemble(graph, violations, scan, surface, orphans)
}

/// Builds the final report from component results. Shared by live
/// validation and plan simulation.
#[must_use]
pub fn assemble(
    graph: &GraphSnapshot,
    domain_violations: Vec<BoundaryViolation>,
    scan: CycleScan,
    public_surface_violations: Vec<PublicSurfaceViolation>,
    orphaned_files: Vec<std::path::PathBuf>,
) -> ValidationReport {
    let errors = domain_violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    let warnings = domain_violations
        .iter()
        .filter(|v| v.severity == Severity::Warning)
        .count();
    let is_valid = errors == 0 && !cycles::has_error_cycles(&scan);
    let can_proceed_with_warnings =
        is_valid || (warnings < MAX_TOLERATED_WARNINGS && errors < MAX_TOLERATED_ERRORS);

    ValidationReport {
        is_valid,
        can_proceed_with_warnings,
        total_files: graph.node_count(),
        total_dependencies: graph.edge_count(),
        domain_violations,
        cyclic_dependencies: scan.cycles,
        cycles_truncated: scan.truncated,
        public_surface_violations,
        orphaned_files,
        statistics: stats::compute(graph),
    }
}

/// A remediation suggestion for one violation.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedFix {
    pub fix_type: String,
    pub description: String,
    pub alternative: String,
}

/// Human-readable fix suggestions, one per violation.
#[must_use]
pub fn suggest_fixes(ontology: &Ontology, violations: &[BoundaryViolation]) -> Vec<SuggestedFix> {
    violations
        .iter()
        .map(|v| {
            let allowed = ontology.rules(&v.source_domain).allowed_domains;
            match v.kind {
                ViolationKind::Forbidden => SuggestedFix {
                    fix_type: "remove_dependency".to_string(),
                    description: format!(
                        "Remove import from {} to {}",
                        v.source_file.display(),
                        v.target_file.display()
                    ),
                    alternative: format!("Use a service from allowed domains: {allowed:?}"),
                },
                ViolationKind::NotAllowed => SuggestedFix {
                    fix_type: "refactor".to_string(),
                    description: format!(
                        "Refactor {} to remove dependency on {}",
                        v.source_file.display(),
                        v.target_domain
                    ),
                    alternative: "Consider moving shared code to the 'shared' domain".to_string(),
                },
                ViolationKind::Circular => SuggestedFix {
                    fix_type: "break_cycle".to_string(),
                    description: format!(
                        "Break circular dependency between {} and {}",
                        v.source_file.display(),
                        v.target_file.display()
                    ),
                    alternative: "Extract common code to a third module".to_string(),
                },
            }
        })
        .collect()
}
