// src/types.rs
//! Common data structures shared across validation and migration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Severity of a violation or cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Classification of a domain boundary violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Forbidden,
    NotAllowed,
    Circular,
}

/// A single edge that crosses a domain boundary it should not.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryViolation {
    pub source_file: PathBuf,
    pub target_file: PathBuf,
    pub source_domain: String,
    pub target_domain: String,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

/// A simple cycle in the dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct CyclicDependency {
    /// Ordered member files; the first element is repeated implicitly to close the loop.
    pub cycle_path: Vec<PathBuf>,
    pub involves_domains: BTreeSet<String>,
    pub severity: Severity,
    pub description: String,
}

impl CyclicDependency {
    /// Cycles confined to one domain are warnings; cross-domain cycles are errors.
    #[must_use]
    pub fn severity_for(domains: &BTreeSet<String>) -> Severity {
        if domains.len() == 1 {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

/// A public entry point with many consumers but no typed export surface.
#[derive(Debug, Clone, Serialize)]
pub struct PublicSurfaceViolation {
    pub file_path: PathBuf,
    pub kind: String,
    pub consumers: Vec<PathBuf>,
    pub description: String,
}

/// A high-degree file surfaced in graph statistics.
#[derive(Debug, Clone, Serialize)]
pub struct HubFile {
    pub file: PathBuf,
    pub connections: usize,
}

/// Aggregate shape metrics for a dependency graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub average_degree: f64,
    pub domain_distribution: std::collections::BTreeMap<String, usize>,
    pub component_count: usize,
    pub largest_component_size: usize,
    pub hub_files: Vec<HubFile>,
}

/// Complete validation report over a live or simulated graph.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub can_proceed_with_warnings: bool,
    pub total_files: usize,
    pub total_dependencies: usize,
    pub domain_violations: Vec<BoundaryViolation>,
    pub cyclic_dependencies: Vec<CyclicDependency>,
    pub cycles_truncated: bool,
    pub public_surface_violations: Vec<PublicSurfaceViolation>,
    pub orphaned_files: Vec<PathBuf>,
    pub statistics: GraphStatistics,
}

impl ValidationReport {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.domain_violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.domain_violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
            .count()
    }

    #[must_use]
    pub fn error_cycle_count(&self) -> usize {
        self.cyclic_dependencies
            .iter()
            .filter(|c| c.severity == Severity::Error)
            .count()
    }
}

/// A proposed file relocation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMove {
    pub from_path: PathBuf,
    pub to_path: PathBuf,
    pub from_domain: String,
    pub to_domain: String,
}
