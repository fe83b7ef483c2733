// src/policy/engine.rs
//! The boundary decision cascade. Rule order is load-bearing: first match
//! wins, and the capability exemption inspects the SOURCE file's own
//! outgoing dependency set, never the target's.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::ontology::{self, Ontology, MISC_DOMAIN};
use crate::graph::snapshot::{DependencyEdge, GraphSnapshot};
use crate::types::{BoundaryViolation, Severity, ViolationKind};

/// Evaluates edges against the ontology. Capabilities are computed once
/// per node per validation pass and cached.
pub struct PolicyEngine<'a> {
    graph: &'a GraphSnapshot,
    ontology: &'a Ontology,
    capability_cache: HashMap<PathBuf, Vec<&'static str>>,
}

impl<'a> PolicyEngine<'a> {
    #[must_use]
    pub fn new(graph: &'a GraphSnapshot, ontology: &'a Ontology) -> Self {
        Self {
            graph,
            ontology,
            capability_cache: HashMap::new(),
        }
    }

    /// Returns the violation for an edge, or `None` when the edge is allowed.
    pub fn evaluate(&mut self, edge: &DependencyEdge) -> Option<BoundaryViolation> {
        let source_domain = self.graph.domain_of(&edge.source).to_string();
        let target_domain = self.graph.domain_of(&edge.target).to_string();

        // Rule 1: same domain.
        if source_domain == target_domain {
            return None;
        }
        // Rule 2: shared/platform targets are unconditional.
        if Ontology::is_unconditional_target(&target_domain) {
            return None;
        }

        let rules = self.ontology.rules(&source_domain);

        // Rule 3: type-only leniency.
        if edge.is_type_only {
            if rules.type_only_domains.iter().any(|d| d == &target_domain) {
                return None;
            }
            return Some(BoundaryViolation {
                source_file: edge.source.clone(),
                target_file: edge.target.clone(),
                description: format!(
                    "Type-only import from {source_domain} to {target_domain} should be reviewed"
                ),
                suggested_fix: Some(
                    "Consider moving type definitions to the 'shared' domain".to_string(),
                ),
                source_domain,
                target_domain,
                kind: ViolationKind::NotAllowed,
                severity: Severity::Warning,
            });
        }

        // Rule 4: explicitly allowed domains.
        if rules.allowed_domains.iter().any(|d| d == &target_domain) {
            return None;
        }

        // Rule 5: capability exemption from the source's own dependency set.
        let source_capabilities = self.capabilities_of(&edge.source);
        if source_capabilities
            .iter()
            .any(|c| rules.capabilities.iter().any(|allowed| allowed == c))
        {
            return None;
        }

        // Rule 6: explicitly forbidden.
        if rules.forbidden_imports.iter().any(|d| d == &target_domain) {
            return Some(BoundaryViolation {
                source_file: edge.source.clone(),
                target_file: edge.target.clone(),
                description: format!(
                    "Import from {source_domain} to {target_domain} is forbidden"
                ),
                suggested_fix: Some(format!(
                    "Remove dependency or refactor to use allowed domains: {:?}",
                    rules.allowed_domains
                )),
                source_domain,
                target_domain,
                kind: ViolationKind::Forbidden,
                severity: Severity::Error,
            });
        }

        // Rule 7: not allowed. The misc bucket is deliberately lenient.
        let severity = if target_domain == MISC_DOMAIN {
            Severity::Warning
        } else {
            Severity::Error
        };
        Some(BoundaryViolation {
            source_file: edge.source.clone(),
            target_file: edge.target.clone(),
            description: format!(
                "Import from {source_domain} to {target_domain} violates domain boundaries"
            ),
            suggested_fix: Some(format!(
                "Consider using one of allowed domains: {:?}",
                rules.allowed_domains
            )),
            source_domain,
            target_domain,
            kind: ViolationKind::NotAllowed,
            severity,
        })
    }

    /// Capabilities a file possesses, derived from the domains reachable
    /// through its own outgoing edges plus its external package specifiers.
    pub fn capabilities_of(&mut self, path: &Path) -> Vec<&'static str> {
        if let Some(cached) = self.capability_cache.get(path) {
            return cached.clone();
        }

        let mut capabilities: Vec<&'static str> = Vec::new();
        for edge in self.graph.successors(path) {
            let target_domain = self.graph.domain_of(&edge.target);
            let hint = edge.target.to_string_lossy();
            if let Some(cap) = ontology::infer_capability(target_domain, &hint) {
                if !capabilities.contains(&cap) {
                    capabilities.push(cap);
                }
            }
        }
        for specifier in self.graph.externals_of(path) {
            if let Some(cap) = ontology::infer_capability("", specifier) {
                if !capabilities.contains(&cap) {
                    capabilities.push(cap);
                }
            }
        }

        self.capability_cache
            .insert(path.to_path_buf(), capabilities.clone());
        capabilities
    }
}
