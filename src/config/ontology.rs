// src/config/ontology.rs
//! Domain ontology: which domains may depend on which.
//!
//! `shared` and `platform` are privileged targets; any file may depend on
//! them unconditionally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{MoveCheckError, Result};

/// Domains every file may depend on without restriction.
pub const UNCONDITIONAL_TARGETS: &[&str] = &["shared", "platform"];

/// The catch-all bucket for unclassified files. Unlisted dependencies into
/// it are downgraded to warnings; this asymmetry is a deliberate leniency,
/// not a correctness law.
pub const MISC_DOMAIN: &str = "misc";

/// Per-domain boundary rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainRules {
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub type_only_domains: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub forbidden_imports: Vec<String>,
}

/// The full domain ontology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ontology {
    pub domains: BTreeMap<String, DomainRules>,
}

impl Ontology {
    /// Loads an ontology from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MoveCheckError::io(e, path))?;
        let ontology: Ontology = toml::from_str(&content)?;
        Ok(ontology)
    }

    /// Rules for a domain; unknown domains get empty (deny-by-default) rules.
    #[must_use]
    pub fn rules(&self, domain: &str) -> DomainRules {
        self.domains.get(domain).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn is_unconditional_target(domain: &str) -> bool {
        UNCONDITIONAL_TARGETS.contains(&domain)
    }
}

impl Default for Ontology {
    /// The platform's built-in domain set.
    fn default() -> Self {
        let mut domains = BTreeMap::new();
        let entry = |allowed: &[&str], type_only: &[&str], caps: &[&str], forbidden: &[&str]| {
            DomainRules {
                allowed_domains: allowed.iter().map(|s| (*s).to_string()).collect(),
                type_only_domains: type_only.iter().map(|s| (*s).to_string()).collect(),
                capabilities: caps.iter().map(|s| (*s).to_string()).collect(),
                forbidden_imports: forbidden.iter().map(|s| (*s).to_string()).collect(),
            }
        };

        domains.insert(
            "auth".to_string(),
            entry(&["messaging"], &["data"], &[], &["business"]),
        );
        domains.insert(
            "ai".to_string(),
            entry(&["data", "content"], &[], &["analytics"], &[]),
        );
        domains.insert(
            "content".to_string(),
            entry(&["storage", "ai"], &[], &["storage"], &[]),
        );
        domains.insert(
            "messaging".to_string(),
            entry(&["auth", "realtime"], &[], &["realtime"], &[]),
        );
        domains.insert(
            "analytics".to_string(),
            entry(&["data"], &["business"], &[], &[]),
        );
        domains.insert(
            "business".to_string(),
            entry(&["auth", "messaging"], &[], &[], &[]),
        );
        domains.insert("data".to_string(), entry(&["storage"], &[], &[], &[]));
        domains.insert("storage".to_string(), entry(&[], &[], &[], &[]));
        domains.insert("realtime".to_string(), entry(&["messaging"], &[], &[], &[]));
        domains.insert("ui".to_string(), entry(&[], &[], &[], &[]));
        domains.insert("shared".to_string(), entry(&[], &[], &[], &[]));
        domains.insert("platform".to_string(), entry(&[], &[], &[], &[]));
        domains.insert("misc".to_string(), entry(&[], &[], &[], &[]));

        Self { domains }
    }
}

/// Infers a capability tag from a dependency's target domain or path text.
#[must_use]
pub fn infer_capability(target_domain: &str, target_hint: &str) -> Option<&'static str> {
    if target_domain == "analytics" || target_hint.contains("analytics") {
        Some("analytics")
    } else if target_domain == "messaging" || target_hint.contains("message") {
        Some("messaging")
    } else if target_domain == "storage" || target_hint.contains("storage") {
        Some("storage")
    } else if target_hint.contains("realtime") || target_hint.contains("websocket") {
        Some("realtime")
    } else {
        None
    }
}
