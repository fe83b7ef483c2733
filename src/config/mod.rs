// src/config/mod.rs
//! Static configuration: path-mapping table and domain ontology.

pub mod ontology;
pub mod pathmap;

pub use ontology::{DomainRules, Ontology};
pub use pathmap::{AliasEntry, PathMap};
