// src/graph/mod.rs
//! Module dependency graph: construction, resolution, cycles, statistics.

pub mod builder;
pub mod cycles;
pub mod resolver;
pub mod snapshot;
pub mod stats;

pub use builder::build;
pub use resolver::{resolve, FileProber, FsProber, SpecifierKind};
pub use snapshot::{DependencyEdge, FileNode, GraphSnapshot};
