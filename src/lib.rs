//! Core library for movecheck: builds a module dependency graph from
//! classifier output, validates domain boundaries and cycles, simulates
//! file-move batches, and plans/applies the import rewrites they require.

pub mod config;
pub mod error;
pub mod graph;
pub mod migrate;
pub mod policy;
pub mod records;
pub mod report;
pub mod types;
