// src/policy/mod.rs
//! Domain boundary policy: per-edge evaluation and public surface checks.

pub mod engine;
pub mod surface;

pub use engine::PolicyEngine;
pub use surface::check as check_public_surface;
