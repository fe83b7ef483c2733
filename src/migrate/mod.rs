// src/migrate/mod.rs
//! Migration planning: move simulation, import rewrite planning, edit
//! application, and post-apply verification.

pub mod apply;
pub mod cache;
pub mod plan;
pub mod simulate;
pub mod verify;

pub use apply::{apply_plan, ApplyOutcome};
pub use cache::SourceCache;
pub use plan::{create_plan, ImportRewritePlan, ImportUpdate};
pub use simulate::simulate_moves;
pub use verify::{verify_imports, verify_plan, MoveOverlay};
