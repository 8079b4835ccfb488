//! Pipeline inventory tracking.
//!
//! Single source of truth for "what stage is each project at and what runs
//! next", derived entirely from artifact files on disk rather than a log of
//! actions taken.

mod project;
mod tracker;

pub use project::{ProjectInventory, Stage, StageStatus};
pub use tracker::{InventoryError, InventoryTracker};
