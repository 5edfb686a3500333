//! Domain types for the upgrade advisor.
//!
//! This module provides:
//! - Domain primitives: UpgradeId, UpgradeCategory
//! - The static-per-session tuning catalog (upgrade definitions + player tuning)
//! - The live game state snapshot (owned levels, tech stats, lane threat)
//! - The Recommendation value the engine hands to the executor

pub mod catalog;
pub mod primitives;
pub mod recommendation;
pub mod snapshot;

pub use catalog::{CatalogError, PlayerTuning, TuningCatalog, UpgradeDefinition};
pub use primitives::{UpgradeCategory, UpgradeId};
pub use recommendation::Recommendation;
pub use snapshot::{Enemy, GameStateSnapshot, Lane, PlayerTechStats};
