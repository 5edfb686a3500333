//! Pure decision engine: cost-tree resolution, per-category scoring, and the
//! fixed-priority purchase decision. No I/O; everything reads the catalog and
//! snapshot passed in by the host.

use crate::domain::UpgradeId;
use thiserror::Error;

pub mod cost_tree;
pub mod decision;
pub mod derived;
pub mod policy;
pub mod scorers;

pub use cost_tree::{resolve, CostTree};
pub use decision::{DecisionEngine, DerivedStats};
pub use derived::{DerivedStatsCache, ElementalLevel};
pub use policy::{NecessaryUpgrade, PurchasePolicy, Strategy};

/// A scored purchase candidate within one category. `metric` is the
/// category's value-per-gold ratio; comparable across categories only where
/// the decision policy says so.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: UpgradeId,
    pub cost: f64,
    pub metric: f64,
}

/// Errors the engine can surface. Any of these makes the current
/// recommendation `none`: fail safe to inaction, never a wrong purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A policy list or snapshot referenced an id the catalog does not have.
    #[error("no catalog entry for upgrade {id}")]
    MissingUpgrade { id: UpgradeId },
}
