//! The engine's single "buy this next" output.

use super::primitives::UpgradeId;

/// The current purchase recommendation. `id: None` means nothing is worth
/// queuing; the executor must not attempt a purchase in that state.
///
/// Invalidated wholesale (back to `none`) on purchase-attempt start, purchase
/// completion, and survivability re-checks; never partially updated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub id: Option<UpgradeId>,
    pub cost: f64,
}

impl Recommendation {
    pub fn none() -> Self {
        Self { id: None, cost: 0.0 }
    }

    pub fn buy(id: UpgradeId, cost: f64) -> Self {
        Self { id: Some(id), cost }
    }

    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }

    /// Wire form of the id; the game uses -1 as the "no upgrade" sentinel.
    pub fn wire_id(&self) -> i32 {
        self.id.map(|id| id.as_i32()).unwrap_or(-1)
    }
}

impl Default for Recommendation {
    fn default() -> Self {
        Self::none()
    }
}
