//! Tuning catalog: the static-per-session table of upgrade definitions.

use super::primitives::{UpgradeCategory, UpgradeId};
use serde::Deserialize;
use thiserror::Error;

/// One upgrade definition from the game's tuning data. Immutable for the session.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeDefinition {
    pub id: UpgradeId,
    pub name: String,
    pub category: UpgradeCategory,
    /// Cost of the first level.
    pub cost: f64,
    /// Per-level cost growth; level n costs `cost * cost_exponential_base^n`.
    #[serde(default = "default_growth")]
    pub cost_exponential_base: f64,
    /// Per-level effect multiplier, interpreted per category.
    #[serde(default)]
    pub multiplier: f64,
    /// Prerequisite upgrade, if any. At most one; chains only, no fan-in.
    #[serde(default)]
    pub required_upgrade: Option<UpgradeId>,
    /// Level the prerequisite must reach before this upgrade unlocks.
    #[serde(default = "default_required_level")]
    pub required_upgrade_level: u32,
}

fn default_growth() -> f64 {
    1.0
}

fn default_required_level() -> u32 {
    1
}

impl UpgradeDefinition {
    /// Cost of buying the next level when `level` levels are already owned.
    pub fn next_level_cost(&self, level: u32) -> f64 {
        self.cost * self.cost_exponential_base.powi(level as i32)
    }
}

/// Base player tuning numbers (pre-upgrade baselines).
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerTuning {
    pub damage_per_click: f64,
    pub hp: f64,
    #[serde(default)]
    pub crit_percentage: f64,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("upgrade {0} requires unknown upgrade {1}")]
    UnknownRequirement(UpgradeId, UpgradeId),
    #[error("prerequisite chain of upgrade {0} contains a cycle")]
    CyclicRequirement(UpgradeId),
}

/// The full tuning catalog. Owned by the host, read by the engine.
#[derive(Debug, Clone)]
pub struct TuningCatalog {
    upgrades: Vec<UpgradeDefinition>,
    pub player: PlayerTuning,
}

impl TuningCatalog {
    /// Build a catalog, validating the prerequisite invariant: every
    /// requirement resolves and chains are acyclic.
    pub fn new(upgrades: Vec<UpgradeDefinition>, player: PlayerTuning) -> Result<Self, CatalogError> {
        let catalog = Self { upgrades, player };
        for def in &catalog.upgrades {
            let mut hops = 0usize;
            let mut cursor = def;
            while let Some(required) = cursor.required_upgrade {
                cursor = catalog
                    .get(required)
                    .ok_or(CatalogError::UnknownRequirement(cursor.id, required))?;
                hops += 1;
                if hops > catalog.upgrades.len() {
                    return Err(CatalogError::CyclicRequirement(def.id));
                }
            }
        }
        Ok(catalog)
    }

    /// Look up an upgrade definition by id.
    pub fn get(&self, id: UpgradeId) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    /// Iterate upgrades of one category in stable catalog order.
    pub fn by_category(
        &self,
        category: UpgradeCategory,
    ) -> impl Iterator<Item = &UpgradeDefinition> {
        self.upgrades.iter().filter(move |u| u.category == category)
    }

    /// All upgrade definitions in catalog order.
    pub fn upgrades(&self) -> &[UpgradeDefinition] {
        &self.upgrades
    }
}
