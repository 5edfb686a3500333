//! Domain primitives: UpgradeId, UpgradeCategory.

use serde::{Deserialize, Serialize};

/// Identifier of an upgrade in the tuning catalog (small integer assigned by the game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpgradeId(pub i32);

impl UpgradeId {
    /// Create an UpgradeId from a raw integer.
    pub fn new(id: i32) -> Self {
        UpgradeId(id)
    }

    /// Get the underlying integer value.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of benefit an upgrade provides. Drives which scorer considers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeCategory {
    /// Raises max HP (armor tiers, shields).
    Health,
    /// Raises passive DPS (auto-fire tiers).
    PassiveDamage,
    /// Raises damage per click.
    ClickDamage,
    /// Elemental affinity levels (fire, water, earth, air).
    Elemental,
    /// One-shot purchasable abilities.
    Ability,
    /// Anything the scorers only reach through an explicit policy entry.
    Other,
}

impl UpgradeCategory {
    /// Map the game's numeric upgrade type code to a category.
    pub fn from_wire(type_code: i64) -> Self {
        match type_code {
            0 => UpgradeCategory::Health,
            1 => UpgradeCategory::PassiveDamage,
            2 => UpgradeCategory::ClickDamage,
            3 => UpgradeCategory::Elemental,
            4 => UpgradeCategory::Ability,
            _ => UpgradeCategory::Other,
        }
    }
}

impl std::fmt::Display for UpgradeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UpgradeCategory::Health => "health",
            UpgradeCategory::PassiveDamage => "passive_damage",
            UpgradeCategory::ClickDamage => "click_damage",
            UpgradeCategory::Elemental => "elemental",
            UpgradeCategory::Ability => "ability",
            UpgradeCategory::Other => "other",
        };
        write!(f, "{}", s)
    }
}
