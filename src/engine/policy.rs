//! Tunable strategy knobs and the pinned purchase policy lists.

use crate::domain::UpgradeId;

/// Numeric strategy knobs, host-configurable per session.
#[derive(Debug, Clone)]
pub struct Strategy {
    /// Minimum acceptable time-to-die in seconds. Below this, health
    /// upgrades preempt everything but the necessary list.
    pub survival_time_secs: f64,
    /// Per-rank weights applied to the elemental ranking when estimating the
    /// contribution of elemental levels to average click damage. Front-loaded
    /// toward the top rank on the assumption that play time concentrates in
    /// lanes of the strongest elements.
    pub elemental_weights: Vec<f64>,
    /// How many elementals to keep leveled together. The elemental scorer
    /// always proposes one more level for the Nth-ranked elemental.
    pub elemental_specializations: usize,
    /// Assumed sustained clicks per second, used to scale passive DPS boosts
    /// into click-damage terms.
    pub clicks_per_second: f64,
    /// Whether the ability scorer runs at all. Abilities in the necessary
    /// list are bought regardless.
    pub buy_abilities: bool,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            survival_time_secs: 30.0,
            elemental_weights: vec![0.4, 0.3, 0.2, 0.1],
            elemental_specializations: 1,
            clicks_per_second: 20.0,
            buy_abilities: false,
        }
    }
}

/// One entry of the necessary-upgrade list: hold this upgrade at this level
/// before any economic scoring happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NecessaryUpgrade {
    pub id: UpgradeId,
    pub level: u32,
}

impl NecessaryUpgrade {
    pub fn new(id: i32, level: u32) -> Self {
        Self {
            id: UpgradeId::new(id),
            level,
        }
    }
}

/// Pinned upgrade lists: the mandatory baseline, the ability priority order,
/// and the designated crit-chance item.
#[derive(Debug, Clone)]
pub struct PurchasePolicy {
    /// Walked in order; entries are discarded permanently once satisfied.
    pub necessary: Vec<NecessaryUpgrade>,
    /// Ability purchase order, best first. Only consulted when the
    /// buy-abilities flag is set.
    pub abilities: Vec<UpgradeId>,
    /// The crit-chance item scored alongside click-damage upgrades.
    pub crit_item: Option<UpgradeId>,
}

impl Default for PurchasePolicy {
    fn default() -> Self {
        Self {
            necessary: vec![
                NecessaryUpgrade::new(0, 1),  // Light Armor
                NecessaryUpgrade::new(11, 1), // Medics
                NecessaryUpgrade::new(2, 10), // Armor Piercing Rounds
                NecessaryUpgrade::new(1, 10), // Auto-fire Cannon
            ],
            abilities: [11, 13, 16, 18, 17, 14, 15, 12]
                .into_iter()
                .map(UpgradeId::new)
                .collect(),
            crit_item: Some(UpgradeId::new(7)), // Lucky Shot
        }
    }
}
