//! Live game state snapshot, refreshed by the host between engine passes.

use super::catalog::UpgradeDefinition;
use super::primitives::UpgradeId;
use std::collections::HashMap;

/// Player stats as reported by the game's tech tree, upgrades already applied.
#[derive(Debug, Clone, Default)]
pub struct PlayerTechStats {
    pub damage_per_click: f64,
    /// Passive DPS (auto-fire and friends).
    pub base_dps: f64,
    pub crit_percentage: f64,
    pub crit_multiplier: f64,
    pub max_hp: f64,
    pub gold: f64,
    /// Owned-but-unapplied crit-boost consumables. Surfaced for diagnostics;
    /// scoring uses the crit delta already present in the live stats.
    pub crit_consumables: u32,
}

/// One enemy in a lane; only its DPS matters to the advisor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enemy {
    pub dps: f64,
}

/// One lane of enemies.
#[derive(Debug, Clone, Default)]
pub struct Lane {
    pub enemies: Vec<Enemy>,
}

impl Lane {
    pub fn total_dps(&self) -> f64 {
        self.enemies.iter().map(|e| e.dps).sum()
    }
}

/// Snapshot of everything the engine reads: owned upgrade levels, tech stats,
/// lane threat, and the current game level.
#[derive(Debug, Clone, Default)]
pub struct GameStateSnapshot {
    levels: HashMap<UpgradeId, u32>,
    pub tech: PlayerTechStats,
    pub lanes: Vec<Lane>,
    pub game_level: u32,
}

impl GameStateSnapshot {
    pub fn new(tech: PlayerTechStats, lanes: Vec<Lane>, game_level: u32) -> Self {
        Self {
            levels: HashMap::new(),
            tech,
            lanes,
            game_level,
        }
    }

    /// Owned level of an upgrade; upgrades never purchased report level 0.
    pub fn level(&self, id: UpgradeId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    pub fn set_level(&mut self, id: UpgradeId, level: u32) {
        self.levels.insert(id, level);
    }

    /// Whether the upgrade's prerequisite gate is currently satisfied.
    pub fn is_unlocked(&self, def: &UpgradeDefinition) -> bool {
        match def.required_upgrade {
            Some(required) => self.level(required) >= def.required_upgrade_level,
            None => true,
        }
    }

    /// Aggregate DPS of the most dangerous lane.
    pub fn worst_lane_dps(&self) -> f64 {
        self.lanes
            .iter()
            .map(Lane::total_dps)
            .fold(0.0, f64::max)
    }
}
