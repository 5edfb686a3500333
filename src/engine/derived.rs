//! Memoized derived stats: elemental ranking and time-to-die.
//!
//! Both are read several times within one scoring pass and are expensive next
//! to plain snapshot reads, so each memoizes independently behind an explicit
//! refresh flag. Staleness is only acceptable within a single recompute cycle.

use crate::domain::{GameStateSnapshot, TuningCatalog, UpgradeCategory, UpgradeId};

/// One elemental upgrade with its owned level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementalLevel {
    pub id: UpgradeId,
    pub level: u32,
}

#[derive(Debug, Default)]
pub struct DerivedStatsCache {
    elementals: Option<Vec<ElementalLevel>>,
    time_to_die: Option<f64>,
}

impl DerivedStatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elemental upgrades sorted by level descending. The sort is stable:
    /// equal levels keep catalog order.
    pub fn elemental_ranking(
        &mut self,
        catalog: &TuningCatalog,
        snapshot: &GameStateSnapshot,
        refresh: bool,
    ) -> &[ElementalLevel] {
        if refresh || self.elementals.is_none() {
            let mut ranking: Vec<ElementalLevel> = catalog
                .by_category(UpgradeCategory::Elemental)
                .map(|def| ElementalLevel {
                    id: def.id,
                    level: snapshot.level(def.id),
                })
                .collect();
            ranking.sort_by(|a, b| b.level.cmp(&a.level));
            self.elementals = Some(ranking);
        }
        self.elementals.as_deref().unwrap_or(&[])
    }

    /// Seconds the player survives the worst lane's aggregate DPS at max HP.
    /// With no enemies on the field yet, assumes `game_level * 4` DPS.
    pub fn time_to_die(&mut self, snapshot: &GameStateSnapshot, refresh: bool) -> f64 {
        if refresh || self.time_to_die.is_none() {
            let enemy_dps = snapshot.worst_lane_dps();
            let dps = if enemy_dps > 0.0 {
                enemy_dps
            } else {
                snapshot.game_level as f64 * 4.0
            };
            self.time_to_die = Some(snapshot.tech.max_hp / dps);
        }
        self.time_to_die.unwrap_or(f64::INFINITY)
    }

    /// Drop both memoized values.
    pub fn clear(&mut self) {
        self.elementals = None;
        self.time_to_die = None;
    }
}
