//! The decision engine: runs the scorers under a fixed priority policy and
//! owns the current recommendation.

use super::derived::{DerivedStatsCache, ElementalLevel};
use super::policy::{NecessaryUpgrade, PurchasePolicy, Strategy};
use super::{scorers, EngineError};
use crate::domain::{GameStateSnapshot, Recommendation, TuningCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use tracing::debug;

/// Derived values exposed for diagnostics.
#[derive(Debug, Clone)]
pub struct DerivedStats {
    pub time_to_die: f64,
    pub elemental_ranking: Vec<ElementalLevel>,
}

/// Greedy single-step recommendation engine. One instance per session,
/// constructed by the host; owns no game state beyond its caches, the
/// necessary-upgrade queue, and the current recommendation.
pub struct DecisionEngine {
    strategy: Strategy,
    necessary: VecDeque<NecessaryUpgrade>,
    policy: PurchasePolicy,
    cache: DerivedStatsCache,
    current: Recommendation,
    rng: StdRng,
}

impl DecisionEngine {
    /// `seed` pins the elemental tie-break RNG for reproducible sessions.
    pub fn new(strategy: Strategy, policy: PurchasePolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            strategy,
            necessary: policy.necessary.iter().copied().collect(),
            policy,
            cache: DerivedStatsCache::new(),
            current: Recommendation::none(),
            rng,
        }
    }

    /// The recommendation from the last completed pass.
    pub fn current(&self) -> Recommendation {
        self.current
    }

    /// Discard the current recommendation wholesale. Called on
    /// purchase-attempt start and on desync detection; the engine stays idle
    /// until the next recompute.
    pub fn invalidate(&mut self) {
        self.current = Recommendation::none();
    }

    /// Re-evaluate everything and pick the next purchase:
    ///
    /// 1. an unsatisfied necessary upgrade preempts all scoring;
    /// 2. below the survival threshold, the best health upgrade wins even
    ///    when its value is poor — survivability preempts economy;
    /// 3. otherwise damage vs. ability, cheaper first; damage wins outright
    ///    when no ability candidate exists.
    ///
    /// On error the recommendation is already `none` — fail safe to
    /// inaction — and the caller should skip this cycle.
    pub fn recompute(
        &mut self,
        catalog: &TuningCatalog,
        snapshot: &GameStateSnapshot,
    ) -> Result<Recommendation, EngineError> {
        self.current = Recommendation::none();

        let ranking = self
            .cache
            .elemental_ranking(catalog, snapshot, true)
            .to_vec();
        let time_to_die = self.cache.time_to_die(snapshot, true);

        let rec = if let Some(c) = scorers::necessary_upgrade(&mut self.necessary, catalog, snapshot)? {
            debug!(id = %c.id, cost = c.cost, "necessary upgrade pending");
            Recommendation::buy(c.id, c.cost)
        } else if time_to_die < self.strategy.survival_time_secs {
            debug!(time_to_die, "below survival threshold, buying health");
            match scorers::best_health_upgrade(catalog, snapshot)? {
                Some(c) => Recommendation::buy(c.id, c.cost),
                None => Recommendation::none(),
            }
        } else {
            let damage = scorers::best_damage_upgrade(
                catalog,
                snapshot,
                &self.strategy,
                self.policy.crit_item,
                &ranking,
                &mut self.rng,
            )?;
            let ability = if self.strategy.buy_abilities {
                scorers::next_ability_upgrade(catalog, snapshot, &self.policy.abilities)?
            } else {
                None
            };
            match (damage, ability) {
                // Affordability-first tie-break between the two branches: the
                // cheaper purchase happens sooner. A missing damage candidate
                // costs nothing and therefore also wins.
                (Some(d), Some(a)) if a.cost <= d.cost => Recommendation::buy(a.id, a.cost),
                (Some(d), _) => Recommendation::buy(d.id, d.cost),
                (None, _) => Recommendation::none(),
            }
        };

        self.current = rec;
        Ok(rec)
    }

    /// Level transition: refresh time-to-die and recompute only when the new
    /// threat drops survivability below the threshold.
    pub fn on_level_changed(
        &mut self,
        catalog: &TuningCatalog,
        snapshot: &GameStateSnapshot,
    ) -> Result<Recommendation, EngineError> {
        let time_to_die = self.cache.time_to_die(snapshot, true);
        if time_to_die < self.strategy.survival_time_secs {
            self.recompute(catalog, snapshot)
        } else {
            Ok(self.current)
        }
    }

    /// A purchase went through: discard the stale recommendation and pick the
    /// next one against the refreshed snapshot.
    pub fn on_purchase_completed(
        &mut self,
        catalog: &TuningCatalog,
        snapshot: &GameStateSnapshot,
    ) -> Result<Recommendation, EngineError> {
        self.invalidate();
        self.recompute(catalog, snapshot)
    }

    /// Current derived stats, from cache where still warm.
    pub fn derived_stats(
        &mut self,
        catalog: &TuningCatalog,
        snapshot: &GameStateSnapshot,
    ) -> DerivedStats {
        DerivedStats {
            time_to_die: self.cache.time_to_die(snapshot, false),
            elemental_ranking: self
                .cache
                .elemental_ranking(catalog, snapshot, false)
                .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Enemy, Lane, PlayerTechStats, PlayerTuning, UpgradeCategory, UpgradeDefinition, UpgradeId,
    };

    fn def(
        id: i32,
        category: UpgradeCategory,
        cost: f64,
        multiplier: f64,
    ) -> UpgradeDefinition {
        UpgradeDefinition {
            id: UpgradeId::new(id),
            name: format!("upgrade {}", id),
            category,
            cost,
            cost_exponential_base: 1.0,
            multiplier,
            required_upgrade: None,
            required_upgrade_level: 1,
        }
    }

    fn catalog() -> TuningCatalog {
        TuningCatalog::new(
            vec![
                def(0, UpgradeCategory::Health, 50.0, 0.2),
                def(1, UpgradeCategory::PassiveDamage, 100.0, 0.5),
                def(2, UpgradeCategory::ClickDamage, 100.0, 0.5),
                def(3, UpgradeCategory::Elemental, 100.0, 0.25),
                def(13, UpgradeCategory::Ability, 80.0, 0.0),
            ],
            PlayerTuning {
                damage_per_click: 10.0,
                hp: 500.0,
                crit_percentage: 0.0,
            },
        )
        .unwrap()
    }

    fn safe_snapshot() -> GameStateSnapshot {
        GameStateSnapshot::new(
            PlayerTechStats {
                damage_per_click: 20.0,
                base_dps: 100.0,
                crit_percentage: 0.1,
                crit_multiplier: 2.0,
                max_hp: 5000.0,
                gold: 0.0,
                crit_consumables: 0,
            },
            vec![Lane {
                enemies: vec![Enemy { dps: 10.0 }],
            }],
            3,
        )
    }

    fn engine(strategy: Strategy, policy: PurchasePolicy) -> DecisionEngine {
        DecisionEngine::new(strategy, policy, Some(99))
    }

    fn no_necessary_policy() -> PurchasePolicy {
        PurchasePolicy {
            necessary: vec![],
            abilities: vec![UpgradeId::new(13)],
            crit_item: None,
        }
    }

    #[test]
    fn test_necessary_preempts_everything() {
        let cat = catalog();
        // Dangerous snapshot: 100 hp against 50 dps is well below threshold.
        let mut snap = safe_snapshot();
        snap.tech.max_hp = 100.0;
        snap.lanes[0].enemies[0].dps = 50.0;

        let policy = PurchasePolicy {
            necessary: vec![NecessaryUpgrade::new(1, 1)],
            ..no_necessary_policy()
        };
        let mut eng = engine(Strategy::default(), policy);

        let rec = eng.recompute(&cat, &snap).unwrap();
        assert_eq!(rec.id, Some(UpgradeId::new(1)));
        assert_eq!(rec.cost, 100.0);
    }

    #[test]
    fn test_low_survivability_buys_health() {
        let cat = catalog();
        let mut snap = safe_snapshot();
        snap.tech.max_hp = 100.0;
        snap.lanes[0].enemies[0].dps = 50.0; // time to die = 2s

        let mut eng = engine(Strategy::default(), no_necessary_policy());
        let rec = eng.recompute(&cat, &snap).unwrap();
        assert_eq!(rec.id, Some(UpgradeId::new(0)));
    }

    #[test]
    fn test_safe_player_buys_damage() {
        let cat = catalog();
        let snap = safe_snapshot(); // 5000 hp / 10 dps = 500s
        let mut eng = engine(Strategy::default(), no_necessary_policy());

        let rec = eng.recompute(&cat, &snap).unwrap();
        assert!(rec.id.is_some());
        assert_ne!(rec.id, Some(UpgradeId::new(0)), "health must not win while safe");
    }

    #[test]
    fn test_ability_wins_when_cheaper_and_enabled() {
        let cat = catalog();
        let snap = safe_snapshot();
        let strategy = Strategy {
            buy_abilities: true,
            ..Strategy::default()
        };
        let mut eng = engine(strategy, no_necessary_policy());

        let rec = eng.recompute(&cat, &snap).unwrap();
        // Ability 13 costs 80, cheaper than any damage candidate (100+).
        assert_eq!(rec.id, Some(UpgradeId::new(13)));
    }

    #[test]
    fn test_abilities_ignored_when_flag_off() {
        let cat = catalog();
        let snap = safe_snapshot();
        let mut eng = engine(Strategy::default(), no_necessary_policy());

        let rec = eng.recompute(&cat, &snap).unwrap();
        assert_ne!(rec.id, Some(UpgradeId::new(13)));
    }

    #[test]
    fn test_invalidate_resets_to_none() {
        let cat = catalog();
        let snap = safe_snapshot();
        let mut eng = engine(Strategy::default(), no_necessary_policy());

        assert!(!eng.recompute(&cat, &snap).unwrap().is_none());
        eng.invalidate();
        assert!(eng.current().is_none());
    }

    #[test]
    fn test_error_fails_safe_to_none() {
        let cat = catalog();
        let snap = safe_snapshot();
        let policy = PurchasePolicy {
            necessary: vec![NecessaryUpgrade::new(999, 1)], // not in catalog
            ..no_necessary_policy()
        };
        let mut eng = engine(Strategy::default(), policy);

        assert!(eng.recompute(&cat, &snap).is_err());
        assert!(eng.current().is_none());
    }

    #[test]
    fn test_on_level_changed_recomputes_only_below_threshold() {
        let cat = catalog();
        let snap = safe_snapshot();
        let mut eng = engine(Strategy::default(), no_necessary_policy());
        let rec = eng.recompute(&cat, &snap).unwrap();

        // Still safe: recommendation untouched.
        let same = eng.on_level_changed(&cat, &snap).unwrap();
        assert_eq!(same, rec);

        // New level floods the lane: survivability branch takes over.
        let mut dangerous = snap.clone();
        dangerous.tech.max_hp = 100.0;
        dangerous.lanes[0].enemies[0].dps = 200.0;
        let changed = eng.on_level_changed(&cat, &dangerous).unwrap();
        assert_eq!(changed.id, Some(UpgradeId::new(0)));
    }

    #[test]
    fn test_necessary_not_reconsidered_after_satisfied() {
        let cat = catalog();
        let mut snap = safe_snapshot();
        let policy = PurchasePolicy {
            necessary: vec![NecessaryUpgrade::new(0, 1)],
            ..no_necessary_policy()
        };
        let mut eng = engine(Strategy::default(), policy);

        let rec = eng.recompute(&cat, &snap).unwrap();
        assert_eq!(rec.id, Some(UpgradeId::new(0)));

        // Satisfy it, then take it away again: the entry stays consumed.
        snap.set_level(UpgradeId::new(0), 1);
        eng.recompute(&cat, &snap).unwrap();
        snap.set_level(UpgradeId::new(0), 0);
        let later = eng.recompute(&cat, &snap).unwrap();
        assert_ne!(later.id, Some(UpgradeId::new(0)));
    }
}
