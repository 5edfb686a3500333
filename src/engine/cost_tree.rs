//! Cost-tree resolution: the true incremental cost and boost of reaching a
//! target upgrade level, accounting for still-locked prerequisite chains.

use super::EngineError;
use crate::domain::{GameStateSnapshot, TuningCatalog, UpgradeId};

/// Result of resolving an upgrade's cost tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostTree {
    /// Accumulated effect across every level crossed, scaled by the caller's
    /// base value.
    pub boost: f64,
    /// Gold for every level crossed, prerequisites included.
    pub cost: f64,
    /// Deepest unmet prerequisite. When set, a purchase has to start there;
    /// the requested upgrade itself is not yet buyable.
    pub collapsed: Option<UpgradeId>,
}

/// Resolve the cost tree of `id` up to `target_level` (defaults to current
/// level + 1). Pure; called fresh on every scoring pass.
///
/// Per missing level, `boost` grows by `base_value * multiplier` and `cost`
/// by `cost * growth^level_index` with the absolute 0-based level index. An
/// unmet prerequisite is resolved recursively to its required level and
/// folded into the totals.
pub fn resolve(
    catalog: &TuningCatalog,
    snapshot: &GameStateSnapshot,
    id: UpgradeId,
    target_level: Option<u32>,
    base_value: f64,
) -> Result<CostTree, EngineError> {
    let def = catalog.get(id).ok_or(EngineError::MissingUpgrade { id })?;
    let current = snapshot.level(id);
    let target = target_level.unwrap_or(current + 1);

    let mut boost = 0.0;
    let mut cost = 0.0;
    for level in current..target {
        boost += base_value * def.multiplier;
        cost += def.cost * def.cost_exponential_base.powi(level as i32);
    }

    let mut collapsed = None;
    if let Some(required) = def.required_upgrade {
        let parent = resolve(
            catalog,
            snapshot,
            required,
            Some(def.required_upgrade_level),
            base_value,
        )?;
        if parent.cost > 0.0 {
            boost += parent.boost;
            cost += parent.cost;
            collapsed = Some(parent.collapsed.unwrap_or(required));
        }
    }

    Ok(CostTree {
        boost,
        cost,
        collapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerTuning, UpgradeCategory, UpgradeDefinition};

    fn def(
        id: i32,
        cost: f64,
        growth: f64,
        multiplier: f64,
        required: Option<(i32, u32)>,
    ) -> UpgradeDefinition {
        UpgradeDefinition {
            id: UpgradeId::new(id),
            name: format!("upgrade {}", id),
            category: UpgradeCategory::ClickDamage,
            cost,
            cost_exponential_base: growth,
            multiplier,
            required_upgrade: required.map(|(r, _)| UpgradeId::new(r)),
            required_upgrade_level: required.map(|(_, l)| l).unwrap_or(1),
        }
    }

    fn catalog(defs: Vec<UpgradeDefinition>) -> TuningCatalog {
        TuningCatalog::new(
            defs,
            PlayerTuning {
                damage_per_click: 1.0,
                hp: 100.0,
                crit_percentage: 0.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_at_current_level_is_noop() {
        let cat = catalog(vec![def(0, 100.0, 1.15, 0.5, None)]);
        let mut snap = GameStateSnapshot::default();
        snap.set_level(UpgradeId::new(0), 3);

        let tree = resolve(&cat, &snap, UpgradeId::new(0), Some(3), 10.0).unwrap();
        assert_eq!(tree.boost, 0.0);
        assert_eq!(tree.cost, 0.0);
        assert_eq!(tree.collapsed, None);
    }

    #[test]
    fn test_resolve_defaults_to_next_level() {
        let cat = catalog(vec![def(0, 100.0, 1.15, 0.5, None)]);
        let mut snap = GameStateSnapshot::default();
        snap.set_level(UpgradeId::new(0), 2);

        let tree = resolve(&cat, &snap, UpgradeId::new(0), None, 10.0).unwrap();
        assert!((tree.cost - 100.0 * 1.15f64.powi(2)).abs() < 1e-9);
        assert!((tree.boost - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_collapses_through_locked_prerequisite() {
        // A: cost 100, growth 1.15, owned at level 1.
        // B: cost 500, growth 1.2, requires A at level 3, unowned.
        let cat = catalog(vec![
            def(0, 100.0, 1.15, 0.5, None),
            def(1, 500.0, 1.2, 1.0, Some((0, 3))),
        ]);
        let mut snap = GameStateSnapshot::default();
        snap.set_level(UpgradeId::new(0), 1);

        let tree = resolve(&cat, &snap, UpgradeId::new(1), None, 1.0).unwrap();

        // B's first level plus A's levels 1->2 and 2->3.
        let expected_cost = 500.0 + 100.0 * 1.15 + 100.0 * 1.15f64.powi(2);
        assert!((tree.cost - expected_cost).abs() < 1e-9);
        assert!((tree.boost - (1.0 + 0.5 + 0.5)).abs() < 1e-9);
        assert_eq!(tree.collapsed, Some(UpgradeId::new(0)));
    }

    #[test]
    fn test_resolve_collapses_to_deepest_unmet_prerequisite() {
        let cat = catalog(vec![
            def(0, 10.0, 1.0, 0.1, None),
            def(1, 20.0, 1.0, 0.1, Some((0, 2))),
            def(2, 40.0, 1.0, 0.1, Some((1, 1))),
        ]);
        let snap = GameStateSnapshot::default();

        let tree = resolve(&cat, &snap, UpgradeId::new(2), None, 1.0).unwrap();
        assert_eq!(tree.collapsed, Some(UpgradeId::new(0)));
        // 2 levels of upgrade 0, 1 level of upgrade 1, 1 level of upgrade 2.
        assert!((tree.cost - (10.0 + 10.0 + 20.0 + 40.0)).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_skips_satisfied_prerequisite() {
        let cat = catalog(vec![
            def(0, 10.0, 1.0, 0.1, None),
            def(1, 20.0, 1.0, 0.1, Some((0, 2))),
        ]);
        let mut snap = GameStateSnapshot::default();
        snap.set_level(UpgradeId::new(0), 2);

        let tree = resolve(&cat, &snap, UpgradeId::new(1), None, 1.0).unwrap();
        assert_eq!(tree.collapsed, None);
        assert!((tree.cost - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_unknown_id_is_missing_data() {
        let cat = catalog(vec![]);
        let snap = GameStateSnapshot::default();
        let err = resolve(&cat, &snap, UpgradeId::new(9), None, 1.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingUpgrade {
                id: UpgradeId::new(9)
            }
        );
    }
}
