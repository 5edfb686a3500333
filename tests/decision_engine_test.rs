use autoupgrade::engine::{PurchasePolicy, Strategy};
use autoupgrade::{
    DecisionEngine, GameStateSnapshot, PlayerTechStats, PlayerTuning, TuningCatalog,
    UpgradeCategory, UpgradeDefinition, UpgradeId,
};

fn def(
    id: i32,
    name: &str,
    category: UpgradeCategory,
    cost: f64,
    growth: f64,
    multiplier: f64,
) -> UpgradeDefinition {
    UpgradeDefinition {
        id: UpgradeId::new(id),
        name: name.to_string(),
        category,
        cost,
        cost_exponential_base: growth,
        multiplier,
        required_upgrade: None,
        required_upgrade_level: 1,
    }
}

/// A catalog shaped like the real tuning data: armor, guns, the four
/// elements, the crit item, and the first ability.
fn game_catalog() -> TuningCatalog {
    TuningCatalog::new(
        vec![
            def(0, "Light Armor", UpgradeCategory::Health, 50.0, 1.5, 1.0),
            def(1, "Auto-fire Cannon", UpgradeCategory::PassiveDamage, 50.0, 1.5, 0.3),
            def(2, "Armor Piercing Rounds", UpgradeCategory::ClickDamage, 150.0, 1.5, 1.0),
            def(3, "Flame Damage", UpgradeCategory::Elemental, 250.0, 2.5, 0.25),
            def(4, "Water Damage", UpgradeCategory::Elemental, 250.0, 2.5, 0.25),
            def(5, "Air Damage", UpgradeCategory::Elemental, 250.0, 2.5, 0.25),
            def(6, "Earth Damage", UpgradeCategory::Elemental, 250.0, 2.5, 0.25),
            def(7, "Lucky Shot", UpgradeCategory::Other, 1000.0, 2.0, 2.0),
            def(11, "Medics", UpgradeCategory::Ability, 2500.0, 1.0, 0.0),
        ],
        PlayerTuning {
            damage_per_click: 1.0,
            hp: 1000.0,
            crit_percentage: 0.0,
        },
    )
    .unwrap()
}

fn safe_snapshot() -> GameStateSnapshot {
    GameStateSnapshot::new(
        PlayerTechStats {
            damage_per_click: 1.0,
            base_dps: 10.0,
            crit_percentage: 0.05,
            crit_multiplier: 2.0,
            max_hp: 10_000.0,
            gold: 0.0,
            crit_consumables: 0,
        },
        vec![],
        1,
    )
}

#[test]
fn test_necessary_sequence_walks_default_policy_in_order() {
    let catalog = game_catalog();
    let mut snap = safe_snapshot();
    let mut engine = DecisionEngine::new(Strategy::default(), PurchasePolicy::default(), Some(5));

    // Light Armor first, at its base cost.
    let rec = engine.recompute(&catalog, &snap).unwrap();
    assert_eq!(rec.id, Some(UpgradeId::new(0)));
    assert_eq!(rec.cost, 50.0);

    snap.set_level(UpgradeId::new(0), 1);
    let rec = engine.recompute(&catalog, &snap).unwrap();
    assert_eq!(rec.id, Some(UpgradeId::new(11)));
    assert_eq!(rec.cost, 2500.0);

    snap.set_level(UpgradeId::new(11), 1);
    let rec = engine.recompute(&catalog, &snap).unwrap();
    assert_eq!(rec.id, Some(UpgradeId::new(2)));
    assert_eq!(rec.cost, 150.0);

    // The Armor Piercing Rounds entry wants level 10, not just ownership.
    snap.set_level(UpgradeId::new(2), 9);
    let rec = engine.recompute(&catalog, &snap).unwrap();
    assert_eq!(rec.id, Some(UpgradeId::new(2)));
    assert!((rec.cost - 150.0 * 1.5f64.powi(9)).abs() < 1e-6);

    snap.set_level(UpgradeId::new(2), 10);
    let rec = engine.recompute(&catalog, &snap).unwrap();
    assert_eq!(rec.id, Some(UpgradeId::new(1)));
    assert_eq!(rec.cost, 50.0);

    // Queue exhausted: scoring takes over.
    snap.set_level(UpgradeId::new(1), 10);
    let rec = engine.recompute(&catalog, &snap).unwrap();
    assert!(rec.id.is_some());
    assert_ne!(rec.id, Some(UpgradeId::new(0)));
    assert_ne!(rec.id, Some(UpgradeId::new(11)));
}

#[test]
fn test_elementals_win_once_guns_get_expensive() {
    let catalog = game_catalog();
    let mut snap = safe_snapshot();
    // Everything mandatory already owned, guns already deep into their
    // exponential curves.
    snap.set_level(UpgradeId::new(0), 1);
    snap.set_level(UpgradeId::new(11), 1);
    snap.set_level(UpgradeId::new(2), 10);
    snap.set_level(UpgradeId::new(1), 10);

    let mut engine = DecisionEngine::new(Strategy::default(), PurchasePolicy::default(), Some(5));
    let rec = engine.recompute(&catalog, &snap).unwrap();

    let id = rec.id.unwrap().as_i32();
    assert!((3..=6).contains(&id), "expected an elemental, got {}", id);
    // First elemental level: 250 * 2.5^1.
    assert!((rec.cost - 625.0).abs() < 1e-6);
}

#[test]
fn test_survival_preempts_economy_after_necessary_done() {
    let catalog = game_catalog();
    let mut snap = safe_snapshot();
    snap.set_level(UpgradeId::new(0), 1);
    snap.set_level(UpgradeId::new(11), 1);
    snap.set_level(UpgradeId::new(2), 10);
    snap.set_level(UpgradeId::new(1), 10);
    // 2 seconds to die.
    snap.tech.max_hp = 100.0;
    snap.lanes = vec![autoupgrade::domain::Lane {
        enemies: vec![autoupgrade::domain::Enemy { dps: 50.0 }],
    }];

    let mut engine = DecisionEngine::new(Strategy::default(), PurchasePolicy::default(), Some(5));
    let rec = engine.recompute(&catalog, &snap).unwrap();
    assert_eq!(rec.id, Some(UpgradeId::new(0)), "health must preempt damage");
}

#[test]
fn test_abilities_never_recommended_by_default() {
    let catalog = game_catalog();
    let mut snap = safe_snapshot();
    snap.set_level(UpgradeId::new(0), 1);
    snap.set_level(UpgradeId::new(11), 1);
    snap.set_level(UpgradeId::new(2), 10);
    snap.set_level(UpgradeId::new(1), 10);

    let mut engine = DecisionEngine::new(Strategy::default(), PurchasePolicy::default(), Some(5));
    for _ in 0..10 {
        let rec = engine.recompute(&catalog, &snap).unwrap();
        assert_ne!(rec.id.unwrap().as_i32(), 11);
    }
}

#[test]
fn test_same_seed_gives_identical_recommendations() {
    let catalog = game_catalog();
    let mut snap = safe_snapshot();
    snap.set_level(UpgradeId::new(0), 1);
    snap.set_level(UpgradeId::new(11), 1);
    snap.set_level(UpgradeId::new(2), 10);
    snap.set_level(UpgradeId::new(1), 10);

    let mut a = DecisionEngine::new(Strategy::default(), PurchasePolicy::default(), Some(42));
    let mut b = DecisionEngine::new(Strategy::default(), PurchasePolicy::default(), Some(42));

    for round in 0..5 {
        let ra = a.recompute(&catalog, &snap).unwrap();
        let rb = b.recompute(&catalog, &snap).unwrap();
        assert_eq!(ra, rb, "diverged at round {}", round);
    }
}
