//! Per-category candidate scorers. Each returns `None` when its category has
//! nothing worth buying; the decision policy in `decision.rs` arbitrates
//! between categories.

use super::cost_tree;
use super::derived::ElementalLevel;
use super::policy::{NecessaryUpgrade, Strategy};
use super::{Candidate, EngineError};
use crate::domain::{GameStateSnapshot, TuningCatalog, UpgradeCategory, UpgradeId};
use rand::Rng;
use std::collections::VecDeque;

/// Tie-break shared by the metric-maximizing scorers: strictly greater metric
/// wins; an exact metric tie prefers the cheaper candidate; otherwise the
/// first one encountered stays.
fn improves(best: &Option<Candidate>, metric: f64, cost: f64) -> bool {
    match best {
        None => true,
        Some(b) => metric > b.metric || (metric == b.metric && cost < b.cost),
    }
}

/// Walk the necessary list in order and return the first unsatisfied entry at
/// its next-level cost. Satisfied entries are popped permanently, so an entry
/// is never reconsidered once its level is reached. A candidate from here is
/// mandatory: it preempts every other scorer regardless of economics.
pub fn necessary_upgrade(
    queue: &mut VecDeque<NecessaryUpgrade>,
    catalog: &TuningCatalog,
    snapshot: &GameStateSnapshot,
) -> Result<Option<Candidate>, EngineError> {
    while let Some(wanted) = queue.front().copied() {
        let current = snapshot.level(wanted.id);
        if current < wanted.level {
            let def = catalog
                .get(wanted.id)
                .ok_or(EngineError::MissingUpgrade { id: wanted.id })?;
            return Ok(Some(Candidate {
                id: wanted.id,
                cost: def.next_level_cost(current),
                metric: 0.0,
            }));
        }
        queue.pop_front();
    }
    Ok(None)
}

/// Best HP-per-gold among unlocked health upgrades.
pub fn best_health_upgrade(
    catalog: &TuningCatalog,
    snapshot: &GameStateSnapshot,
) -> Result<Option<Candidate>, EngineError> {
    let mut best: Option<Candidate> = None;
    for def in catalog.by_category(UpgradeCategory::Health) {
        if !snapshot.is_unlocked(def) {
            continue;
        }
        let cost = def.next_level_cost(snapshot.level(def.id));
        if cost <= 0.0 {
            continue;
        }
        let metric = catalog.player.hp * def.multiplier / cost;
        if improves(&best, metric, cost) {
            best = Some(Candidate {
                id: def.id,
                cost,
                metric,
            });
        }
    }
    Ok(best)
}

/// Weighted contribution of a descending level ranking to average click
/// damage: representative elemental multiplier times the rank-weighted level
/// sum. Ranks beyond the configured weights contribute nothing.
pub fn elemental_coefficient(
    catalog: &TuningCatalog,
    strategy: &Strategy,
    levels: &[u32],
) -> f64 {
    let Some(representative) = catalog.by_category(UpgradeCategory::Elemental).next() else {
        return 0.0;
    };
    let weighted: f64 = levels
        .iter()
        .enumerate()
        .map(|(rank, &level)| {
            level as f64 * strategy.elemental_weights.get(rank).copied().unwrap_or(0.0)
        })
        .sum();
    representative.multiplier * weighted
}

/// Best damage-per-gold across the three click-damage effect paths plus
/// passive DPS, all expressed in the same gold-normalized metric:
///
/// 1. passive-damage upgrades, scaled down by the assumed click rate;
/// 2. the designated crit-chance item, scaled by the crit-rate delta the
///    live stats have gained over the tuning baseline;
/// 3. plain click-damage upgrades through their cost trees, scaled by the
///    crit-weighted elemental coefficient — a collapsed tree makes the
///    deepest locked prerequisite the actual candidate;
/// 4. a hypothetical +1 level on the Nth-ranked elemental, scoring the
///    marginal coefficient gain after simulating any rank swap. Wins only on
///    a strictly greater metric; equal-level elementals at the upgraded rank
///    are chosen among uniformly at random.
pub fn best_damage_upgrade<R: Rng>(
    catalog: &TuningCatalog,
    snapshot: &GameStateSnapshot,
    strategy: &Strategy,
    crit_item: Option<UpgradeId>,
    ranking: &[ElementalLevel],
    rng: &mut R,
) -> Result<Option<Candidate>, EngineError> {
    let tech = &snapshot.tech;
    let dpc = tech.damage_per_click;
    let base_dpc = catalog.player.damage_per_click;
    let crit_mult = tech.crit_multiplier;
    let crit_rate = tech.crit_percentage - catalog.player.crit_percentage;

    let levels: Vec<u32> = ranking.iter().map(|e| e.level).collect();
    let coefficient = elemental_coefficient(catalog, strategy, &levels);

    let mut best: Option<Candidate> = None;

    for def in catalog.by_category(UpgradeCategory::PassiveDamage) {
        if !snapshot.is_unlocked(def) {
            continue;
        }
        let cost = def.next_level_cost(snapshot.level(def.id));
        if cost <= 0.0 {
            continue;
        }
        let metric = (tech.base_dps / strategy.clicks_per_second) * def.multiplier / cost;
        if improves(&best, metric, cost) {
            best = Some(Candidate {
                id: def.id,
                cost,
                metric,
            });
        }
    }

    if let Some(id) = crit_item {
        let def = catalog.get(id).ok_or(EngineError::MissingUpgrade { id })?;
        if snapshot.is_unlocked(def) {
            let cost = def.next_level_cost(snapshot.level(id));
            if cost > 0.0 {
                let metric = dpc * crit_rate * def.multiplier / cost;
                if improves(&best, metric, cost) {
                    best = Some(Candidate { id, cost, metric });
                }
            }
        }
    }

    for def in catalog.by_category(UpgradeCategory::ClickDamage) {
        let tree = cost_tree::resolve(catalog, snapshot, def.id, None, base_dpc)?;
        if tree.cost <= 0.0 {
            continue;
        }
        let boost = tree.boost * (crit_rate * crit_mult + (1.0 - crit_rate) * coefficient);
        let metric = boost / tree.cost;
        if improves(&best, metric, tree.cost) {
            // A locked upgrade cannot be bought directly; queue the deepest
            // unmet prerequisite at its own next-level cost instead.
            let (id, cost) = match tree.collapsed {
                Some(prereq_id) => {
                    let prereq = catalog
                        .get(prereq_id)
                        .ok_or(EngineError::MissingUpgrade { id: prereq_id })?;
                    (prereq_id, prereq.next_level_cost(snapshot.level(prereq_id)))
                }
                None => (def.id, tree.cost),
            };
            best = Some(Candidate { id, cost, metric });
        }
    }

    let specializations = strategy.elemental_specializations.min(ranking.len());
    if specializations >= 1 {
        if let Some(representative) = catalog.by_category(UpgradeCategory::Elemental).next() {
            // Elemental cost scales with the combined level of all elements.
            let total_levels: u32 = levels.iter().sum::<u32>() + 1;
            let cost =
                representative.cost * representative.cost_exponential_base.powi(total_levels as i32);

            let rank = specializations - 1;
            let upgrade_level = levels[rank];
            let mut hypothetical = levels.clone();
            hypothetical[rank] += 1;
            if rank > 0 {
                // Leveling past the next-higher rank swaps their effective ranks.
                let above = hypothetical[rank - 1];
                if above <= upgrade_level {
                    hypothetical[rank - 1] = upgrade_level + 1;
                    hypothetical[rank] = above;
                }
            }

            let gain =
                elemental_coefficient(catalog, strategy, &hypothetical) - coefficient;
            let boost = dpc * (1.0 - crit_rate) * gain;
            let metric = boost / cost;
            // Strictly greater only: direct damage boosters win metric ties.
            if cost > 0.0 && metric > best.as_ref().map_or(0.0, |b| b.metric) {
                let tied: Vec<UpgradeId> = ranking
                    .iter()
                    .filter(|e| e.level == upgrade_level)
                    .map(|e| e.id)
                    .collect();
                let id = tied[rng.random_range(0..tied.len())];
                best = Some(Candidate { id, cost, metric });
            }
        }
    }

    Ok(best)
}

/// First unlocked, not-yet-owned ability in policy priority order, at its
/// base cost. The buy-abilities gate lives in the decision policy, not here.
pub fn next_ability_upgrade(
    catalog: &TuningCatalog,
    snapshot: &GameStateSnapshot,
    abilities: &[UpgradeId],
) -> Result<Option<Candidate>, EngineError> {
    for &id in abilities {
        let def = catalog.get(id).ok_or(EngineError::MissingUpgrade { id })?;
        if snapshot.is_unlocked(def) && snapshot.level(id) < 1 {
            return Ok(Some(Candidate {
                id,
                cost: def.cost,
                metric: 0.0,
            }));
        }
    }
    Ok(None)
}
