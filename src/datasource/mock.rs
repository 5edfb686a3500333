//! Mock game client for testing without network calls.

use super::{GameClient, GameClientError, PurchaseOutcome};
use crate::domain::{
    GameStateSnapshot, PlayerTuning, TuningCatalog, UpgradeDefinition, UpgradeId,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Mock game client backed by an in-memory game state.
///
/// Purchases are applied to the held snapshot (gold deducted, level bumped),
/// so a fetch after a confirmed purchase observes the new state just like it
/// would against the real game.
#[derive(Debug)]
pub struct MockGameClient {
    upgrades: Vec<UpgradeDefinition>,
    player: PlayerTuning,
    state: Mutex<GameStateSnapshot>,
    purchases: Mutex<Vec<UpgradeId>>,
    desync_next_purchase: AtomicBool,
    fail_state_fetch: AtomicBool,
}

impl MockGameClient {
    /// Create a new mock client with an empty catalog and default state.
    pub fn new() -> Self {
        Self {
            upgrades: Vec::new(),
            player: PlayerTuning {
                damage_per_click: 1.0,
                hp: 100.0,
                crit_percentage: 0.0,
            },
            state: Mutex::new(GameStateSnapshot::default()),
            purchases: Mutex::new(Vec::new()),
            desync_next_purchase: AtomicBool::new(false),
            fail_state_fetch: AtomicBool::new(false),
        }
    }

    /// Add an upgrade definition to the catalog.
    pub fn with_upgrade(mut self, def: UpgradeDefinition) -> Self {
        self.upgrades.push(def);
        self
    }

    /// Add multiple upgrade definitions to the catalog.
    pub fn with_upgrades(mut self, defs: Vec<UpgradeDefinition>) -> Self {
        self.upgrades.extend(defs);
        self
    }

    /// Set the player tuning baselines.
    pub fn with_player(mut self, player: PlayerTuning) -> Self {
        self.player = player;
        self
    }

    /// Set the game state returned by fetch_state.
    pub fn with_state(self, state: GameStateSnapshot) -> Self {
        *self.state.lock().unwrap() = state;
        self
    }

    /// Make the next purchase attempt come back desynced without applying.
    pub fn desync_next_purchase(&self) {
        self.desync_next_purchase.store(true, Ordering::SeqCst);
    }

    /// Toggle whether fetch_state fails with a network error.
    pub fn set_state_fetch_failing(&self, failing: bool) {
        self.fail_state_fetch.store(failing, Ordering::SeqCst);
    }

    /// Ids of every confirmed purchase, in order.
    pub fn purchases(&self) -> Vec<UpgradeId> {
        self.purchases.lock().unwrap().clone()
    }

    /// Mutate the held game state in place.
    pub fn update_state(&self, f: impl FnOnce(&mut GameStateSnapshot)) {
        f(&mut self.state.lock().unwrap());
    }
}

impl Default for MockGameClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameClient for MockGameClient {
    async fn fetch_tuning(&self) -> Result<TuningCatalog, GameClientError> {
        TuningCatalog::new(self.upgrades.clone(), self.player.clone())
            .map_err(|e| GameClientError::Other(e.to_string()))
    }

    async fn fetch_state(&self) -> Result<GameStateSnapshot, GameClientError> {
        if self.fail_state_fetch.load(Ordering::SeqCst) {
            return Err(GameClientError::NetworkError(
                "mock state fetch failure".to_string(),
            ));
        }
        Ok(self.state.lock().unwrap().clone())
    }

    async fn choose_upgrade(&self, id: UpgradeId) -> Result<PurchaseOutcome, GameClientError> {
        if self.desync_next_purchase.swap(false, Ordering::SeqCst) {
            return Ok(PurchaseOutcome::Desynced);
        }

        let def = self
            .upgrades
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| GameClientError::Other(format!("unknown upgrade {}", id)))?;

        let mut state = self.state.lock().unwrap();
        let level = state.level(id);
        let cost = def.next_level_cost(level);
        if state.tech.gold < cost {
            return Ok(PurchaseOutcome::Desynced);
        }
        state.tech.gold -= cost;
        state.set_level(id, level + 1);
        drop(state);

        self.purchases.lock().unwrap().push(id);
        Ok(PurchaseOutcome::Confirmed)
    }
}
