//! The purchase executor: the polling loop that feeds fresh game state to the
//! decision engine and carries its recommendation through to a purchase.

use crate::datasource::{GameClient, GameClientError, PurchaseOutcome};
use crate::domain::{GameStateSnapshot, TuningCatalog, UpgradeId};
use crate::engine::{DecisionEngine, EngineError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// What one executor cycle did. Returned from [`PurchaseExecutor::tick`] so
/// the loop body stays testable without running the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No recommendation; nothing worth buying right now.
    Idle,
    /// A recommendation is pending but gold has not caught up yet.
    Saving,
    /// The recommendation would have been bought; suppressed by dry-run mode.
    DryRun,
    /// Purchase confirmed and the next recommendation computed.
    Purchased(UpgradeId),
    /// The game rejected or lost the purchase; idle until the next clean
    /// snapshot.
    Desynced,
    /// The recommendation no longer matched the snapshot and was discarded.
    Invalidated,
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Client(#[from] GameClientError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Drives the advise-then-buy cycle against a [`GameClient`].
pub struct PurchaseExecutor {
    client: Arc<dyn GameClient>,
    catalog: Arc<TuningCatalog>,
    advisor: Arc<Mutex<DecisionEngine>>,
    snapshot: Arc<RwLock<GameStateSnapshot>>,
    dry_run: bool,
    awaiting_refresh: bool,
    last_game_level: Option<u32>,
}

impl PurchaseExecutor {
    pub fn new(
        client: Arc<dyn GameClient>,
        catalog: Arc<TuningCatalog>,
        advisor: Arc<Mutex<DecisionEngine>>,
        snapshot: Arc<RwLock<GameStateSnapshot>>,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            catalog,
            advisor,
            snapshot,
            dry_run,
            awaiting_refresh: false,
            last_game_level: None,
        }
    }

    /// One full cycle: refresh state, let the advisor catch up, then act on
    /// its recommendation if the gold is there.
    pub async fn tick(&mut self) -> Result<TickOutcome, OrchestrationError> {
        let state = self.client.fetch_state().await?;
        *self.snapshot.write().await = state.clone();

        let mut advisor = self.advisor.lock().await;

        // A clean snapshot resolves any earlier desync; whatever did or did
        // not get bought is now reflected in the state we just fetched.
        if self.awaiting_refresh {
            self.awaiting_refresh = false;
            advisor.invalidate();
        }

        match self.last_game_level {
            Some(last) if last != state.game_level => {
                debug!(from = last, to = state.game_level, "game level changed");
                advisor.on_level_changed(&self.catalog, &state)?;
            }
            _ => {}
        }
        self.last_game_level = Some(state.game_level);

        if advisor.current().is_none() {
            advisor.recompute(&self.catalog, &state)?;
        }

        let rec = advisor.current();
        let Some(id) = rec.id else {
            return Ok(TickOutcome::Idle);
        };

        // The recommendation was computed against an earlier snapshot; make
        // sure it still names a real, unlocked upgrade before spending.
        let still_valid = self
            .catalog
            .get(id)
            .map(|def| state.is_unlocked(def))
            .unwrap_or(false);
        if !still_valid {
            warn!(%id, "recommendation no longer valid against current state");
            advisor.invalidate();
            return Ok(TickOutcome::Invalidated);
        }

        if state.tech.gold < rec.cost {
            debug!(%id, cost = rec.cost, gold = state.tech.gold, "saving up");
            return Ok(TickOutcome::Saving);
        }

        if self.dry_run {
            info!(%id, cost = rec.cost, "dry run: would buy");
            return Ok(TickOutcome::DryRun);
        }

        match self.client.choose_upgrade(id).await? {
            PurchaseOutcome::Confirmed => {
                info!(%id, cost = rec.cost, "purchase confirmed");
                let refreshed = self.client.fetch_state().await?;
                *self.snapshot.write().await = refreshed.clone();
                advisor.on_purchase_completed(&self.catalog, &refreshed)?;
                Ok(TickOutcome::Purchased(id))
            }
            PurchaseOutcome::Desynced => {
                warn!(%id, "purchase desynced, waiting for a clean snapshot");
                advisor.invalidate();
                self.awaiting_refresh = true;
                Ok(TickOutcome::Desynced)
            }
        }
    }

    /// Run the cycle forever on a fixed interval. Errors are logged and the
    /// loop keeps going; a transient upstream failure must not kill the
    /// session.
    pub async fn run(&mut self, poll_interval: Duration) {
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match self.tick().await {
                Ok(outcome) => debug!(?outcome, "tick complete"),
                Err(e) => warn!("tick failed: {}", e),
            }
        }
    }
}
