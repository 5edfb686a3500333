//! Game client abstraction for fetching tuning data, player state, and
//! submitting upgrade purchases.

use crate::domain::{GameStateSnapshot, TuningCatalog, UpgradeId};
use async_trait::async_trait;
use std::fmt;

pub mod mock;
pub mod towerattack;

pub use mock::MockGameClient;
pub use towerattack::TowerAttackClient;

/// Result of an upgrade purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The game accepted the purchase.
    Confirmed,
    /// The game rejected or lost the request; local state can no longer be
    /// trusted until the next clean snapshot.
    Desynced,
}

/// Game client trait for reading game data and buying upgrades.
///
/// Implementations must handle retry/backoff for the read paths. Purchases
/// are never retried: a lost purchase request is reported as
/// [`PurchaseOutcome::Desynced`] so the caller can re-sync instead of
/// double-buying.
#[async_trait]
pub trait GameClient: Send + Sync + fmt::Debug {
    /// Fetch the static upgrade catalog and player tuning values.
    ///
    /// Fetched once at startup; the catalog does not change mid-session.
    async fn fetch_tuning(&self) -> Result<TuningCatalog, GameClientError>;

    /// Fetch the current game state: owned upgrade levels, tech stats,
    /// enemy lanes, and game level.
    async fn fetch_state(&self) -> Result<GameStateSnapshot, GameClientError>;

    /// Submit a purchase for the next level of `id`.
    async fn choose_upgrade(&self, id: UpgradeId) -> Result<PurchaseOutcome, GameClientError>;
}

/// Error type for game client operations.
#[derive(Debug, Clone)]
pub enum GameClientError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for GameClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameClientError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            GameClientError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            GameClientError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            GameClientError::RateLimited => write!(f, "Rate limited"),
            GameClientError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for GameClientError {}
