//! HTTP client for the tower-attack game API.

use super::{GameClient, GameClientError, PurchaseOutcome};
use crate::domain::{
    Enemy, GameStateSnapshot, Lane, PlayerTechStats, PlayerTuning, TuningCatalog,
    UpgradeCategory, UpgradeDefinition, UpgradeId,
};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Game client backed by the tower-attack HTTP API.
#[derive(Debug, Clone)]
pub struct TowerAttackClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl TowerAttackClient {
    /// Create a new client against the given API base URL.
    pub fn new(base_url: String, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            access_token,
        }
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, GameClientError> {
        let url = format!("{}{}", self.base_url, path);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let mut request = self.client.get(&url);
            if let Some(token) = &self.access_token {
                request = request.query(&[("access_token", token.as_str())]);
            }
            let response = request.send().await.map_err(|e| {
                backoff::Error::transient(GameClientError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(GameClientError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(GameClientError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(GameClientError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(GameClientError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl GameClient for TowerAttackClient {
    async fn fetch_tuning(&self) -> Result<TuningCatalog, GameClientError> {
        debug!("Fetching tuning data");

        let response = self.get_json("/tuning").await?;

        let upgrades_json = response
            .get("upgrades")
            .and_then(|v| v.as_array())
            .ok_or_else(|| GameClientError::ParseError("Missing upgrades array".to_string()))?;

        let mut upgrades = Vec::new();
        for (index, upgrade_json) in upgrades_json.iter().enumerate() {
            match parse_upgrade(upgrade_json, index) {
                Ok(def) => upgrades.push(def),
                Err(e) => {
                    warn!("Failed to parse upgrade {}: {}", index, e);
                }
            }
        }

        let player = parse_player_tuning(&response)?;

        TuningCatalog::new(upgrades, player)
            .map_err(|e| GameClientError::ParseError(e.to_string()))
    }

    async fn fetch_state(&self) -> Result<GameStateSnapshot, GameClientError> {
        debug!("Fetching game state");

        let response = self.get_json("/state").await?;
        parse_snapshot(&response)
    }

    async fn choose_upgrade(&self, id: UpgradeId) -> Result<PurchaseOutcome, GameClientError> {
        debug!("Submitting purchase for upgrade {}", id);

        let url = format!("{}/choose_upgrade", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "new_upgrade": id.as_i32() }));
        if let Some(token) = &self.access_token {
            request = request.query(&[("access_token", token.as_str())]);
        }

        // Never retried: a lost request may still have been applied server
        // side, so anything short of a clean 2xx is treated as a desync and
        // resolved by the next state fetch.
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Purchase request failed: {}", e);
                return Ok(PurchaseOutcome::Desynced);
            }
        };

        if response.status().is_success() {
            Ok(PurchaseOutcome::Confirmed)
        } else {
            warn!("Purchase rejected with status {}", response.status());
            Ok(PurchaseOutcome::Desynced)
        }
    }
}

fn parse_upgrade(
    upgrade_json: &serde_json::Value,
    index: usize,
) -> Result<UpgradeDefinition, GameClientError> {
    // Upgrades without an explicit id are keyed by their array position.
    let id = upgrade_json
        .get("id")
        .and_then(|v| v.as_i64())
        .unwrap_or(index as i64);

    let name = upgrade_json
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GameClientError::ParseError("Missing name field".to_string()))?
        .to_string();

    let type_code = upgrade_json
        .get("type")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| GameClientError::ParseError("Missing type field".to_string()))?;

    let cost = upgrade_json
        .get("cost")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| GameClientError::ParseError("Missing cost field".to_string()))?;

    let cost_exponential_base = upgrade_json
        .get("cost_exponential_base")
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);

    let multiplier = upgrade_json
        .get("multiplier")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    // The wire uses -1 for "no prerequisite".
    let required_upgrade = upgrade_json
        .get("required_upgrade")
        .and_then(|v| v.as_i64())
        .filter(|&r| r >= 0)
        .map(|r| UpgradeId::new(r as i32));

    let required_upgrade_level = upgrade_json
        .get("required_upgrade_level")
        .and_then(|v| v.as_u64())
        .unwrap_or(1) as u32;

    Ok(UpgradeDefinition {
        id: UpgradeId::new(id as i32),
        name,
        category: UpgradeCategory::from_wire(type_code),
        cost,
        cost_exponential_base,
        multiplier,
        required_upgrade,
        required_upgrade_level,
    })
}

fn parse_player_tuning(response: &serde_json::Value) -> Result<PlayerTuning, GameClientError> {
    let player_json = response
        .get("player")
        .ok_or_else(|| GameClientError::ParseError("Missing player field".to_string()))?;

    let damage_per_click = player_json
        .get("damage_per_click")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| GameClientError::ParseError("Missing damage_per_click field".to_string()))?;

    let hp = player_json
        .get("hp")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| GameClientError::ParseError("Missing hp field".to_string()))?;

    let crit_percentage = player_json
        .get("crit_percentage")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    Ok(PlayerTuning {
        damage_per_click,
        hp,
        crit_percentage,
    })
}

fn parse_snapshot(response: &serde_json::Value) -> Result<GameStateSnapshot, GameClientError> {
    let tech_json = response
        .get("tech_tree")
        .ok_or_else(|| GameClientError::ParseError("Missing tech_tree field".to_string()))?;

    let stat = |key: &str| tech_json.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0);

    let tech = PlayerTechStats {
        damage_per_click: stat("damage_per_click"),
        base_dps: stat("base_dps"),
        crit_percentage: stat("crit_percentage"),
        crit_multiplier: stat("crit_multiplier"),
        max_hp: stat("max_hp"),
        gold: stat("gold"),
        crit_consumables: tech_json
            .get("crit_consumables")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
    };

    let game_level = response
        .get("level")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| GameClientError::ParseError("Missing level field".to_string()))?
        as u32;

    let mut lanes = Vec::new();
    if let Some(lanes_json) = response.get("lanes").and_then(|v| v.as_array()) {
        for lane_json in lanes_json {
            let enemies = lane_json
                .get("enemies")
                .and_then(|v| v.as_array())
                .map(|enemies_json| {
                    enemies_json
                        .iter()
                        .map(|e| Enemy {
                            dps: e.get("dps").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        })
                        .collect()
                })
                .unwrap_or_default();
            lanes.push(Lane { enemies });
        }
    }

    let mut snapshot = GameStateSnapshot::new(tech, lanes, game_level);
    if let Some(levels_json) = tech_json.get("upgrades").and_then(|v| v.as_array()) {
        for entry in levels_json {
            let id = entry.get("upgrade").and_then(|v| v.as_i64());
            let level = entry.get("level").and_then(|v| v.as_u64());
            match (id, level) {
                (Some(id), Some(level)) => {
                    snapshot.set_level(UpgradeId::new(id as i32), level as u32)
                }
                _ => warn!("Skipping malformed upgrade level entry: {}", entry),
            }
        }
    }

    Ok(snapshot)
}
