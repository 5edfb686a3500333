use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::domain::Recommendation;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDto {
    /// Wire id of the recommended upgrade, -1 when idle.
    pub upgrade: i32,
    pub cost: f64,
    pub idle: bool,
}

impl From<Recommendation> for RecommendationDto {
    fn from(rec: Recommendation) -> Self {
        Self {
            upgrade: rec.wire_id(),
            cost: rec.cost,
            idle: rec.is_none(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementalDto {
    pub upgrade: i32,
    pub level: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub time_to_die: f64,
    pub elemental_ranking: Vec<ElementalDto>,
    pub gold: f64,
    pub game_level: u32,
}

/// The advisor's current recommendation, as of the last completed pass.
pub async fn get_recommendation(
    State(state): State<AppState>,
) -> Result<Json<RecommendationDto>, AppError> {
    let advisor = state.advisor.lock().await;
    Ok(Json(advisor.current().into()))
}

/// Derived stats for diagnostics: survivability and the elemental ranking.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let snapshot = state.snapshot.read().await;
    let mut advisor = state.advisor.lock().await;
    let stats = advisor.derived_stats(&state.catalog, &snapshot);

    Ok(Json(StatsResponse {
        time_to_die: stats.time_to_die,
        elemental_ranking: stats
            .elemental_ranking
            .iter()
            .map(|e| ElementalDto {
                upgrade: e.id.as_i32(),
                level: e.level,
            })
            .collect(),
        gold: snapshot.tech.gold,
        game_level: snapshot.game_level,
    }))
}

/// Force a full scoring pass against the latest snapshot.
pub async fn post_recompute(
    State(state): State<AppState>,
) -> Result<Json<RecommendationDto>, AppError> {
    let snapshot = state.snapshot.read().await;
    let mut advisor = state.advisor.lock().await;
    let rec = advisor.recompute(&state.catalog, &snapshot)?;
    Ok(Json(rec.into()))
}

/// Drop the current recommendation; the advisor stays idle until the next
/// recompute.
pub async fn post_invalidate(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut advisor = state.advisor.lock().await;
    advisor.invalidate();
    Ok(Json(serde_json::json!({"status": "invalidated"})))
}
