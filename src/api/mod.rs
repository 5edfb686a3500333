pub mod advisor;
pub mod health;

use crate::domain::{GameStateSnapshot, TuningCatalog};
use crate::engine::DecisionEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<Mutex<DecisionEngine>>,
    pub catalog: Arc<TuningCatalog>,
    pub snapshot: Arc<RwLock<GameStateSnapshot>>,
}

impl AppState {
    pub fn new(
        advisor: Arc<Mutex<DecisionEngine>>,
        catalog: Arc<TuningCatalog>,
        snapshot: Arc<RwLock<GameStateSnapshot>>,
    ) -> Self {
        Self {
            advisor,
            catalog,
            snapshot,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/recommendation", get(advisor::get_recommendation))
        .route("/v1/stats", get(advisor::get_stats))
        .route("/v1/recompute", post(advisor::post_recompute))
        .route("/v1/invalidate", post(advisor::post_invalidate))
        .layer(cors)
        .with_state(state)
}
