pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{GameClient, GameClientError, MockGameClient, PurchaseOutcome, TowerAttackClient};
pub use domain::{
    GameStateSnapshot, PlayerTechStats, PlayerTuning, Recommendation, TuningCatalog,
    UpgradeCategory, UpgradeDefinition, UpgradeId,
};
pub use engine::{DecisionEngine, EngineError, PurchasePolicy, Strategy};
pub use error::AppError;
