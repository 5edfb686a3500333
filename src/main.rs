use autoupgrade::engine::PurchasePolicy;
use autoupgrade::orchestration::PurchaseExecutor;
use autoupgrade::{api, config::Config, DecisionEngine, GameClient, TowerAttackClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    let client: Arc<dyn GameClient> = Arc::new(TowerAttackClient::new(
        config.game_api_url.clone(),
        config.access_token.clone(),
    ));

    // Tuning data is static for the session; fetch it once up front.
    let catalog = match client.fetch_tuning().await {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Failed to fetch tuning data: {}", e);
            std::process::exit(1);
        }
    };

    let initial_state = match client.fetch_state().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to fetch initial game state: {}", e);
            std::process::exit(1);
        }
    };

    let advisor = Arc::new(Mutex::new(DecisionEngine::new(
        config.strategy(),
        PurchasePolicy::default(),
        config.rng_seed,
    )));
    let snapshot = Arc::new(RwLock::new(initial_state));

    // Spawn the purchase loop
    let mut executor = PurchaseExecutor::new(
        client,
        catalog.clone(),
        advisor.clone(),
        snapshot.clone(),
        config.dry_run,
    );
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    tokio::spawn(async move {
        executor.run(poll_interval).await;
    });

    // Create router
    let app = api::create_router(api::AppState {
        advisor,
        catalog,
        snapshot,
    });

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Advisor listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
