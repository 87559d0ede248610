//! Recipe Timer - an in-memory recipe book served over HTTP
//!
//! This is the main entry point for the recipe-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use recipe_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::alert_listener_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("recipe_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting recipe-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, bell={}, seed={}",
        config.host, config.port, config.tick_millis, config.bell, !config.no_seed
    );

    // Create application state
    let state = Arc::new(AppState::new(
        config.recipe_book(),
        config.notifier(),
        config.tick_period(),
        config.port,
        config.host.clone(),
    ));

    // Log timer alerts as they fire
    let alert_state = Arc::clone(&state);
    tokio::spawn(async move {
        alert_listener_task(alert_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /recipes                 - List recipes");
    info!("  GET    /recipes/:id/scaled      - Scale a recipe (?servings=N)");
    info!("  POST   /recipes/:id/view        - Open a recipe");
    info!("  POST   /view/steps/:step/timer  - Start a step timer");
    info!("  POST   /view/timer/toggle       - Pause or resume the timer");
    info!("  POST   /editor                  - Start a new recipe draft");
    info!("  GET    /status                  - Session status");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
