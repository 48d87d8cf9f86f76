// API Server Binary Entry Point
//
// Purpose: Start the Axum crop recommendation server
// Usage: cargo run --features api --bin api_server

use crop_advisor::{create_router, AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_advisor=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = AppConfig::from_env();
    tracing::info!("Configuration:");
    tracing::info!("  MODEL_PATH: {:?}", config.model_path);
    tracing::info!("  CROP_PROFILES_PATH: {:?}", config.profiles_path);
    tracing::info!("  HOST: {}", config.host);
    tracing::info!("  PORT: {}", config.port);

    // Model and crop table are loaded once and shared read-only
    let state = AppState::new(&config)?;
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
