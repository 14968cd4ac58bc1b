//! Balans API Server
//!
//! Main entry point for the Balans ledger service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balans_api::{create_router, AppState};
use balans_core::events::TracingSink;
use balans_core::Ledger;
use balans_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balans=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        retained_earnings = %config.ledger.retained_earnings_code,
        "Configuration loaded"
    );

    // Wire the ledger core; audit events go to the tracing pipeline.
    let ledger = Ledger::new(Arc::new(TracingSink));

    // Create application state
    let state = AppState {
        ledger: Arc::new(ledger),
        config: Arc::new(config.ledger.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
