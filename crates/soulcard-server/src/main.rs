use std::sync::Arc;

use soulcard::ChatCompletionClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod models;
mod routes;
mod state;

use config::ServerConfig;
pub use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "info,soulcard=debug,soulcard_server=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🃏 Soulcard API initializing...");

    let config = ServerConfig::from_env()?;
    tracing::info!(
        model = %config.completion.model,
        base_url = %config.completion.base_url,
        "Completion client configured"
    );

    let client = ChatCompletionClient::new(config.completion.clone());
    let state = AppState::new(Arc::new(client));
    let router = routes::app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Soulcard API listening on {}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
