use std::sync::Arc;

use axum::Router;
use hf_chat_proxy::{config::Config, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.hf_token.is_none() {
        warn!("HF_TOKEN is not set; every chat request will fail");
    }

    let state = Arc::new(AppState::from_config(&config));
    let cors = CorsLayer::very_permissive();

    let app: Router = routes::create_router(&config.static_dir)
        .with_state(state)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    info!(addr = %config.addr, static_dir = %config.static_dir.display(), "chat proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
