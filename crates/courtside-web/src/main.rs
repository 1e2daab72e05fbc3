mod error;
mod routes;
mod state;

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use courtside_core::infrastructure::config::ServerConfig;
use courtside_core::CoreContext;
use tower::ServiceBuilder;
use tower_http::cors::{
    Any,
    CorsLayer,
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

const BIND_ADDR_ENV: &str = "COURTSIDE_BIND_ADDR";

struct ApiServerConfig {
    bind_addr: SocketAddr,
    cors_allow_all: bool,
}

impl ApiServerConfig {
    /// `COURTSIDE_BIND_ADDR` overrides `[server].bind_addr`
    fn resolve(server: &ServerConfig) -> anyhow::Result<Self> {
        let raw = std::env::var(BIND_ADDR_ENV).unwrap_or_else(|_| server.bind_addr.clone());
        let bind_addr = raw
            .parse()
            .with_context(|| format!("Invalid bind address: {raw}"))?;

        Ok(Self {
            bind_addr,
            cors_allow_all: server.cors_allow_all,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    courtside_core::logging::init();

    tracing::info!("Starting Courtside API server");

    let core = CoreContext::from_default_config().context("Failed to initialize core")?;
    let api_config = ApiServerConfig::resolve(&core.config.server)?;

    tracing::info!(
        sources = ?core.data_service.registry().source_ids(),
        "Sources ready"
    );

    let cors = if api_config.cors_allow_all {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let app = Router::new()
        .nest("/api/v1", routes::api_router())
        .fallback(|| async { AppError::not_found("No such endpoint") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(AppState::new(core));

    tracing::info!("Listening on {}", api_config.bind_addr);
    let listener = tokio::net::TcpListener::bind(api_config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", api_config.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
