pub mod health;
mod matches;
mod metrics;
mod teams;

use axum::{
    routing::get,
    Router,
};

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::get_metrics))
        .nest("/teams", teams::router())
        .nest("/matches", matches::router())
}
