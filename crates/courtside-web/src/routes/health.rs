use std::collections::BTreeMap;

use axum::{
    extract::State,
    Json,
};
use courtside_core::{
    HealthRecord,
    HealthStatus,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `degraded` once any configured source is down
    pub status: String,
    pub version: String,
    pub sources: BTreeMap<String, HealthRecord>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let sources = state.data_service().get_health();

    let any_down = sources
        .values()
        .any(|record| record.configured && record.status == HealthStatus::Down);

    Json(HealthResponse {
        status: if any_down { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sources,
    })
}
