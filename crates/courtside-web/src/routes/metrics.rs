use axum::{
    extract::State,
    Json,
};
use courtside_core::AggregatedMetrics;

use crate::state::AppState;

pub async fn get_metrics(State(state): State<AppState>) -> Json<AggregatedMetrics> {
    Json(state.data_service().get_metrics().await)
}
