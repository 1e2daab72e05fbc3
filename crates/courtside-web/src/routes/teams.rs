use axum::{
    extract::State,
    routing::get,
    Json,
    Router,
};
use courtside_core::{
    Aggregated,
    TeamSummary,
};
use courtside_source_api::Team;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams))
        .route("/summary", get(team_summary))
}

async fn list_teams(State(state): State<AppState>) -> Json<Aggregated<Team>> {
    Json(state.data_service().get_teams().await)
}

async fn team_summary(State(state): State<AppState>) -> Json<TeamSummary> {
    Json(state.data_service().get_team_summary().await)
}
