use axum::{
    extract::{
        Path,
        Query,
        State,
    },
    http::StatusCode,
    routing::get,
    Json,
    Router,
};
use chrono::NaiveDate;
use courtside_core::{
    Aggregated,
    Match,
    MatchDetail,
    MatchFilter,
    Selected,
};
use courtside_source_api::GameStatus;
use serde::Deserialize;

use crate::error::{
    ApiError,
    ApiResult,
    AppError,
};
use crate::state::AppState;

/// Raw query strings; parsed by hand so bad values get a JSON error body
#[derive(Debug, Default, Deserialize)]
pub struct ListMatchesQuery {
    pub status: Option<String>,
    pub team: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<usize>,
}

impl ListMatchesQuery {
    fn into_filter(self) -> ApiResult<MatchFilter> {
        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<GameStatus>())
            .transpose()
            .map_err(AppError::bad_request)?;

        let from = parse_date("from", self.from.as_deref())?;
        let to = parse_date("to", self.to.as_deref())?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::bad_request(format!(
                    "'from' ({from}) is after 'to' ({to})"
                )));
            }
        }

        Ok(MatchFilter {
            status,
            team: self.team.filter(|t| !t.trim().is_empty()),
            from,
            to,
            limit: self.limit,
        })
    }
}

fn parse_date(field: &str, value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| {
            AppError::new(
                StatusCode::BAD_REQUEST,
                ApiError::new(
                    "BAD_REQUEST",
                    format!("'{field}' must be a YYYY-MM-DD date, got '{value}'"),
                )
                .with_details(e.to_string()),
            )
        })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_matches))
        .route("/{id}", get(get_match))
        .route("/{id}/detail", get(get_match_detail))
}

async fn list_matches(
    State(state): State<AppState>, Query(query): Query<ListMatchesQuery>,
) -> ApiResult<Json<Aggregated<Match>>> {
    let filter = query.into_filter()?;
    Ok(Json(state.data_service().get_matches(&filter).await))
}

async fn get_match(
    State(state): State<AppState>, Path(id): Path<String>,
) -> ApiResult<Json<Selected<Match>>> {
    let selected = state.data_service().get_match(&id).await;

    if selected.record.is_none() {
        tracing::debug!(id = %id, partial = selected.partial, "Match not found");
        return Err(AppError::not_found(format!("Match not found: {id}")));
    }

    Ok(Json(selected))
}

async fn get_match_detail(
    State(state): State<AppState>, Path(id): Path<String>,
) -> ApiResult<Json<Selected<MatchDetail>>> {
    let selected = state.data_service().get_match_detail(&id).await;

    if selected.record.is_none() {
        tracing::debug!(id = %id, partial = selected.partial, "Match not found");
        return Err(AppError::not_found(format!("Match not found: {id}")));
    }

    Ok(Json(selected))
}
