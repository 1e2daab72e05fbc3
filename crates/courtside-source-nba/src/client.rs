//! HTTP client and API methods for stats.nba.com

use std::sync::Arc;

use chrono::NaiveDate;
use courtside_source_api::{
    Game,
    GameQuery,
    SourceError,
    SourceResult,
    Team,
};
use reqwest::header::{
    HeaderMap,
    HeaderValue,
    ACCEPT,
    ACCEPT_LANGUAGE,
    ORIGIN,
    REFERER,
    USER_AGENT,
};
use reqwest::Client;

use crate::config::NbaConfig;
use crate::{
    mapper,
    types,
};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

pub(crate) struct NbaClient {
    client: Arc<Client>,
    config: NbaConfig,
    headers: HeaderMap,
}

/// stats.nba.com drops requests that do not look like they come from nba.com
pub(crate) fn stats_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    headers
}

impl NbaClient {
    pub fn new(client: Arc<Client>, config: NbaConfig) -> Self {
        Self {
            client,
            config,
            headers: stats_headers(),
        }
    }

    async fn get_stats(
        &self, context: &str, endpoint: &str, params: &[(&str, String)],
    ) -> SourceResult<types::StatsResponse> {
        let url = format!("{}/{endpoint}", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .query(params)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| SourceError::from_transport(context, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::from_status(context, status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_transport(context, e))?;

        serde_json::from_str(&body)
            .map_err(|e| SourceError::ParseError(format!("{context}: {e}")))
    }

    pub async fn fetch_teams(&self) -> SourceResult<Vec<Team>> {
        let response = self
            .get_stats(
                "NBA teams",
                "commonteamyears",
                &[("LeagueID", self.config.league_id.clone())],
            )
            .await?;

        let teams = mapper::map_teams(response)?;
        tracing::debug!(count = teams.len(), "Retrieved NBA teams");
        Ok(teams)
    }

    pub async fn fetch_games(&self, query: &GameQuery) -> SourceResult<Vec<Game>> {
        let mut params = vec![
            ("LeagueID", self.config.league_id.clone()),
            ("PlayerOrTeam", "T".to_string()),
        ];
        if let Some(from) = query.from {
            params.push(("DateFrom", stats_date(from)));
        }
        if let Some(to) = query.to {
            params.push(("DateTo", stats_date(to)));
        }

        let response = self
            .get_stats("NBA games", "leaguegamefinder", &params)
            .await?;

        let games = mapper::map_games(response)?;
        tracing::debug!(count = games.len(), "Retrieved NBA games");
        Ok(games)
    }
}

fn stats_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
