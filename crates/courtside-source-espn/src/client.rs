//! HTTP client and API methods for ESPN

use std::sync::Arc;

use courtside_source_api::{
    Game,
    GameQuery,
    Player,
    RosterQuery,
    SourceError,
    SourceResult,
    Team,
    TeamStat,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::EspnConfig;
use crate::{
    mapper,
    types,
};

const LEAGUE_PATH: &str = "basketball/nba";

pub(crate) struct EspnClient {
    client: Arc<Client>,
    config: EspnConfig,
}

impl EspnClient {
    pub fn new(client: Arc<Client>, config: EspnConfig) -> Self {
        Self { client, config }
    }

    async fn get_json<T: DeserializeOwned>(
        &self, context: &str, path: &str, params: &[(&str, String)],
    ) -> SourceResult<T> {
        let url = format!("{}/{path}", self.config.base_url);

        let mut request = self
            .client
            .get(&url)
            .query(params)
            .timeout(self.config.timeout);
        if let Some(key) = &self.config.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request
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
        let response: types::TeamsResponse = self
            .get_json("ESPN teams", &format!("{LEAGUE_PATH}/teams"), &[])
            .await?;

        let teams = mapper::map_teams(response)?;
        tracing::debug!(count = teams.len(), "Retrieved ESPN teams");
        Ok(teams)
    }

    pub async fn fetch_games(&self, query: &GameQuery) -> SourceResult<Vec<Game>> {
        let params: Vec<(&str, String)> = dates_param(query)
            .map(|dates| vec![("dates", dates)])
            .unwrap_or_default();

        let response: types::ScoreboardResponse = self
            .get_json(
                "ESPN scoreboard",
                &format!("{LEAGUE_PATH}/scoreboard"),
                &params,
            )
            .await?;

        let games = mapper::map_games(response)?;
        tracing::debug!(count = games.len(), "Retrieved ESPN games");
        Ok(games)
    }

    pub async fn fetch_roster(&self, query: &RosterQuery) -> SourceResult<Vec<Player>> {
        let team = team_segment(query)?;
        let response: types::RosterResponse = self
            .get_json(
                "ESPN roster",
                &format!("{LEAGUE_PATH}/teams/{team}/roster"),
                &[],
            )
            .await?;

        let players = mapper::map_roster(response, &team);
        tracing::debug!(team = %team, count = players.len(), "Retrieved ESPN roster");
        Ok(players)
    }

    pub async fn fetch_team_stats(&self, query: &RosterQuery) -> SourceResult<Vec<TeamStat>> {
        let team = team_segment(query)?;
        let response: types::TeamStatsResponse = self
            .get_json(
                "ESPN team statistics",
                &format!("{LEAGUE_PATH}/teams/{team}/statistics"),
                &[],
            )
            .await?;

        let stats = mapper::map_team_stats(response)?;
        tracing::debug!(team = %team, count = stats.len(), "Retrieved ESPN team statistics");
        Ok(stats)
    }
}

/// ESPN team path segment: its own id when known, else its abbreviation.
/// ESPN spells six tricodes differently from the league.
pub(crate) fn team_segment(query: &RosterQuery) -> SourceResult<String> {
    if let Some(id) = query.team_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }

    let abbreviation = query.abbreviation.trim().to_uppercase();
    if abbreviation.is_empty() || !abbreviation.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SourceError::ParseError(format!(
            "No ESPN team for '{}'",
            query.abbreviation
        )));
    }

    let espn = match abbreviation.as_str() {
        "GSW" => "gs",
        "NYK" => "ny",
        "SAS" => "sa",
        "NOP" => "no",
        "UTA" => "utah",
        "WAS" => "wsh",
        other => return Ok(other.to_lowercase()),
    };
    Ok(espn.to_string())
}

/// `YYYYMMDD` or `YYYYMMDD-YYYYMMDD`; an end date alone is ignored
pub(crate) fn dates_param(query: &GameQuery) -> Option<String> {
    let from = query.from?;
    let start = from.format("%Y%m%d").to_string();

    match query.to {
        Some(to) if to != from => Some(format!("{start}-{}", to.format("%Y%m%d"))),
        _ => Some(start),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_dates_param() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();

        assert_eq!(dates_param(&GameQuery::default()), None);
        assert_eq!(
            dates_param(&GameQuery {
                from: Some(day),
                to: None
            })
            .as_deref(),
            Some("20240115")
        );
        assert_eq!(
            dates_param(&GameQuery {
                from: Some(day),
                to: Some(later)
            })
            .as_deref(),
            Some("20240115-20240120")
        );
        assert_eq!(
            dates_param(&GameQuery {
                from: None,
                to: Some(later)
            }),
            None
        );
    }

    #[test]
    fn test_team_segment() {
        let query = |team_id: Option<&str>, abbreviation: &str| RosterQuery {
            team_id: team_id.map(str::to_string),
            abbreviation: abbreviation.to_string(),
        };

        assert_eq!(team_segment(&query(Some("9"), "GSW")).unwrap(), "9");
        assert_eq!(team_segment(&query(None, "GSW")).unwrap(), "gs");
        assert_eq!(team_segment(&query(None, "UTA")).unwrap(), "utah");
        assert_eq!(team_segment(&query(None, "BOS")).unwrap(), "bos");
        assert_eq!(team_segment(&query(Some(" "), "lal")).unwrap(), "lal");
        assert!(team_segment(&query(None, "espn:77")).is_err());
        assert!(team_segment(&query(None, "")).is_err());
    }
}
