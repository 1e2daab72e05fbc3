//! Bundled fallback data served through the same `SourceClient` contract as
//! the live bindings.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{
    DateTime,
    NaiveTime,
    TimeDelta,
    Utc,
};
use courtside_source_api::{
    Game,
    GameQuery,
    GameStatus,
    SourceCapabilities,
    SourceClient,
    SourceError,
    SourceMetadata,
    SourceResult,
    SourceTier,
    Team,
    TeamQuery,
    TeamRef,
};
use serde::Deserialize;

pub const SOURCE_ID: &str = "static-seed";
/// Config key naming a JSON file that replaces the bundled document
pub const SEED_PATH_KEY: &str = "seed_path";

const EMBEDDED_SEED: &str = include_str!("nba_seed.json");

#[derive(Debug, Deserialize)]
struct SeedDocument {
    league: String,
    teams: Vec<SeedTeam>,
    #[serde(default)]
    fixtures: Vec<SeedFixture>,
}

#[derive(Debug, Deserialize)]
struct SeedTeam {
    id: String,
    name: String,
    short_name: String,
    city: String,
    conference: Option<String>,
    division: Option<String>,
    venue: Option<String>,
    logo_url: Option<String>,
    primary_color: Option<String>,
}

/// Upcoming game placed relative to the moment the source was built
#[derive(Debug, Deserialize)]
struct SeedFixture {
    id: String,
    home: String,
    away: String,
    days_ahead: i64,
    /// `HH:MM`, UTC
    start_utc: String,
}

#[derive(Debug)]
struct SeedData {
    teams: Vec<Team>,
    games: Vec<Game>,
}

fn parse_seed(content: &str, anchor: DateTime<Utc>) -> SourceResult<SeedData> {
    let doc: SeedDocument = serde_json::from_str(content)
        .map_err(|e| SourceError::ParseError(format!("Invalid seed document: {e}")))?;

    if doc.teams.is_empty() {
        return Err(SourceError::ParseError(
            "Seed document has no teams".to_string(),
        ));
    }

    let teams: Vec<Team> = doc
        .teams
        .into_iter()
        .map(|t| Team {
            id: t.id,
            name: t.name,
            short_name: t.short_name,
            city: t.city,
            league: doc.league.clone(),
            conference: t.conference,
            division: t.division,
            logo_url: t.logo_url,
            primary_color: t.primary_color,
            venue: t.venue,
        })
        .collect();

    let by_abbreviation: HashMap<&str, &Team> =
        teams.iter().map(|t| (t.short_name.as_str(), t)).collect();

    let team_ref = |abbr: &str, fixture: &str| -> SourceResult<(TeamRef, Option<String>)> {
        let team = by_abbreviation.get(abbr).ok_or_else(|| {
            SourceError::ParseError(format!("Fixture {fixture} references unknown team {abbr}"))
        })?;
        Ok((
            TeamRef {
                id: team.id.clone(),
                name: team.name.clone(),
                abbreviation: team.short_name.clone(),
            },
            team.venue.clone(),
        ))
    };

    let mut games = Vec::with_capacity(doc.fixtures.len());
    for fixture in &doc.fixtures {
        let start = NaiveTime::parse_from_str(&fixture.start_utc, "%H:%M").map_err(|e| {
            SourceError::ParseError(format!(
                "Fixture {} has invalid start_utc '{}': {e}",
                fixture.id, fixture.start_utc
            ))
        })?;
        let (home, venue) = team_ref(&fixture.home, &fixture.id)?;
        let (away, _) = team_ref(&fixture.away, &fixture.id)?;
        let day = TimeDelta::try_days(fixture.days_ahead)
            .and_then(|offset| anchor.date_naive().checked_add_signed(offset))
            .ok_or_else(|| {
                SourceError::ParseError(format!(
                    "Fixture {} has out-of-range days_ahead {}",
                    fixture.id, fixture.days_ahead
                ))
            })?;

        games.push(Game {
            id: fixture.id.clone(),
            home,
            away,
            scheduled_at: day.and_time(start).and_utc(),
            status: GameStatus::Scheduled,
            season: None,
            home_score: None,
            away_score: None,
            venue,
            attendance: None,
        });
    }

    Ok(SeedData { teams, games })
}

pub struct StaticSeedSource {
    metadata: SourceMetadata,
    anchor: DateTime<Utc>,
    data: Result<Arc<SeedData>, SourceError>,
}

impl Default for StaticSeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticSeedSource {
    pub fn new() -> Self {
        Self::with_anchor(Utc::now())
    }

    /// Fixtures are scheduled relative to `anchor`
    pub fn with_anchor(anchor: DateTime<Utc>) -> Self {
        Self {
            metadata: SourceMetadata {
                id: SOURCE_ID.to_string(),
                name: "Static seed".to_string(),
                description: "Bundled NBA teams and upcoming fixtures".to_string(),
                tier: SourceTier::Fallback,
                base_url: String::new(),
                capabilities: SourceCapabilities {
                    teams: true,
                    games: true,
                    odds: false,
                    rosters: false,
                },
                requires_credential: false,
            },
            anchor,
            data: parse_seed(EMBEDDED_SEED, anchor).map(Arc::new),
        }
    }

    fn load_file(&self, path: &Path) -> SourceResult<SeedData> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SourceError::ParseError(format!("Cannot read seed file {}: {e}", path.display()))
        })?;
        parse_seed(&content, self.anchor)
    }

    fn data(&self) -> SourceResult<&SeedData> {
        self.data.as_deref().map_err(Clone::clone)
    }
}

#[async_trait]
impl SourceClient for StaticSeedSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn initialize(
        &mut self, config: HashMap<String, String>, _http_client: Option<Arc<reqwest::Client>>,
    ) -> SourceResult<()> {
        let Some(path) = config.get(SEED_PATH_KEY).filter(|p| !p.trim().is_empty()) else {
            return Ok(());
        };
        let path = Path::new(path.trim());

        self.data = self.load_file(path).map(Arc::new);
        match &self.data {
            Ok(data) => tracing::info!(
                path = %path.display(),
                teams = data.teams.len(),
                fixtures = data.games.len(),
                "Loaded seed override"
            ),
            Err(e) => tracing::error!(
                path = %path.display(),
                error = %e,
                "Seed override is unusable, fallback data unavailable"
            ),
        }
        self.metadata.base_url = format!("file://{}", path.display());

        Ok(())
    }

    async fn fetch_teams(&self, _query: &TeamQuery) -> SourceResult<Vec<Team>> {
        Ok(self.data()?.teams.clone())
    }

    async fn fetch_games(&self, _query: &GameQuery) -> SourceResult<Vec<Game>> {
        Ok(self.data()?.games.clone())
    }
}
