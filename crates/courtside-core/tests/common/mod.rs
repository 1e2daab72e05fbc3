#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{
    DateTime,
    TimeZone,
    Utc,
};
use courtside_core::domain::team_keys::NBA_TEAMS;
use courtside_core::infrastructure::config::{
    CourtsideConfig,
    SourceFileConfig,
};
use courtside_core::infrastructure::StaticSeedSource;
use courtside_core::CoreContext;
use courtside_source_api::{
    BookmakerLine,
    Game,
    GameQuery,
    GameStatus,
    OddsQuery,
    OddsQuote,
    Player,
    RosterQuery,
    SourceCapabilities,
    SourceClient,
    SourceError,
    SourceMetadata,
    SourceRegistry,
    SourceResult,
    SourceTier,
    Team,
    TeamQuery,
    TeamRef,
    TeamStat,
};

/// Scripted source: fixed payloads, optional delay, optional failure
pub struct FakeSource {
    metadata: SourceMetadata,
    configured: bool,
    delay: Option<Duration>,
    error: Option<SourceError>,
    teams: Vec<Team>,
    games: Vec<Game>,
    odds: Vec<OddsQuote>,
    players: Vec<Player>,
    team_stats: Vec<TeamStat>,
    roster_queries: Arc<Mutex<Vec<RosterQuery>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn live(id: &str) -> Self {
        Self {
            metadata: SourceMetadata {
                id: id.to_string(),
                name: id.to_uppercase(),
                description: "scripted test source".to_string(),
                tier: SourceTier::Live,
                base_url: format!("http://{id}.test"),
                capabilities: SourceCapabilities::default(),
                requires_credential: false,
            },
            configured: true,
            delay: None,
            error: None,
            teams: Vec::new(),
            games: Vec::new(),
            odds: Vec::new(),
            players: Vec::new(),
            team_stats: Vec::new(),
            roster_queries: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_teams(mut self, teams: Vec<Team>) -> Self {
        self.metadata.capabilities.teams = true;
        self.teams = teams;
        self
    }

    pub fn with_games(mut self, games: Vec<Game>) -> Self {
        self.metadata.capabilities.games = true;
        self.games = games;
        self
    }

    pub fn with_odds(mut self, odds: Vec<OddsQuote>) -> Self {
        self.metadata.capabilities.odds = true;
        self.odds = odds;
        self
    }

    /// Same roster and stats for whichever team is asked for
    pub fn with_rosters(mut self, players: Vec<Player>, team_stats: Vec<TeamStat>) -> Self {
        self.metadata.capabilities.rosters = true;
        self.players = players;
        self.team_stats = team_stats;
        self
    }

    pub fn roster_queries(&self) -> Arc<Mutex<Vec<RosterQuery>>> {
        Arc::clone(&self.roster_queries)
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, error: SourceError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self.metadata.requires_credential = true;
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    async fn respond<T: Clone>(&self, payload: &[T]) -> SourceResult<Vec<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(payload.to_vec()),
        }
    }
}

#[async_trait]
impl SourceClient for FakeSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn initialize(
        &mut self, _config: HashMap<String, String>, _http_client: Option<Arc<reqwest::Client>>,
    ) -> SourceResult<()> {
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn fetch_teams(&self, _query: &TeamQuery) -> SourceResult<Vec<Team>> {
        self.respond(&self.teams).await
    }

    async fn fetch_games(&self, _query: &GameQuery) -> SourceResult<Vec<Game>> {
        self.respond(&self.games).await
    }

    async fn fetch_odds(&self, _query: &OddsQuery) -> SourceResult<Vec<OddsQuote>> {
        self.respond(&self.odds).await
    }

    async fn fetch_roster(&self, query: &RosterQuery) -> SourceResult<Vec<Player>> {
        self.roster_queries.lock().unwrap().push(query.clone());
        self.respond(&self.players).await
    }

    async fn fetch_team_stats(&self, query: &RosterQuery) -> SourceResult<Vec<TeamStat>> {
        self.roster_queries.lock().unwrap().push(query.clone());
        self.respond(&self.team_stats).await
    }
}

pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
}

pub fn seed() -> StaticSeedSource {
    StaticSeedSource::with_anchor(anchor())
}

/// The full league as a provider would list it, without conference data
pub fn league(source_prefix: &str) -> Vec<Team> {
    NBA_TEAMS
        .iter()
        .enumerate()
        .map(|(i, info)| Team {
            id: format!("{source_prefix}-{i}"),
            name: info.name.to_string(),
            short_name: info.abbreviation.to_string(),
            city: String::new(),
            league: "nba".to_string(),
            conference: None,
            division: None,
            logo_url: None,
            primary_color: None,
            venue: None,
        })
        .collect()
}

pub fn team(id: &str, name: &str, abbreviation: &str) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
        short_name: abbreviation.to_string(),
        city: String::new(),
        league: "nba".to_string(),
        conference: None,
        division: None,
        logo_url: None,
        primary_color: None,
        venue: None,
    }
}

pub fn side(abbreviation: &str) -> TeamRef {
    TeamRef {
        id: abbreviation.to_lowercase(),
        name: abbreviation.to_string(),
        abbreviation: abbreviation.to_string(),
    }
}

pub fn game(id: &str, home: &str, away: &str, at: DateTime<Utc>) -> Game {
    Game {
        id: id.to_string(),
        home: side(home),
        away: side(away),
        scheduled_at: at,
        status: GameStatus::Scheduled,
        season: Some("2023-24".to_string()),
        home_score: None,
        away_score: None,
        venue: None,
        attendance: None,
    }
}

pub fn final_game(
    id: &str, home: &str, away: &str, at: DateTime<Utc>, home_score: u32, away_score: u32,
) -> Game {
    Game {
        status: GameStatus::Final,
        home_score: Some(home_score),
        away_score: Some(away_score),
        ..game(id, home, away, at)
    }
}

pub fn quote(
    event_id: &str, home: &str, away: &str, at: DateTime<Utc>, prices: &[(f64, f64)],
) -> OddsQuote {
    OddsQuote {
        event_id: event_id.to_string(),
        sport: "basketball_nba".to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        commence_time: at,
        completed: false,
        bookmakers: prices
            .iter()
            .enumerate()
            .map(|(i, (home_price, away_price))| BookmakerLine {
                bookmaker: format!("book-{i}"),
                home_price: Some(*home_price),
                away_price: Some(*away_price),
                ..Default::default()
            })
            .collect(),
    }
}

pub fn roster(team_id: &str, size: usize) -> Vec<Player> {
    (0..size)
        .map(|i| Player {
            id: format!("{team_id}-{i}"),
            first_name: "Player".to_string(),
            last_name: format!("No{i}"),
            team_id: team_id.to_string(),
            position: Some("G".to_string()),
            jersey: Some(i.to_string()),
            height: None,
            weight: None,
            date_of_birth: None,
        })
        .collect()
}

pub fn points_per_game(value: f64) -> Vec<TeamStat> {
    vec![TeamStat {
        category: "offensive".to_string(),
        name: "avgPoints".to_string(),
        label: "Points Per Game".to_string(),
        value: Some(value),
        display_value: format!("{value:.1}"),
    }]
}

pub fn source_timeout(config: &mut CourtsideConfig, id: &str, timeout_ms: u64) {
    config
        .sources
        .entry(id.to_string())
        .or_insert_with(SourceFileConfig::default)
        .timeout_ms = Some(timeout_ms);
}

pub fn context(config: CourtsideConfig, sources: Vec<Arc<dyn SourceClient>>) -> CoreContext {
    let mut registry = SourceRegistry::new();
    for source in sources {
        registry.register(source).unwrap();
    }
    CoreContext::with_registry(config, registry).unwrap()
}
