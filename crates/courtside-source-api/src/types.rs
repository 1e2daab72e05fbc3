use chrono::{
    DateTime,
    NaiveDate,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub city: String,
    pub league: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// Team as it appears inside a game payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Scheduled,
    Live,
    Final,
    Postponed,
    Unknown,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Live => "live",
            GameStatus::Final => "final",
            GameStatus::Postponed => "postponed",
            GameStatus::Unknown => "unknown",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, GameStatus::Final)
    }
}

impl std::str::FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" | "upcoming" => Ok(GameStatus::Scheduled),
            "live" => Ok(GameStatus::Live),
            "final" | "completed" => Ok(GameStatus::Final),
            "postponed" => Ok(GameStatus::Postponed),
            "unknown" => Ok(GameStatus::Unknown),
            _ => Err(format!("Unknown game status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub home: TeamRef,
    pub away: TeamRef,
    pub scheduled_at: DateTime<Utc>,
    pub status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u32>,
}

/// One bookmaker's prices for an event, decimal format
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookmakerLine {
    pub bookmaker: String,
    pub last_update: Option<DateTime<Utc>>,
    pub home_price: Option<f64>,
    pub away_price: Option<f64>,
    pub draw_price: Option<f64>,
    pub total_line: Option<f64>,
    pub over_price: Option<f64>,
    pub under_price: Option<f64>,
    pub home_spread: Option<f64>,
    pub home_spread_price: Option<f64>,
    pub away_spread: Option<f64>,
    pub away_spread_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub event_id: String,
    pub sport: String,
    /// Full team names as the odds provider spells them
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub bookmakers: Vec<BookmakerLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Source-local id of the team the roster was requested for
    pub team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey: Option<String>,
    /// Display strings as the provider formats them ("6' 8"", "210 lbs")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

/// One season statistic for a team, e.g. points per game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStat {
    pub category: String,
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub display_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamQuery {
    pub league: String,
}

impl Default for TeamQuery {
    fn default() -> Self {
        Self {
            league: "nba".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Roster or team-statistics lookup for one team
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterQuery {
    /// Id local to the queried source when known
    pub team_id: Option<String>,
    /// Canonical NBA tricode ("GSW"); bindings map it to their own spelling
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OddsQuery {
    /// Provider sport key; bindings fall back to their configured sport when `None`
    pub sport: Option<String>,
}
