//! Response types for the ESPN site API
//!
//! Every field is optional or defaulted: ESPN omits keys freely and the mapper
//! decides which gaps are fatal.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TeamsResponse {
    #[serde(default)]
    pub sports: Vec<Sport>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Sport {
    #[serde(default)]
    pub leagues: Vec<League>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct League {
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamEntry {
    pub team: Option<Team>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Team {
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub location: String,
    pub color: Option<String>,
    #[serde(default)]
    pub logos: Vec<Logo>,
    pub venue: Option<Venue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Logo {
    pub href: Option<String>,
    #[serde(default)]
    pub width: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Venue {
    pub full_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreboardResponse {
    pub events: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Event {
    pub id: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    pub status: Option<Status>,
    pub season: Option<Season>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Competition {
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    pub venue: Option<Venue>,
    pub attendance: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Competitor {
    pub home_away: Option<String>,
    pub team: Option<CompetitorTeam>,
    /// Scoreboard sends a string, schedule endpoints sometimes a number
    pub score: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompetitorTeam {
    pub id: Option<String>,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Status {
    #[serde(rename = "type")]
    pub status_type: Option<StatusType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusType {
    pub state: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Season {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterResponse {
    #[serde(default)]
    pub athletes: Vec<Athlete>,
}

/// NBA rosters list athletes flat; some payloads wrap each one in `athlete`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Athlete {
    pub athlete: Option<Box<Athlete>>,
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    pub jersey: Option<String>,
    pub position: Option<Position>,
    pub display_height: Option<String>,
    pub display_weight: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Position {
    pub abbreviation: Option<String>,
}

/// `results.stats` on current payloads, bare `stats` on older ones
#[derive(Debug, Deserialize)]
pub(crate) struct TeamStatsResponse {
    pub results: Option<StatsResults>,
    pub stats: Option<StatsBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsResults {
    pub stats: Option<StatsBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsBlock {
    #[serde(default)]
    pub categories: Vec<StatCategory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stats: Vec<Stat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Stat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    /// Usually a number, occasionally a string
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub display_value: String,
}
