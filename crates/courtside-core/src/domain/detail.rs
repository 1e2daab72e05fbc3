use courtside_source_api::{
    Player,
    TeamStat,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::matches::Match;
use super::record::Aggregated;

/// Players kept per roster
pub const ROSTER_LIMIT: usize = 15;

/// Roster and season statistics for one side of a match. Each section
/// carries its own envelope since it is fetched separately from the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub team_key: String,
    pub roster: Aggregated<Player>,
    pub stats: Aggregated<TeamStat>,
}

impl TeamDetail {
    pub fn partial(&self) -> bool {
        self.roster.partial || self.stats.partial
    }

    pub fn stale(&self) -> bool {
        self.roster.stale || self.stats.stale
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    #[serde(rename = "match")]
    pub game: Match,
    pub home: TeamDetail,
    pub away: TeamDetail,
}
