use std::collections::BTreeMap;

use courtside_source_api::{
    SourceTier,
    Team,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::health::HealthStatus;
use super::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub name: String,
    pub tier: SourceTier,
    pub configured: bool,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub total_teams: usize,
    pub by_conference: BTreeMap<String, usize>,
    pub by_division: BTreeMap<String, usize>,
    pub sources: BTreeMap<String, SourceSummary>,
    pub partial: bool,
    pub stale: bool,
}

const UNASSIGNED: &str = "unassigned";

pub fn count_groups(teams: &[Record<Team>]) -> (BTreeMap<String, usize>, BTreeMap<String, usize>) {
    let mut by_conference = BTreeMap::new();
    let mut by_division = BTreeMap::new();

    for team in teams {
        let conference = team.data.conference.as_deref().unwrap_or(UNASSIGNED);
        let division = team.data.division.as_deref().unwrap_or(UNASSIGNED);
        *by_conference.entry(conference.to_string()).or_insert(0) += 1;
        *by_division.entry(division.to_string()).or_insert(0) += 1;
    }

    (by_conference, by_division)
}
