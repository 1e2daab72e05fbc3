//! Natural keys for teams and matches.
//!
//! Providers disagree on abbreviations (`GS` vs `GSW`, `BRK` vs `BKN`) and
//! the odds feed only carries full names. Everything is folded onto the
//! canonical NBA tricode before records from different sources are compared.

use chrono::{
    DateTime,
    NaiveDate,
    Utc,
};
use chrono_tz::America::New_York;
use courtside_source_api::{
    Team,
    TeamRef,
};

pub struct TeamInfo {
    pub abbreviation: &'static str,
    pub name: &'static str,
    pub conference: &'static str,
    pub division: &'static str,
    aliases: &'static [&'static str],
}

macro_rules! team {
    ($abbr:literal, $name:literal, $conf:literal, $div:literal, [$($alias:literal),*]) => {
        TeamInfo {
            abbreviation: $abbr,
            name: $name,
            conference: $conf,
            division: $div,
            aliases: &[$($alias),*],
        }
    };
}

pub static NBA_TEAMS: [TeamInfo; 30] = [
    team!("ATL", "Atlanta Hawks", "East", "Southeast", []),
    team!("BOS", "Boston Celtics", "East", "Atlantic", []),
    team!("BKN", "Brooklyn Nets", "East", "Atlantic", ["BRK", "BKLYN"]),
    team!("CHA", "Charlotte Hornets", "East", "Southeast", ["CHO"]),
    team!("CHI", "Chicago Bulls", "East", "Central", []),
    team!("CLE", "Cleveland Cavaliers", "East", "Central", []),
    team!("DAL", "Dallas Mavericks", "West", "Southwest", []),
    team!("DEN", "Denver Nuggets", "West", "Northwest", []),
    team!("DET", "Detroit Pistons", "East", "Central", []),
    team!("GSW", "Golden State Warriors", "West", "Pacific", ["GS"]),
    team!("HOU", "Houston Rockets", "West", "Southwest", []),
    team!("IND", "Indiana Pacers", "East", "Central", []),
    team!("LAC", "LA Clippers", "West", "Pacific", ["Los Angeles Clippers"]),
    team!("LAL", "Los Angeles Lakers", "West", "Pacific", ["LA Lakers"]),
    team!("MEM", "Memphis Grizzlies", "West", "Southwest", []),
    team!("MIA", "Miami Heat", "East", "Southeast", []),
    team!("MIL", "Milwaukee Bucks", "East", "Central", []),
    team!("MIN", "Minnesota Timberwolves", "West", "Northwest", []),
    team!("NOP", "New Orleans Pelicans", "West", "Southwest", ["NO", "NOR"]),
    team!("NYK", "New York Knicks", "East", "Atlantic", ["NY"]),
    team!("OKC", "Oklahoma City Thunder", "West", "Northwest", []),
    team!("ORL", "Orlando Magic", "East", "Southeast", []),
    team!("PHI", "Philadelphia 76ers", "East", "Atlantic", []),
    team!("PHX", "Phoenix Suns", "West", "Pacific", ["PHO"]),
    team!("POR", "Portland Trail Blazers", "West", "Northwest", []),
    team!("SAC", "Sacramento Kings", "West", "Pacific", []),
    team!("SAS", "San Antonio Spurs", "West", "Southwest", ["SA"]),
    team!("TOR", "Toronto Raptors", "East", "Atlantic", []),
    team!("UTA", "Utah Jazz", "West", "Northwest", ["UTAH"]),
    team!("WAS", "Washington Wizards", "East", "Southeast", ["WSH"]),
];

/// Resolves an abbreviation, alias or full name to the reference entry
pub fn lookup(value: &str) -> Option<&'static TeamInfo> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NBA_TEAMS.iter().find(|team| {
        team.abbreviation.eq_ignore_ascii_case(value)
            || team.name.eq_ignore_ascii_case(value)
            || team.aliases.iter().any(|a| a.eq_ignore_ascii_case(value))
    })
}

pub fn canonical_abbreviation(value: &str) -> Option<&'static str> {
    lookup(value).map(|team| team.abbreviation)
}

fn key_from_parts(abbreviation: &str, name: &str, source: &str, id: &str) -> String {
    let canonical =
        canonical_abbreviation(abbreviation).or_else(|| canonical_abbreviation(name));
    if let Some(canonical) = canonical {
        return canonical.to_string();
    }

    let abbreviation = abbreviation.trim();
    if !abbreviation.is_empty() {
        return abbreviation.to_uppercase();
    }

    format!("{source}:{id}")
}

pub fn team_key(team: &Team, source: &str) -> String {
    key_from_parts(&team.short_name, &team.name, source, &team.id)
}

pub fn team_ref_key(team: &TeamRef, source: &str) -> String {
    key_from_parts(&team.abbreviation, &team.name, source, &team.id)
}

/// Key for a team known only by its display name (odds feed)
pub fn name_key(name: &str) -> String {
    canonical_abbreviation(name)
        .map(str::to_string)
        .unwrap_or_else(|| name.trim().to_uppercase())
}

/// Calendar date the league schedules a game under. Evening tip-offs in
/// the US cross midnight UTC, so the date is taken in US Eastern time.
pub fn league_date(scheduled_at: DateTime<Utc>) -> NaiveDate {
    scheduled_at.with_timezone(&New_York).date_naive()
}

/// `"{yyyymmdd}:{away}@{home}"` using the league (US Eastern) date
pub fn match_key(scheduled_at: DateTime<Utc>, away_key: &str, home_key: &str) -> String {
    format!("{}:{away_key}@{home_key}", league_date(scheduled_at).format("%Y%m%d"))
}

/// Fills conference and division from the reference table when a provider
/// leaves them out
pub fn enrich_team(team: &mut Team) {
    let Some(info) = lookup(&team.short_name).or_else(|| lookup(&team.name)) else {
        return;
    };

    if team.conference.is_none() {
        team.conference = Some(info.conference.to_string());
    }
    if team.division.is_none() {
        team.division = Some(info.division.to_string());
    }
}
