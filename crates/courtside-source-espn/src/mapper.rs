use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    Utc,
};
use courtside_source_api::{
    Game,
    GameStatus,
    Player,
    SourceError,
    SourceResult,
    Team,
    TeamRef,
    TeamStat,
};

use crate::types;

const HIGH_RES_LOGO_WIDTH: u32 = 500;

pub(crate) fn map_teams(response: types::TeamsResponse) -> SourceResult<Vec<Team>> {
    let league = response
        .sports
        .into_iter()
        .next()
        .and_then(|sport| sport.leagues.into_iter().next())
        .ok_or_else(|| SourceError::ParseError("teams payload has no sports/leagues".to_string()))?;

    let teams = league
        .teams
        .into_iter()
        .filter_map(|entry| {
            let team = entry.team?;
            let mapped = map_team(team);
            if mapped.is_none() {
                tracing::debug!("Skipping ESPN team without id");
            }
            mapped
        })
        .collect();

    Ok(teams)
}

pub(crate) fn map_team(team: types::Team) -> Option<Team> {
    let id = team.id.filter(|id| !id.is_empty())?;

    Some(Team {
        id,
        name: team.display_name,
        short_name: team.abbreviation,
        city: team.location,
        league: "NBA".to_string(),
        conference: None,
        division: None,
        logo_url: extract_logo_url(&team.logos),
        primary_color: team.color.filter(|c| !c.is_empty()),
        venue: team.venue.and_then(venue_name),
    })
}

pub(crate) fn extract_logo_url(logos: &[types::Logo]) -> Option<String> {
    logos
        .iter()
        .find(|logo| logo.width >= HIGH_RES_LOGO_WIDTH)
        .or_else(|| logos.first())
        .and_then(|logo| logo.href.clone())
}

fn venue_name(venue: types::Venue) -> Option<String> {
    venue.full_name.or(venue.name)
}

pub(crate) fn map_games(response: types::ScoreboardResponse) -> SourceResult<Vec<Game>> {
    let events = response
        .events
        .ok_or_else(|| SourceError::ParseError("scoreboard payload has no events".to_string()))?;

    let games = events
        .into_iter()
        .filter_map(|event| {
            let id = event.id.clone().unwrap_or_default();
            let mapped = map_event(event);
            if mapped.is_none() {
                tracing::debug!(event_id = %id, "Skipping incomplete ESPN event");
            }
            mapped
        })
        .collect();

    Ok(games)
}

pub(crate) fn map_event(event: types::Event) -> Option<Game> {
    let id = event.id.filter(|id| !id.is_empty())?;
    let scheduled_at = parse_event_date(event.date.as_deref()?)?;
    let competition = event.competitions.into_iter().next()?;

    let (description, state) = event
        .status
        .and_then(|s| s.status_type)
        .map(|t| (t.description, t.state))
        .unwrap_or((None, None));
    let status = map_status(description.as_deref(), state.as_deref());

    let mut home = None;
    let mut away = None;
    for competitor in competition.competitors {
        match competitor.home_away.as_deref() {
            Some("home") => home = Some(competitor),
            Some("away") => away = Some(competitor),
            _ => {}
        }
    }
    let home = home?;
    let away = away?;

    // ESPN reports "0" for games that have not started
    let scored = matches!(status, GameStatus::Live | GameStatus::Final);
    let home_score = if scored { parse_score(&home.score) } else { None };
    let away_score = if scored { parse_score(&away.score) } else { None };

    Some(Game {
        id,
        home: team_ref(home.team?)?,
        away: team_ref(away.team?)?,
        scheduled_at,
        status,
        season: event
            .season
            .and_then(|s| s.year)
            .map(|year| year.to_string()),
        home_score,
        away_score,
        venue: competition.venue.and_then(venue_name),
        attendance: competition.attendance.filter(|&a| a > 0),
    })
}

fn team_ref(team: types::CompetitorTeam) -> Option<TeamRef> {
    Some(TeamRef {
        id: team.id.filter(|id| !id.is_empty())?,
        name: team.display_name,
        abbreviation: team.abbreviation,
    })
}

pub(crate) fn map_status(description: Option<&str>, state: Option<&str>) -> GameStatus {
    let description = description.unwrap_or_default().to_lowercase();

    if description.contains("postponed") || description.contains("canceled") {
        return GameStatus::Postponed;
    }

    match state {
        Some("pre") => return GameStatus::Scheduled,
        Some("in") => return GameStatus::Live,
        Some("post") => return GameStatus::Final,
        _ => {}
    }

    if description.starts_with("final") {
        GameStatus::Final
    } else if description.contains("progress")
        || description.contains("halftime")
        || description.starts_with("end of")
    {
        GameStatus::Live
    } else if description.contains("scheduled") {
        GameStatus::Scheduled
    } else {
        GameStatus::Unknown
    }
}

fn parse_score(score: &Option<serde_json::Value>) -> Option<u32> {
    match score.as_ref()? {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

/// ESPN dates usually omit seconds ("2024-01-15T00:30Z")
pub(crate) fn parse_event_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn map_roster(response: types::RosterResponse, team_id: &str) -> Vec<Player> {
    response
        .athletes
        .into_iter()
        .filter_map(|entry| {
            let athlete = match entry.athlete {
                Some(inner) => *inner,
                None => entry,
            };
            let mapped = map_athlete(athlete, team_id);
            if mapped.is_none() {
                tracing::debug!(team = %team_id, "Skipping ESPN athlete without id or name");
            }
            mapped
        })
        .collect()
}

fn map_athlete(athlete: types::Athlete, team_id: &str) -> Option<Player> {
    let id = athlete.id.filter(|id| !id.is_empty())?;

    let (first_name, last_name) = if athlete.first_name.is_empty() && athlete.last_name.is_empty()
    {
        let display = athlete.display_name.trim();
        match display.split_once(' ') {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (display.to_string(), String::new()),
        }
    } else {
        (athlete.first_name, athlete.last_name)
    };
    if first_name.is_empty() && last_name.is_empty() {
        return None;
    }

    Some(Player {
        id,
        first_name,
        last_name,
        team_id: team_id.to_string(),
        position: athlete
            .position
            .and_then(|p| p.abbreviation)
            .filter(|p| !p.is_empty()),
        jersey: athlete.jersey.filter(|j| !j.is_empty()),
        height: athlete.display_height.filter(|h| !h.is_empty()),
        weight: athlete.display_weight.filter(|w| !w.is_empty()),
        date_of_birth: athlete.date_of_birth.as_deref().and_then(parse_birth_date),
    })
}

/// "1998-03-03T08:00Z"; only the calendar date is kept
fn parse_birth_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
}

pub(crate) fn map_team_stats(response: types::TeamStatsResponse) -> SourceResult<Vec<TeamStat>> {
    let block = response
        .results
        .and_then(|results| results.stats)
        .or(response.stats)
        .ok_or_else(|| {
            SourceError::ParseError("team statistics payload has no stats".to_string())
        })?;

    let stats = block
        .categories
        .into_iter()
        .flat_map(|category| {
            let name = category.name;
            category.stats.into_iter().filter_map(move |stat| {
                if stat.name.is_empty() {
                    return None;
                }
                let value = match stat.value {
                    Some(serde_json::Value::Number(n)) => n.as_f64(),
                    Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
                    _ => None,
                };
                Some(TeamStat {
                    category: name.clone(),
                    label: if stat.display_name.is_empty() {
                        stat.name.clone()
                    } else {
                        stat.display_name
                    },
                    name: stat.name,
                    value,
                    display_value: stat.display_value,
                })
            })
        })
        .collect();

    Ok(stats)
}
