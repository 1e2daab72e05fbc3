use std::collections::HashMap;

use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    Utc,
};
use chrono_tz::America::New_York;
use courtside_source_api::{
    Game,
    GameStatus,
    SourceError,
    SourceResult,
    Team,
    TeamRef,
};

use crate::types::{
    ResultSet,
    Row,
    StatsResponse,
};

fn first_result_set(response: StatsResponse, context: &str) -> SourceResult<ResultSet> {
    response
        .result_sets
        .and_then(|sets| sets.into_iter().next())
        .ok_or_else(|| SourceError::ParseError(format!("{context} payload has no resultSets")))
}

/// Keeps only franchises active in the most recent `MAX_YEAR`
pub(crate) fn map_teams(response: StatsResponse) -> SourceResult<Vec<Team>> {
    let set = first_result_set(response, "commonteamyears")?;

    if !set.headers.iter().any(|h| h == "TEAM_ID") {
        return Err(SourceError::ParseError(
            "commonteamyears is missing TEAM_ID".to_string(),
        ));
    }

    let Some(current_year) = set.rows().filter_map(|row| row.integer("MAX_YEAR")).max() else {
        return Ok(Vec::new());
    };

    let teams = set
        .rows()
        .filter(|row| row.integer("MAX_YEAR") == Some(current_year))
        .filter_map(|row| {
            let mapped = map_team_row(&row);
            if mapped.is_none() {
                tracing::debug!("Skipping NBA team row without id or abbreviation");
            }
            mapped
        })
        .collect();

    Ok(teams)
}

fn map_team_row(row: &Row<'_>) -> Option<Team> {
    let id = row.text("TEAM_ID")?;
    let abbreviation = row.text("ABBREVIATION")?;

    Some(Team {
        id,
        name: row.text("TEAM_NAME").unwrap_or_else(|| abbreviation.clone()),
        city: row.text("TEAM_CITY").unwrap_or_default(),
        short_name: abbreviation,
        league: "NBA".to_string(),
        conference: row.text("CONFERENCE"),
        division: row.text("DIVISION"),
        logo_url: None,
        primary_color: None,
        venue: None,
    })
}

struct GameRow {
    team: TeamRef,
    points: Option<u32>,
    decided: bool,
    season: Option<String>,
    date: Option<DateTime<Utc>>,
}

/// leaguegamefinder returns one row per team per game; rows are paired by
/// `GAME_ID` and `MATCHUP` decides which side is home
pub(crate) fn map_games(response: StatsResponse) -> SourceResult<Vec<Game>> {
    let set = first_result_set(response, "leaguegamefinder")?;

    let mut order: Vec<String> = Vec::new();
    let mut sides: HashMap<String, (Option<GameRow>, Option<GameRow>)> = HashMap::new();

    for row in set.rows() {
        let Some(game_id) = row.text("GAME_ID") else {
            tracing::debug!("Skipping NBA game row without GAME_ID");
            continue;
        };
        let Some(is_home) = row.text("MATCHUP").and_then(|m| matchup_is_home(&m)) else {
            tracing::debug!(game_id = %game_id, "Skipping NBA game row with unreadable MATCHUP");
            continue;
        };
        let Some(game_row) = map_game_row(&row) else {
            tracing::debug!(game_id = %game_id, "Skipping NBA game row without team");
            continue;
        };

        let entry = sides.entry(game_id.clone()).or_insert_with(|| {
            order.push(game_id.clone());
            (None, None)
        });
        if is_home {
            entry.0 = Some(game_row);
        } else {
            entry.1 = Some(game_row);
        }
    }

    let games = order
        .into_iter()
        .filter_map(|game_id| {
            let (home, away) = sides.remove(&game_id)?;
            match (home, away) {
                (Some(home), Some(away)) => pair_game(game_id, home, away),
                _ => {
                    tracing::debug!(game_id = %game_id, "Skipping NBA game with one side only");
                    None
                }
            }
        })
        .collect();

    Ok(games)
}

fn pair_game(id: String, home: GameRow, away: GameRow) -> Option<Game> {
    let scheduled_at = home.date.or(away.date)?;
    let status = if home.decided || away.decided {
        GameStatus::Final
    } else {
        GameStatus::Scheduled
    };
    let scored = status.is_completed();

    Some(Game {
        id,
        season: home.season.or(away.season),
        home_score: if scored { home.points } else { None },
        away_score: if scored { away.points } else { None },
        home: home.team,
        away: away.team,
        scheduled_at,
        status,
        venue: None,
        attendance: None,
    })
}

fn map_game_row(row: &Row<'_>) -> Option<GameRow> {
    let team = TeamRef {
        id: row.text("TEAM_ID")?,
        abbreviation: row.text("TEAM_ABBREVIATION")?,
        name: row.text("TEAM_NAME").unwrap_or_default(),
    };

    Some(GameRow {
        team,
        points: row.integer("PTS").and_then(|p| u32::try_from(p).ok()),
        decided: row.text("WL").is_some(),
        season: row.text("SEASON_ID").map(|s| season_year(&s)),
        date: row.text("GAME_DATE").and_then(|d| parse_game_date(&d)),
    })
}

/// `"BOS vs. GSW"` is the home row, `"GSW @ BOS"` the away row
pub(crate) fn matchup_is_home(matchup: &str) -> Option<bool> {
    if matchup.contains(" vs. ") || matchup.contains(" vs ") {
        Some(true)
    } else if matchup.contains(" @ ") {
        Some(false)
    } else {
        None
    }
}

/// `SEASON_ID` prefixes the start year with a season-type digit ("22023")
fn season_year(season_id: &str) -> String {
    if season_id.len() == 5 && season_id.chars().all(|c| c.is_ascii_digit()) {
        season_id[1..].to_string()
    } else {
        season_id.to_string()
    }
}

/// GAME_DATE is the US Eastern calendar date without a tip-off time. Games are
/// placed at 19:00 Eastern on that date so the league date survives the trip
/// through UTC.
pub(crate) fn parse_game_date(date: &str) -> Option<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })?;

    day.and_hms_opt(19, 0, 0)?
        .and_local_timezone(New_York)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
