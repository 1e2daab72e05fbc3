use chrono::{
    DateTime,
    Utc,
};
use courtside_source_api::{
    BookmakerLine,
    OddsQuote,
};

use crate::types;

pub(crate) fn map_events(events: Vec<types::Event>, sport: &str) -> Vec<OddsQuote> {
    events
        .into_iter()
        .filter_map(|event| {
            let id = event.id.clone();
            let mapped = map_event(event, sport);
            if mapped.is_none() {
                tracing::debug!(
                    event_id = %id,
                    "Skipping odds event with unreadable commence_time"
                );
            }
            mapped
        })
        .collect()
}

pub(crate) fn map_event(event: types::Event, sport: &str) -> Option<OddsQuote> {
    let commence_time = parse_time(&event.commence_time)?;

    let bookmakers = event
        .bookmakers
        .into_iter()
        .map(|bookmaker| map_bookmaker(bookmaker, &event.home_team, &event.away_team))
        .collect();

    Some(OddsQuote {
        event_id: event.id,
        sport: if event.sport_key.is_empty() {
            sport.to_string()
        } else {
            event.sport_key
        },
        home_team: event.home_team,
        away_team: event.away_team,
        commence_time,
        completed: event.completed,
        bookmakers,
    })
}

pub(crate) fn map_bookmaker(
    bookmaker: types::Bookmaker, home_team: &str, away_team: &str,
) -> BookmakerLine {
    let mut line = BookmakerLine {
        bookmaker: if bookmaker.title.is_empty() {
            bookmaker.key
        } else {
            bookmaker.title
        },
        last_update: bookmaker.last_update.as_deref().and_then(parse_time),
        ..Default::default()
    };

    for market in bookmaker.markets {
        match market.key.as_str() {
            "h2h" => {
                for outcome in market.outcomes {
                    if outcome.name == home_team {
                        line.home_price = outcome.price;
                    } else if outcome.name == away_team {
                        line.away_price = outcome.price;
                    } else {
                        line.draw_price = outcome.price;
                    }
                }
            }
            "totals" => {
                for outcome in market.outcomes {
                    match outcome.name.as_str() {
                        "Over" => {
                            line.over_price = outcome.price;
                            line.total_line = outcome.point.or(line.total_line);
                        }
                        "Under" => {
                            line.under_price = outcome.price;
                            line.total_line = line.total_line.or(outcome.point);
                        }
                        _ => {}
                    }
                }
            }
            "spreads" => {
                for outcome in market.outcomes {
                    if outcome.name == home_team {
                        line.home_spread = outcome.point;
                        line.home_spread_price = outcome.price;
                    } else if outcome.name == away_team {
                        line.away_spread = outcome.point;
                        line.away_spread_price = outcome.price;
                    }
                }
            }
            other => tracing::debug!(market = %other, "Ignoring unknown odds market"),
        }
    }

    line
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
