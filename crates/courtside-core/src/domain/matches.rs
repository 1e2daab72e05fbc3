use chrono::{
    DateTime,
    NaiveDate,
    Utc,
};
use courtside_source_api::{
    BookmakerLine,
    Game,
    GameStatus,
    OddsQuote,
    TeamRef,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::record::Record;
use super::team_keys::{
    self,
    match_key,
    team_ref_key,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Natural key shared by every source reporting this fixture
    pub key: String,
    /// Id local to the source that supplied the record
    pub source_id: String,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_key: String,
    pub away_key: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub betting_odds: Option<Record<BettingOdds>>,
}

impl Match {
    pub fn from_game(game: Game, source: &str) -> Self {
        let home_key = team_ref_key(&game.home, source);
        let away_key = team_ref_key(&game.away, source);

        Self {
            key: match_key(game.scheduled_at, &away_key, &home_key),
            source_id: game.id,
            home: game.home,
            away: game.away,
            home_key,
            away_key,
            scheduled_at: game.scheduled_at,
            status: game.status,
            home_score: game.home_score,
            away_score: game.away_score,
            venue: game.venue,
            season: game.season,
            attendance: game.attendance,
            betting_odds: None,
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        let team = team.trim();
        if team.is_empty() {
            return false;
        }

        let wanted = team_keys::canonical_abbreviation(team)
            .map(str::to_string)
            .unwrap_or_else(|| team.to_uppercase());

        [&self.home, &self.away]
            .iter()
            .any(|side| side.id == team || side.name.eq_ignore_ascii_case(team))
            || self.home_key == wanted
            || self.away_key == wanted
    }

    /// Winner by final score; `None` before completion or on a tie
    pub fn home_won(&self) -> Option<bool> {
        if !self.status.is_completed() {
            return None;
        }
        match (self.home_score?, self.away_score?) {
            (home, away) if home > away => Some(true),
            (home, away) if home < away => Some(false),
            _ => None,
        }
    }
}

/// Key an odds quote joins on
pub fn odds_key(quote: &OddsQuote) -> String {
    match_key(
        quote.commence_time,
        &team_keys::name_key(&quote.away_team),
        &team_keys::name_key(&quote.home_team),
    )
}

/// Consensus prices across bookmakers, decimal format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingOdds {
    pub event_id: String,
    pub home_price: Option<f64>,
    pub away_price: Option<f64>,
    pub draw_price: Option<f64>,
    /// American-format moneyline for the home side (e.g. "-150", "+130")
    pub home_moneyline: Option<String>,
    pub total_line: Option<f64>,
    pub over_price: Option<f64>,
    pub under_price: Option<f64>,
    pub home_spread: Option<f64>,
    pub away_spread: Option<f64>,
    pub bookmaker_count: usize,
    pub lines: Vec<BookmakerLine>,
}

impl BettingOdds {
    pub fn from_quote(quote: OddsQuote) -> Self {
        let lines = quote.bookmakers;
        let home_price = consensus(&lines, |l| l.home_price);

        Self {
            event_id: quote.event_id,
            home_price,
            away_price: consensus(&lines, |l| l.away_price),
            draw_price: consensus(&lines, |l| l.draw_price),
            home_moneyline: home_price.and_then(american_odds),
            total_line: consensus(&lines, |l| l.total_line),
            over_price: consensus(&lines, |l| l.over_price),
            under_price: consensus(&lines, |l| l.under_price),
            home_spread: consensus(&lines, |l| l.home_spread),
            away_spread: consensus(&lines, |l| l.away_spread),
            bookmaker_count: lines.len(),
            lines,
        }
    }

    /// Lower decimal price is the favourite; home wins a tie
    pub fn favourite_is_home(&self) -> Option<bool> {
        let home = self.home_price?;
        let away = self.away_price?;
        Some(home <= away)
    }
}

fn consensus<F>(lines: &[BookmakerLine], field: F) -> Option<f64>
where
    F: Fn(&BookmakerLine) -> Option<f64>,
{
    let prices: Vec<f64> = lines
        .iter()
        .filter_map(&field)
        .filter(|p| p.is_finite())
        .collect();
    if prices.is_empty() {
        return None;
    }
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// Decimal to American odds. Prices of 1.0 or less have no American form.
pub fn american_odds(decimal: f64) -> Option<String> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return None;
    }
    if decimal >= 2.0 {
        Some(format!("+{:.0}", (decimal - 1.0) * 100.0))
    } else {
        Some(format!("{:.0}", -100.0 / (decimal - 1.0)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    pub status: Option<GameStatus>,
    /// Any abbreviation, alias, full name or source-local id
    pub team: Option<String>,
    /// Inclusive league dates, see [`team_keys::league_date`]
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl MatchFilter {
    pub fn matches(&self, m: &Match) -> bool {
        if let Some(status) = self.status {
            if m.status != status {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if !m.involves(team) {
                return false;
            }
        }
        let day = team_keys::league_date(m.scheduled_at);
        if self.from.is_some_and(|from| day < from) {
            return false;
        }
        if self.to.is_some_and(|to| day > to) {
            return false;
        }
        true
    }
}
