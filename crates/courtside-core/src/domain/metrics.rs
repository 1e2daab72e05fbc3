use std::collections::BTreeMap;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::matches::Match;
use super::record::Record;

pub const DEFAULT_STAKE: f64 = 10.0;
pub const DEFAULT_STARTING_BALANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerSettings {
    pub stake: f64,
    pub starting_balance: f64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            stake: DEFAULT_STAKE,
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}

/// Dashboard snapshot derived from the current match set. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    /// Percentage of settled picks that won, one decimal
    pub win_rate: f64,
    pub starting_balance: f64,
    pub current_balance: f64,
    pub total_profit: f64,
    /// Profit over total staked, percentage with one decimal
    pub roi: f64,
    pub total_picks: usize,
    pub successful_picks: usize,
    /// Mean decimal price of the settled picks
    pub average_odds: Option<f64>,
    pub total_matches: usize,
    pub matches_by_status: BTreeMap<String, usize>,
    pub matches_with_odds: usize,
    pub partial: bool,
    pub stale: bool,
    pub generated_at: DateTime<Utc>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Flat-stake favourite ledger.
///
/// Every completed match with consensus prices on both sides settles one pick
/// on the lower-priced side. A win pays `stake * (price - 1)`, a loss costs
/// the stake. Tied scores and matches without both prices are not settled.
pub fn compute(
    matches: &[Record<Match>], settings: LedgerSettings, partial: bool, stale: bool,
) -> AggregatedMetrics {
    let mut matches_by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut matches_with_odds = 0;
    let mut total_picks = 0usize;
    let mut successful_picks = 0usize;
    let mut total_profit = 0.0;
    let mut price_sum = 0.0;

    for record in matches {
        let m = &record.data;
        *matches_by_status
            .entry(m.status.as_str().to_string())
            .or_default() += 1;

        let Some(odds) = m.betting_odds.as_ref().map(|o| &o.data) else {
            continue;
        };
        matches_with_odds += 1;

        let (Some(home_won), Some(home_fav)) = (m.home_won(), odds.favourite_is_home()) else {
            continue;
        };
        let price = if home_fav {
            odds.home_price
        } else {
            odds.away_price
        };
        let Some(price) = price else {
            continue;
        };

        total_picks += 1;
        price_sum += price;
        if home_won == home_fav {
            successful_picks += 1;
            total_profit += settings.stake * (price - 1.0);
        } else {
            total_profit -= settings.stake;
        }
    }

    let win_rate = if total_picks > 0 {
        round_to(successful_picks as f64 / total_picks as f64 * 100.0, 1)
    } else {
        0.0
    };
    let staked = settings.stake * total_picks as f64;
    let roi = if staked > 0.0 {
        round_to(total_profit / staked * 100.0, 1)
    } else {
        0.0
    };
    let total_profit = round_to(total_profit, 2);

    AggregatedMetrics {
        win_rate,
        starting_balance: round_to(settings.starting_balance, 2),
        current_balance: round_to(settings.starting_balance + total_profit, 2),
        total_profit,
        roi,
        total_picks,
        successful_picks,
        average_odds: (total_picks > 0).then(|| round_to(price_sum / total_picks as f64, 2)),
        total_matches: matches.len(),
        matches_by_status,
        matches_with_odds,
        partial,
        stale,
        generated_at: Utc::now(),
    }
}
