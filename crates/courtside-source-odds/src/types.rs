//! Response types for The Odds API v4

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Event {
    pub id: String,
    #[serde(default)]
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Bookmaker {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    pub last_update: Option<String>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Outcome {
    pub name: String,
    pub price: Option<f64>,
    pub point: Option<f64>,
}
