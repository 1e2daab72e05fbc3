//! stats.nba.com source for Courtside
//!
//! Secondary live source for teams and games. The stats site answers with
//! tabular `resultSets` and only serves requests carrying nba.com browser
//! headers.

mod client;
mod config;
mod mapper;
mod metadata;
mod source;
mod types;

pub use metadata::SOURCE_ID;
pub use source::NbaStatsSource;
