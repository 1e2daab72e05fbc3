//! The Odds API source for Courtside
//!
//! Supplies bookmaker prices only. Teams and games come from the other
//! sources; odds are joined onto matches by the aggregator.

mod client;
mod config;
mod mapper;
mod metadata;
mod source;
mod types;

pub use metadata::SOURCE_ID;
pub use source::OddsApiSource;
