use courtside_source_api::*;

use crate::config::DEFAULT_BASE_URL;

pub const SOURCE_ID: &str = "odds-api";

pub fn create_metadata() -> SourceMetadata {
    SourceMetadata {
        id: SOURCE_ID.to_string(),
        name: "The Odds API".to_string(),
        description: "Moneyline, spread and totals prices from US bookmakers".to_string(),
        tier: SourceTier::Live,
        base_url: DEFAULT_BASE_URL.to_string(),
        capabilities: SourceCapabilities {
            teams: false,
            games: false,
            odds: true,
            rosters: false,
        },
        requires_credential: true,
    }
}
