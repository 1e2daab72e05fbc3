use courtside_source_api::*;

use crate::config::DEFAULT_BASE_URL;

pub const SOURCE_ID: &str = "nba";

pub fn create_metadata() -> SourceMetadata {
    SourceMetadata {
        id: SOURCE_ID.to_string(),
        name: "NBA Stats".to_string(),
        description: "Franchises and game logs from stats.nba.com".to_string(),
        tier: SourceTier::Live,
        base_url: DEFAULT_BASE_URL.to_string(),
        capabilities: SourceCapabilities {
            teams: true,
            games: true,
            odds: false,
            rosters: false,
        },
        requires_credential: false,
    }
}
