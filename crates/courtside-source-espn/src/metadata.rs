use courtside_source_api::*;

use crate::config::DEFAULT_BASE_URL;

pub const SOURCE_ID: &str = "espn";

pub fn create_metadata() -> SourceMetadata {
    SourceMetadata {
        id: SOURCE_ID.to_string(),
        name: "ESPN".to_string(),
        description: "NBA teams, scoreboard and rosters from the public ESPN site API".to_string(),
        tier: SourceTier::Live,
        base_url: DEFAULT_BASE_URL.to_string(),
        capabilities: SourceCapabilities {
            teams: true,
            games: true,
            odds: false,
            rosters: true,
        },
        requires_credential: false,
    }
}
