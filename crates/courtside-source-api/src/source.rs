use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    SourceError,
    SourceResult,
};
use crate::types::*;

/// Whether a source talks to the network or serves bundled data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    Live,
    Fallback,
}

/// Which fetch operations a source implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceCapabilities {
    pub teams: bool,
    pub games: bool,
    pub odds: bool,
    /// Team rosters and season team statistics
    #[serde(default)]
    pub rosters: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Teams,
    Games,
    Odds,
    Rosters,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Teams => "teams",
            Capability::Games => "games",
            Capability::Odds => "odds",
            Capability::Rosters => "rosters",
        }
    }
}

impl SourceCapabilities {
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Teams => self.teams,
            Capability::Games => self.games,
            Capability::Odds => self.odds,
            Capability::Rosters => self.rosters,
        }
    }
}

/// Source metadata - describes a provider binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Stable identifier (e.g., "espn")
    pub id: String,
    /// Display name (e.g., "ESPN")
    pub name: String,
    pub description: String,
    pub tier: SourceTier,
    pub base_url: String,
    pub capabilities: SourceCapabilities,
    /// An absent credential leaves the source unconfigured
    pub requires_credential: bool,
}

/// Uniform fetch contract every provider binding implements
#[async_trait]
pub trait SourceClient: Send + Sync {
    fn metadata(&self) -> &SourceMetadata;

    /// Apply string configuration and an optional shared HTTP client
    fn initialize(
        &mut self, config: HashMap<String, String>, http_client: Option<Arc<reqwest::Client>>,
    ) -> SourceResult<()>;

    /// False when a required credential is missing
    fn is_configured(&self) -> bool {
        true
    }

    async fn fetch_teams(&self, _query: &TeamQuery) -> SourceResult<Vec<Team>> {
        Err(SourceError::NotConfigured(format!(
            "{} does not provide teams",
            self.id()
        )))
    }

    async fn fetch_games(&self, _query: &GameQuery) -> SourceResult<Vec<Game>> {
        Err(SourceError::NotConfigured(format!(
            "{} does not provide games",
            self.id()
        )))
    }

    async fn fetch_odds(&self, _query: &OddsQuery) -> SourceResult<Vec<OddsQuote>> {
        Err(SourceError::NotConfigured(format!(
            "{} does not provide odds",
            self.id()
        )))
    }

    async fn fetch_roster(&self, _query: &RosterQuery) -> SourceResult<Vec<Player>> {
        Err(SourceError::NotConfigured(format!(
            "{} does not provide rosters",
            self.id()
        )))
    }

    async fn fetch_team_stats(&self, _query: &RosterQuery) -> SourceResult<Vec<TeamStat>> {
        Err(SourceError::NotConfigured(format!(
            "{} does not provide team statistics",
            self.id()
        )))
    }

    fn id(&self) -> &str {
        &self.metadata().id
    }

    fn tier(&self) -> SourceTier {
        self.metadata().tier
    }

    fn capabilities(&self) -> SourceCapabilities {
        self.metadata().capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct TeamsOnly {
        metadata: SourceMetadata,
    }

    #[async_trait]
    impl SourceClient for TeamsOnly {
        fn metadata(&self) -> &SourceMetadata {
            &self.metadata
        }

        fn initialize(
            &mut self, _config: HashMap<String, String>, _http_client: Option<Arc<reqwest::Client>>,
        ) -> SourceResult<()> {
            Ok(())
        }

        async fn fetch_teams(&self, _query: &TeamQuery) -> SourceResult<Vec<Team>> {
            Ok(Vec::new())
        }
    }

    fn teams_only() -> TeamsOnly {
        TeamsOnly {
            metadata: SourceMetadata {
                id: "teams-only".to_string(),
                name: "Teams Only".to_string(),
                description: String::new(),
                tier: SourceTier::Live,
                base_url: "http://localhost".to_string(),
                capabilities: SourceCapabilities {
                    teams: true,
                    ..Default::default()
                },
                requires_credential: false,
            },
        }
    }

    #[tokio::test]
    async fn test_unimplemented_fetch_is_not_configured() {
        let source = teams_only();
        assert!(source.fetch_teams(&TeamQuery::default()).await.is_ok());

        let err = source.fetch_odds(&OddsQuery::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
        assert!(err.message().contains("teams-only"));

        let err = source
            .fetch_roster(&RosterQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
    }

    #[test]
    fn test_capability_lookup() {
        let source = teams_only();
        assert!(source.capabilities().supports(Capability::Teams));
        assert!(!source.capabilities().supports(Capability::Games));
        assert!(!source.capabilities().supports(Capability::Rosters));
        assert_eq!(source.id(), "teams-only");
        assert_eq!(source.tier(), SourceTier::Live);
    }
}
