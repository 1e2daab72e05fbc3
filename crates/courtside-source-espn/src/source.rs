//! ESPN source implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use courtside_source_api::*;

use crate::{
    client,
    config,
    metadata,
};

/// ESPN source for teams and games
pub struct EspnSource {
    metadata: SourceMetadata,
    client: Option<client::EspnClient>,
}

impl Default for EspnSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EspnSource {
    pub fn new() -> Self {
        Self {
            metadata: metadata::create_metadata(),
            client: None,
        }
    }

    fn client(&self) -> SourceResult<&client::EspnClient> {
        self.client
            .as_ref()
            .ok_or_else(|| SourceError::NotConfigured("ESPN source not initialized".to_string()))
    }
}

#[async_trait]
impl SourceClient for EspnSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn initialize(
        &mut self, config: HashMap<String, String>, http_client: Option<Arc<reqwest::Client>>,
    ) -> SourceResult<()> {
        let config = config::parse_config(&config);

        let http_client = match http_client {
            Some(client) => client,
            None => Arc::new(reqwest::Client::builder().build().map_err(|e| {
                SourceError::NotConfigured(format!("Failed to build HTTP client: {e}"))
            })?),
        };

        self.metadata.base_url = config.base_url.clone();
        self.client = Some(client::EspnClient::new(http_client, config));

        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_teams(&self, _query: &TeamQuery) -> SourceResult<Vec<Team>> {
        self.client()?.fetch_teams().await
    }

    async fn fetch_games(&self, query: &GameQuery) -> SourceResult<Vec<Game>> {
        self.client()?.fetch_games(query).await
    }

    async fn fetch_roster(&self, query: &RosterQuery) -> SourceResult<Vec<Player>> {
        self.client()?.fetch_roster(query).await
    }

    async fn fetch_team_stats(&self, query: &RosterQuery) -> SourceResult<Vec<TeamStat>> {
        self.client()?.fetch_team_stats(query).await
    }
}
