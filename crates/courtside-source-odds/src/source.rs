use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use courtside_source_api::*;

use crate::{
    client,
    config,
    metadata,
};

/// Odds-only source. Without an `api_key` it stays registered but unconfigured.
pub struct OddsApiSource {
    metadata: SourceMetadata,
    client: Option<client::OddsClient>,
}

impl Default for OddsApiSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OddsApiSource {
    pub fn new() -> Self {
        Self {
            metadata: metadata::create_metadata(),
            client: None,
        }
    }
}

#[async_trait]
impl SourceClient for OddsApiSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn initialize(
        &mut self, config: HashMap<String, String>, http_client: Option<Arc<reqwest::Client>>,
    ) -> SourceResult<()> {
        let config = config::parse_config(&config);
        self.metadata.base_url = config.base_url.clone();

        let Some(api_key) = config.api_key.clone() else {
            tracing::info!("No Odds API key configured, odds source disabled");
            self.client = None;
            return Ok(());
        };

        let http_client = match http_client {
            Some(client) => client,
            None => Arc::new(reqwest::Client::builder().build().map_err(|e| {
                SourceError::NotConfigured(format!("Failed to build HTTP client: {e}"))
            })?),
        };

        self.client = Some(client::OddsClient::new(http_client, config, api_key));
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn fetch_odds(&self, query: &OddsQuery) -> SourceResult<Vec<OddsQuote>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SourceError::NotConfigured("Odds API key not set".to_string()))?;

        client.fetch_odds(query.sport.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let mut source = OddsApiSource::new();
        source.initialize(HashMap::new(), None).unwrap();

        assert!(!source.is_configured());
        let err = source.fetch_odds(&OddsQuery::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
    }

    #[test]
    fn test_key_configures_source() {
        let mut source = OddsApiSource::new();
        let mut config = HashMap::new();
        config.insert("api_key".to_string(), "secret".to_string());
        source.initialize(config, None).unwrap();

        assert!(source.is_configured());
        assert!(source.metadata().requires_credential);
        assert!(source.capabilities().odds);
        assert!(!source.capabilities().teams);
    }

    #[tokio::test]
    async fn test_teams_not_supported() {
        let source = OddsApiSource::new();
        let err = source.fetch_teams(&TeamQuery::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
    }

    #[tokio::test]
    async fn test_unreachable_host_does_not_leak_key() {
        let mut source = OddsApiSource::new();
        let mut config = HashMap::new();
        config.insert("api_key".to_string(), "s3cret-key".to_string());
        config.insert("base_url".to_string(), "http://127.0.0.1:1/v4".to_string());
        source.initialize(config, None).unwrap();

        let err = source.fetch_odds(&OddsQuery::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unreachable);
        assert!(!err.message().contains("s3cret-key"));
    }
}
