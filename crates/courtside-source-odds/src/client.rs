//! HTTP client for The Odds API

use std::sync::Arc;

use courtside_source_api::{
    OddsQuote,
    SourceError,
    SourceResult,
};
use reqwest::Client;

use crate::config::OddsConfig;
use crate::{
    mapper,
    types,
};

pub(crate) struct OddsClient {
    client: Arc<Client>,
    config: OddsConfig,
    api_key: String,
}

impl OddsClient {
    pub fn new(client: Arc<Client>, config: OddsConfig, api_key: String) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }

    pub async fn fetch_odds(&self, sport: Option<&str>) -> SourceResult<Vec<OddsQuote>> {
        let sport = sport.unwrap_or(self.config.sport.as_str());
        let context = "Odds API odds";
        let url = format!("{}/sports/{sport}/odds", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", self.config.regions.as_str()),
                ("markets", self.config.markets.as_str()),
                ("dateFormat", "iso"),
            ])
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| SourceError::from_transport(context, e))?;

        if let Some(remaining) = response
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!(remaining = %remaining, "Odds API quota");
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::from_status(context, status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_transport(context, e))?;

        let events: Vec<types::Event> = serde_json::from_str(&body)
            .map_err(|e| SourceError::ParseError(format!("{context}: {e}")))?;

        let quotes = mapper::map_events(events, sport);
        tracing::debug!(count = quotes.len(), sport = %sport, "Retrieved odds");
        Ok(quotes)
    }
}
