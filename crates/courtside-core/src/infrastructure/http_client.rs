use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use reqwest::{
    Client,
    Url,
};

use crate::domain::{
    CoreError,
    CoreResult,
};

pub const POOL_SIZE_ENV: &str = "COURTSIDE_HTTP_POOL_SIZE";
const DEFAULT_POOL_SIZE: usize = 10;
const USER_AGENT: &str = concat!("courtside/", env!("CARGO_PKG_VERSION"));

/// One pooled client per upstream origin. Request timeouts are set per call
/// by each binding, so clients here only bound connection setup.
pub struct HttpClientManager {
    pool_size: usize,
    clients: DashMap<String, Arc<Client>>,
}

impl HttpClientManager {
    pub fn new() -> Self {
        let pool_size = std::env::var(POOL_SIZE_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        Self::with_pool_size(pool_size)
    }

    pub fn with_pool_size(pool_size: usize) -> Self {
        Self {
            pool_size,
            clients: DashMap::new(),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn client_for_url(&self, base_url: &str) -> CoreResult<Arc<Client>> {
        let origin = origin_of(base_url);
        if let Some(client) = self.clients.get(&origin) {
            return Ok(Arc::clone(client.value()));
        }

        let client = Arc::new(self.build_client()?);
        let entry = self.clients.entry(origin).or_insert(client);
        Ok(Arc::clone(entry.value()))
    }

    fn build_client(&self) -> CoreResult<Client> {
        Client::builder()
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(self.pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| CoreError::InternalError(format!("Failed to create HTTP client: {e}")))
    }
}

impl Default for HttpClientManager {
    fn default() -> Self {
        Self::new()
    }
}

/// `scheme://host[:port]`, or the raw string when it does not parse
fn origin_of(base_url: &str) -> String {
    Url::parse(base_url)
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_else(|_| base_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clients_shared_per_origin() {
        let manager = HttpClientManager::with_pool_size(4);

        let scoreboard = manager
            .client_for_url("https://site.api.espn.com/apis/site/v2/sports")
            .unwrap();
        let teams = manager
            .client_for_url("https://site.api.espn.com/apis/v2/other")
            .unwrap();
        let stats = manager.client_for_url("https://stats.nba.com/stats").unwrap();

        assert!(Arc::ptr_eq(&scoreboard, &teams));
        assert!(!Arc::ptr_eq(&scoreboard, &stats));
        assert_eq!(manager.pool_size(), 4);
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://api.the-odds-api.com/v4"),
            "https://api.the-odds-api.com"
        );
        assert_eq!(origin_of("http://localhost:9000/x"), "http://localhost:9000");
        assert_eq!(origin_of("not a url"), "not a url");
    }
}
