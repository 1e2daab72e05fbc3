use std::collections::HashMap;
use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";
pub(crate) const DEFAULT_SPORT: &str = "basketball_nba";
const DEFAULT_REGIONS: &str = "us";
const DEFAULT_MARKETS: &str = "h2h,spreads,totals";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub(crate) struct OddsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub sport: String,
    pub regions: String,
    pub markets: String,
    pub timeout: Duration,
}

fn non_empty(config: &HashMap<String, String>, key: &str) -> Option<String> {
    config
        .get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_config(config: &HashMap<String, String>) -> OddsConfig {
    OddsConfig {
        base_url: non_empty(config, "base_url")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        api_key: non_empty(config, "api_key"),
        sport: non_empty(config, "sport").unwrap_or_else(|| DEFAULT_SPORT.to_string()),
        regions: non_empty(config, "regions").unwrap_or_else(|| DEFAULT_REGIONS.to_string()),
        markets: non_empty(config, "markets").unwrap_or_else(|| DEFAULT_MARKETS.to_string()),
        timeout: config
            .get("timeout_ms")
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT),
    }
}
