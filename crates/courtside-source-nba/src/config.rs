use std::collections::HashMap;
use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "https://stats.nba.com/stats";
// stats.nba.com is slow to answer
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_LEAGUE_ID: &str = "00";

#[derive(Debug, Clone)]
pub(crate) struct NbaConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub league_id: String,
}

pub(crate) fn parse_config(config: &HashMap<String, String>) -> NbaConfig {
    let base_url = config
        .get("base_url")
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let timeout = config
        .get("timeout_ms")
        .and_then(|ms| ms.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_TIMEOUT);

    let league_id = config
        .get("league_id")
        .cloned()
        .unwrap_or_else(|| DEFAULT_LEAGUE_ID.to_string());

    NbaConfig {
        base_url,
        timeout,
        league_id,
    }
}
