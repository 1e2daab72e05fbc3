use std::collections::HashMap;
use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub(crate) struct EspnConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

pub(crate) fn parse_config(config: &HashMap<String, String>) -> EspnConfig {
    let base_url = config
        .get("base_url")
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let api_key = config
        .get("api_key")
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    let timeout = config
        .get("timeout_ms")
        .and_then(|ms| ms.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_TIMEOUT);

    EspnConfig {
        base_url,
        api_key,
        timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_config(&HashMap::new());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_overrides() {
        let mut raw = HashMap::new();
        raw.insert("base_url".to_string(), "http://localhost:9000/".to_string());
        raw.insert("api_key".to_string(), "  ".to_string());
        raw.insert("timeout_ms".to_string(), "2500".to_string());

        let config = parse_config(&raw);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert!(config.api_key.is_none(), "blank key counts as absent");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }
}
