use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use courtside_source_api::Capability;
use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

use crate::application::data_service::{
    ServiceSettings,
    DEFAULT_MATCH_LIMIT,
    DEFAULT_REQUEST_TIMEOUT,
};
use crate::application::RateLimit;
use crate::domain::metrics::{
    LedgerSettings,
    DEFAULT_STAKE,
    DEFAULT_STARTING_BALANCE,
};

pub(super) const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

pub(super) const DEFAULT_CORS_ALLOW_ALL: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourtsideConfig {
    #[serde(default)]
    pub aggregator: AggregatorConfig,

    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default)]
    pub sources: IndexMap<String, SourceFileConfig>,

    #[serde(default)]
    pub server: ServerConfig,
}

impl CourtsideConfig {
    pub fn source(&self, id: &str) -> Option<&SourceFileConfig> {
        self.sources.get(id)
    }

    /// Sources are enabled unless their section says otherwise
    pub fn is_enabled(&self, id: &str) -> bool {
        self.source(id).is_none_or(|s| s.enabled)
    }

    pub fn service_settings(&self) -> ServiceSettings {
        let source_timeouts = self
            .sources
            .iter()
            .filter_map(|(id, s)| s.timeout_ms.map(|ms| (id.clone(), Duration::from_millis(ms))))
            .collect();

        ServiceSettings {
            request_timeout: Duration::from_millis(self.aggregator.request_timeout_ms),
            source_timeouts,
            ledger: LedgerSettings {
                stake: self.aggregator.stake,
                starting_balance: self.aggregator.starting_balance,
            },
            match_limit: self.aggregator.match_limit,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.aggregator.request_timeout_ms == 0 {
            return Err("aggregator.request_timeout_ms must be greater than zero".to_string());
        }
        if !self.aggregator.stake.is_finite() || self.aggregator.stake <= 0.0 {
            return Err("aggregator.stake must be a positive number".to_string());
        }
        if !self.aggregator.starting_balance.is_finite() {
            return Err("aggregator.starting_balance must be a finite number".to_string());
        }

        for (id, source) in &self.sources {
            if id.trim().is_empty() {
                return Err("Source sections must have a non-empty id".to_string());
            }
            if let Some(limit) = &source.rate_limit {
                if limit.window_secs == 0 {
                    return Err(format!("sources.{id}.rate_limit.window_secs must be > 0"));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,

    #[serde(default = "default_stake")]
    pub stake: f64,

    #[serde(default = "default_match_limit")]
    pub match_limit: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            starting_balance: default_starting_balance(),
            stake: default_stake(),
            match_limit: default_match_limit(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_millis() as u64
}

fn default_starting_balance() -> f64 {
    DEFAULT_STARTING_BALANCE
}

fn default_stake() -> f64 {
    DEFAULT_STAKE
}

fn default_match_limit() -> usize {
    DEFAULT_MATCH_LIMIT
}

/// Priority lists per entity plus the bundled data override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_schedule_priority")]
    pub teams: Vec<String>,

    #[serde(default = "default_schedule_priority")]
    pub games: Vec<String>,

    #[serde(default = "default_odds_priority")]
    pub odds: Vec<String>,

    #[serde(default = "default_roster_priority")]
    pub rosters: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            teams: default_schedule_priority(),
            games: default_schedule_priority(),
            odds: default_odds_priority(),
            rosters: default_roster_priority(),
            seed_path: None,
        }
    }
}

impl FallbackConfig {
    pub fn priorities(&self) -> Vec<(Capability, Vec<String>)> {
        vec![
            (Capability::Teams, self.teams.clone()),
            (Capability::Games, self.games.clone()),
            (Capability::Odds, self.odds.clone()),
            (Capability::Rosters, self.rosters.clone()),
        ]
    }
}

fn default_schedule_priority() -> Vec<String> {
    ["espn", "nba", "static-seed"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_odds_priority() -> Vec<String> {
    vec!["odds-api".to_string()]
}

fn default_roster_priority() -> Vec<String> {
    vec!["espn".to_string()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_window_secs() -> u64 {
    60
}

impl From<RateLimitConfig> for RateLimit {
    fn from(config: RateLimitConfig) -> Self {
        RateLimit {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFileConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitConfig>,

    /// Binding-specific string options, e.g. `sport` for the odds feed
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl Default for SourceFileConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: None,
            api_key: None,
            timeout_ms: None,
            rate_limit: None,
            options: HashMap::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl SourceFileConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Flat string map handed to `SourceClient::initialize`
    pub fn to_source_config(&self) -> HashMap<String, String> {
        let mut config = self.options.clone();
        if let Some(base_url) = &self.base_url {
            config.insert("base_url".to_string(), base_url.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.insert("api_key".to_string(), api_key.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.insert("timeout_ms".to_string(), timeout_ms.to_string());
        }
        config
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_cors_allow_all")]
    pub cors_allow_all: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_allow_all: default_cors_allow_all(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_cors_allow_all() -> bool {
    DEFAULT_CORS_ALLOW_ALL
}
