use std::sync::Arc;

use courtside_source_api::{
    SourceClient,
    SourceMetadata,
    SourceRegistry,
};

use crate::application::{
    RateLimit,
    RateLimiter,
};
use crate::domain::{
    CoreError,
    CoreResult,
};
use crate::infrastructure::config::CourtsideConfig;
use crate::infrastructure::seed::{
    self,
    StaticSeedSource,
};
use crate::infrastructure::HttpClientManager;

/// Built-in bindings in registration order
pub const BUILTIN_SOURCES: [&str; 4] = [
    courtside_source_espn::SOURCE_ID,
    courtside_source_nba::SOURCE_ID,
    courtside_source_odds::SOURCE_ID,
    seed::SOURCE_ID,
];

/// Request budgets the providers publish or tolerate
pub const DEFAULT_RATE_LIMITS: [(&str, u32); 3] = [
    (courtside_source_espn::SOURCE_ID, 100),
    (courtside_source_nba::SOURCE_ID, 30),
    (courtside_source_odds::SOURCE_ID, 20),
];

pub fn create_source(id: &str) -> Option<Box<dyn SourceClient>> {
    match id {
        courtside_source_espn::SOURCE_ID => {
            Some(Box::new(courtside_source_espn::EspnSource::new()))
        }
        courtside_source_nba::SOURCE_ID => {
            Some(Box::new(courtside_source_nba::NbaStatsSource::new()))
        }
        courtside_source_odds::SOURCE_ID => {
            Some(Box::new(courtside_source_odds::OddsApiSource::new()))
        }
        seed::SOURCE_ID => Some(Box::new(StaticSeedSource::new())),
        _ => None,
    }
}

pub fn get_all_source_metadata() -> Vec<SourceMetadata> {
    BUILTIN_SOURCES
        .iter()
        .filter_map(|id| create_source(id))
        .map(|source| source.metadata().clone())
        .collect()
}

/// Initializes every enabled built-in source from its config section
pub fn create_source_registry(
    config: &CourtsideConfig, http: &HttpClientManager,
) -> CoreResult<SourceRegistry> {
    for id in config.sources.keys() {
        if !BUILTIN_SOURCES.contains(&id.as_str()) {
            tracing::warn!(source = %id, "Config section for unknown source ignored");
        }
    }

    let mut registry = SourceRegistry::new();

    for id in BUILTIN_SOURCES {
        if !config.is_enabled(id) {
            tracing::info!(source = %id, "Source disabled in config");
            continue;
        }
        let Some(mut source) = create_source(id) else {
            continue;
        };

        let file_config = config.source(id).cloned().unwrap_or_default();
        let mut source_config = file_config.to_source_config();
        if id == seed::SOURCE_ID {
            if let Some(path) = &config.fallback.seed_path {
                source_config
                    .entry(seed::SEED_PATH_KEY.to_string())
                    .or_insert_with(|| path.display().to_string());
            }
        }

        // Bundled sources have no base URL and never touch the network
        let base_url = file_config
            .base_url
            .clone()
            .unwrap_or_else(|| source.metadata().base_url.clone());
        let http_client = if base_url.is_empty() {
            None
        } else {
            Some(http.client_for_url(&base_url)?)
        };

        source
            .initialize(source_config, http_client)
            .map_err(|error| CoreError::SourceInit {
                source_id: id.to_string(),
                error,
            })?;

        tracing::info!(
            source = %id,
            tier = ?source.tier(),
            configured = source.is_configured(),
            base_url = %source.metadata().base_url,
            "Registered source"
        );
        registry.register(Arc::from(source))?;
    }

    Ok(registry)
}

/// Defaults per provider, overridden by `[sources.<id>.rate_limit]`
pub fn create_rate_limiter(config: &CourtsideConfig) -> RateLimiter {
    let mut limiter = RateLimiter::new();

    for (id, max_requests) in DEFAULT_RATE_LIMITS {
        limiter.set_limit(id, RateLimit::per_minute(max_requests));
    }
    for (id, source) in &config.sources {
        if let Some(limit) = source.rate_limit {
            limiter.set_limit(id, limit.into());
        }
    }

    limiter
}
