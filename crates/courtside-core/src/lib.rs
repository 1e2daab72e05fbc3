pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod sources;

use std::sync::Arc;

pub use application::{
    DataService,
    FallbackPolicy,
    HealthTracker,
    RateLimiter,
    ServiceSettings,
};
use courtside_source_api::SourceRegistry;
pub use domain::{
    Aggregated,
    AggregatedMetrics,
    CoreError,
    CoreResult,
    HealthRecord,
    HealthStatus,
    Match,
    MatchDetail,
    MatchFilter,
    Record,
    Selected,
    TeamSummary,
};
use infrastructure::config::{
    ConfigLoader,
    CourtsideConfig,
};
use infrastructure::HttpClientManager;

/// Process-wide wiring: one instance owns every source and the shared state
/// that outlives individual requests.
pub struct CoreContext {
    pub config: CourtsideConfig,

    pub http_client_manager: Arc<HttpClientManager>,

    pub rate_limiter: Arc<RateLimiter>,

    pub health_tracker: Arc<HealthTracker>,

    pub data_service: Arc<DataService>,
}

impl CoreContext {
    /// Loads config from `COURTSIDE_CONFIG_PATH` or `./courtside.toml`
    pub fn from_default_config() -> CoreResult<Self> {
        let config = ConfigLoader::load_default()?;
        Self::new(config)
    }

    pub fn new(config: CourtsideConfig) -> CoreResult<Self> {
        let http_client_manager = Arc::new(HttpClientManager::new());
        let registry = sources::create_source_registry(&config, &http_client_manager)?;
        Self::assemble(config, registry, http_client_manager)
    }

    /// Uses an already populated registry instead of the built-in bindings
    pub fn with_registry(config: CourtsideConfig, registry: SourceRegistry) -> CoreResult<Self> {
        Self::assemble(config, registry, Arc::new(HttpClientManager::new()))
    }

    fn assemble(
        config: CourtsideConfig, registry: SourceRegistry,
        http_client_manager: Arc<HttpClientManager>,
    ) -> CoreResult<Self> {
        config.validate().map_err(CoreError::InvalidConfig)?;

        // Disabled built-ins drop out of the lists; anything else unknown is an error
        let priorities: Vec<_> = config
            .fallback
            .priorities()
            .into_iter()
            .map(|(capability, ids)| {
                let ids = ids
                    .into_iter()
                    .filter(|id| {
                        registry.is_registered(id)
                            || !sources::BUILTIN_SOURCES.contains(&id.as_str())
                    })
                    .collect();
                (capability, ids)
            })
            .collect();
        let policy = FallbackPolicy::from_priorities(&registry, &priorities)?;
        let rate_limiter = Arc::new(sources::create_rate_limiter(&config));
        let health_tracker = Arc::new(HealthTracker::new());

        let data_service = Arc::new(DataService::new(
            Arc::new(registry),
            policy,
            Arc::clone(&rate_limiter),
            Arc::clone(&health_tracker),
            config.service_settings(),
        ));

        tracing::info!(
            sources = data_service.registry().count(),
            request_timeout_ms = config.aggregator.request_timeout_ms,
            "Core context ready"
        );

        Ok(Self {
            config,
            http_client_manager,
            rate_limiter,
            health_tracker,
            data_service,
        })
    }
}
