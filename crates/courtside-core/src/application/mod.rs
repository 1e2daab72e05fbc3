pub mod data_service;
pub mod fallback;
pub mod health_tracker;
pub mod rate_limiter;

pub use data_service::{
    DataService,
    ServiceSettings,
};
pub use fallback::FallbackPolicy;
pub use health_tracker::{
    HealthOutcome,
    HealthTracker,
};
pub use rate_limiter::{
    Permit,
    RateLimit,
    RateLimited,
    RateLimiter,
};
