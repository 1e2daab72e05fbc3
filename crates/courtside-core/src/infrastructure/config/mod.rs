pub mod interpolation;
pub mod loader;
pub mod schema;

pub use interpolation::{
    interpolate,
    InterpolationError,
};
pub use loader::{
    ConfigLoadError,
    ConfigLoader,
};
pub use schema::{
    AggregatorConfig,
    CourtsideConfig,
    FallbackConfig,
    RateLimitConfig,
    ServerConfig,
    SourceFileConfig,
};
