pub mod config;
pub mod http_client;
pub mod seed;

pub use config::{
    ConfigLoadError,
    ConfigLoader,
    CourtsideConfig,
};
pub use http_client::HttpClientManager;
pub use seed::StaticSeedSource;
