//! ESPN source for Courtside
//!
//! Reads NBA teams and the scoreboard from the public ESPN site API. No
//! credential is required; an `api_key` is forwarded as `X-API-Key` when set.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use courtside_source_api::{SourceClient, SourceRegistry};
//! use courtside_source_espn::EspnSource;
//!
//! let mut source = EspnSource::new();
//! source.initialize(HashMap::new(), None).unwrap();
//!
//! let mut registry = SourceRegistry::new();
//! registry.register(Arc::new(source)).unwrap();
//! ```

mod client;
mod config;
mod mapper;
mod metadata;
mod source;
mod types;

pub use metadata::SOURCE_ID;
pub use source::EspnSource;
