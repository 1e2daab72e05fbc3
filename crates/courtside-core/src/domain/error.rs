use courtside_source_api::{
    RegistryError,
    SourceError,
};
use thiserror::Error;

/// Startup failures. Request paths never return these.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Source id must not be empty")]
    EmptySourceId,

    #[error("Duplicate source id: {0}")]
    DuplicateSource(String),

    #[error("Unknown source '{source_id}' in {entity} priority list")]
    UnknownSourceInPriority { entity: String, source_id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Source initialization failed for {source_id}: {error}")]
    SourceInit {
        source_id: String,
        error: SourceError,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<RegistryError> for CoreError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::EmptyId => CoreError::EmptySourceId,
            RegistryError::DuplicateId(id) => CoreError::DuplicateSource(id),
        }
    }
}
