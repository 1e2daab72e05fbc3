pub mod error;
pub mod registry;
pub mod source;
pub mod types;

pub use error::{
    ErrorKind,
    SourceError,
    SourceResult,
};
pub use registry::{
    RegistryError,
    SourceRegistry,
};
pub use source::{
    Capability,
    SourceCapabilities,
    SourceClient,
    SourceMetadata,
    SourceTier,
};
pub use types::{
    BookmakerLine,
    Game,
    GameQuery,
    GameStatus,
    OddsQuery,
    OddsQuote,
    Player,
    RosterQuery,
    Team,
    TeamQuery,
    TeamRef,
    TeamStat,
};

