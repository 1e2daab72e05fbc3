pub mod detail;
pub mod error;
pub mod health;
pub mod matches;
pub mod metrics;
pub mod record;
pub mod summary;
pub mod team_keys;

pub use detail::{
    MatchDetail,
    TeamDetail,
    ROSTER_LIMIT,
};
pub use error::{
    CoreError,
    CoreResult,
};
pub use health::{
    HealthRecord,
    HealthStatus,
};
pub use matches::{
    BettingOdds,
    Match,
    MatchFilter,
};
pub use metrics::{
    AggregatedMetrics,
    LedgerSettings,
};
pub use record::{
    Aggregated,
    AttemptState,
    FetchResult,
    Provenance,
    Record,
    ReportOutcome,
    Selected,
    SkipReason,
    SourceAttempt,
    SourceReport,
    FALLBACK_PROVENANCE,
};
pub use summary::{
    SourceSummary,
    TeamSummary,
};
