use std::time::Duration;

use chrono::{
    DateTime,
    Utc,
};
use courtside_source_api::{
    ErrorKind,
    SourceTier,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Provenance tag for records served from bundled fallback data
pub const FALLBACK_PROVENANCE: &str = "fallback-static";

/// Names where a record came from: a live source id or `fallback-static`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Provenance(String);

impl Provenance {
    pub fn for_attempt(source_id: &str, tier: SourceTier) -> Self {
        match tier {
            SourceTier::Live => Self(source_id.to_string()),
            SourceTier::Fallback => Self::fallback(),
        }
    }

    pub fn fallback() -> Self {
        Self(FALLBACK_PROVENANCE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_fallback(&self) -> bool {
        self.0 == FALLBACK_PROVENANCE
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized payload annotated with where and when it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub data: T,
    pub provenance: Provenance,
    pub freshness: DateTime<Utc>,
}

impl<T> Record<T> {
    pub fn new(data: T, provenance: Provenance, freshness: DateTime<Utc>) -> Self {
        Self {
            data,
            provenance,
            freshness,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.provenance.is_fallback()
    }

    pub fn map<U, F>(self, f: F) -> Record<U>
    where
        F: FnOnce(T) -> U,
    {
        Record {
            data: f(self.data),
            provenance: self.provenance,
            freshness: self.freshness,
        }
    }
}

/// Outcome of a dispatched fetch. Exactly one of value or failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult<T> {
    Ok {
        value: T,
        fetched_at: DateTime<Utc>,
        origin: String,
    },
    Failed {
        reason: ErrorKind,
        message: String,
    },
}

impl<T> FetchResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchResult::Ok { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    RateLimited,
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState<T> {
    Dispatched(FetchResult<T>),
    Skipped {
        reason: SkipReason,
        retry_after: Option<Duration>,
    },
}

/// What happened when one source was consulted for one request
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAttempt<T> {
    pub source: String,
    pub tier: SourceTier,
    pub latency: Option<Duration>,
    pub state: AttemptState<T>,
}

impl<T> SourceAttempt<T> {
    pub fn skipped(
        source: &str, tier: SourceTier, reason: SkipReason, retry_after: Option<Duration>,
    ) -> Self {
        Self {
            source: source.to_string(),
            tier,
            latency: None,
            state: AttemptState::Skipped {
                reason,
                retry_after,
            },
        }
    }

    /// Converts the fetched value, keeping failures and skips as they are
    pub fn map<U, F>(self, f: F) -> SourceAttempt<U>
    where
        F: FnOnce(T) -> U,
    {
        let state = match self.state {
            AttemptState::Dispatched(FetchResult::Ok {
                value,
                fetched_at,
                origin,
            }) => AttemptState::Dispatched(FetchResult::Ok {
                value: f(value),
                fetched_at,
                origin,
            }),
            AttemptState::Dispatched(FetchResult::Failed { reason, message }) => {
                AttemptState::Dispatched(FetchResult::Failed { reason, message })
            }
            AttemptState::Skipped {
                reason,
                retry_after,
            } => AttemptState::Skipped {
                reason,
                retry_after,
            },
        };

        SourceAttempt {
            source: self.source,
            tier: self.tier,
            latency: self.latency,
            state,
        }
    }

    pub fn ok(&self) -> Option<(&T, DateTime<Utc>)> {
        match &self.state {
            AttemptState::Dispatched(FetchResult::Ok {
                value, fetched_at, ..
            }) => Some((value, *fetched_at)),
            _ => None,
        }
    }

    /// Failed, or skipped for a reason other than missing configuration
    pub fn did_not_contribute(&self) -> bool {
        match &self.state {
            AttemptState::Dispatched(result) => !result.is_ok(),
            AttemptState::Skipped { reason, .. } => *reason == SkipReason::RateLimited,
        }
    }

    pub fn report(&self, record_count: usize) -> SourceReport {
        let outcome = match &self.state {
            AttemptState::Dispatched(FetchResult::Ok { .. }) => ReportOutcome::Ok {
                records: record_count,
            },
            AttemptState::Dispatched(FetchResult::Failed { reason, message }) => {
                ReportOutcome::Failed {
                    kind: *reason,
                    message: message.clone(),
                }
            }
            AttemptState::Skipped {
                reason,
                retry_after,
            } => ReportOutcome::Skipped {
                reason: *reason,
                retry_after_ms: retry_after.map(|d| d.as_millis() as u64),
            },
        };

        SourceReport {
            source: self.source.clone(),
            tier: self.tier,
            latency_ms: self.latency.map(|d| d.as_millis() as u64),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Ok {
        records: usize,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
    Skipped {
        reason: SkipReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_after_ms: Option<u64>,
    },
}

/// Per-source line of the response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    pub tier: SourceTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(flatten)]
    pub outcome: ReportOutcome,
}

/// Response envelope for list operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregated<T> {
    pub records: Vec<Record<T>>,
    /// A configured live source did not contribute
    pub partial: bool,
    /// At least one record came from fallback data
    pub stale: bool,
    pub sources: Vec<SourceReport>,
}

impl<T> Aggregated<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Response envelope for single-entity lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selected<T> {
    pub record: Option<Record<T>>,
    pub partial: bool,
    pub stale: bool,
    pub sources: Vec<SourceReport>,
}
