use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use courtside_source_api::ErrorKind;
use dashmap::DashMap;

use crate::domain::{
    AttemptState,
    FetchResult,
    HealthRecord,
    SourceAttempt,
};

#[derive(Debug, Clone, PartialEq)]
pub enum HealthOutcome {
    Success,
    Failure { kind: ErrorKind, message: String },
    Skipped,
}

impl<T> From<&SourceAttempt<T>> for HealthOutcome {
    fn from(attempt: &SourceAttempt<T>) -> Self {
        match &attempt.state {
            AttemptState::Dispatched(FetchResult::Ok { .. }) => HealthOutcome::Success,
            AttemptState::Dispatched(FetchResult::Failed { reason, message }) => {
                HealthOutcome::Failure {
                    kind: *reason,
                    message: message.clone(),
                }
            }
            AttemptState::Skipped { .. } => HealthOutcome::Skipped,
        }
    }
}

/// Per-source health counters. Updates to one source are serialized by its
/// map shard; distinct sources never contend.
#[derive(Default)]
pub struct HealthTracker {
    records: DashMap<String, HealthRecord>,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_configured(&self, source: &str, configured: bool) {
        self.records
            .entry(source.to_string())
            .and_modify(|record| {
                record.configured = configured;
                record.refresh_status();
            })
            .or_insert_with(|| HealthRecord::new(source, configured));
    }

    pub fn record(&self, source: &str, outcome: HealthOutcome, latency: Option<Duration>) {
        let mut record = self
            .records
            .entry(source.to_string())
            .or_insert_with(|| HealthRecord::new(source, true));

        if let Some(latency) = latency {
            record.last_latency_ms = Some(latency.as_millis() as u64);
        }

        match outcome {
            HealthOutcome::Success => {
                record.success_count += 1;
                record.consecutive_failures = 0;
                record.last_success_at = Some(Utc::now());
            }
            HealthOutcome::Failure { kind, message } => {
                record.failure_count += 1;
                record.consecutive_failures = record.consecutive_failures.saturating_add(1);
                record.last_error_kind = Some(kind);
                record.last_error = Some(message);
                record.last_failure_at = Some(Utc::now());
            }
            HealthOutcome::Skipped => {
                record.skipped_count += 1;
            }
        }

        record.refresh_status();
    }

    pub fn record_attempt<T>(&self, attempt: &SourceAttempt<T>) {
        self.record(&attempt.source, attempt.into(), attempt.latency);
    }

    pub fn get(&self, source: &str) -> Option<HealthRecord> {
        self.records.get(source).map(|r| r.clone())
    }

    pub fn snapshot(&self) -> BTreeMap<String, HealthRecord> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
