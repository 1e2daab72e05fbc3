use chrono::{
    DateTime,
    Utc,
};
use courtside_source_api::ErrorKind;
use serde::{
    Deserialize,
    Serialize,
};

/// Consecutive failures after which a source reports `down`
pub const DOWN_AFTER_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
    NotConfigured,
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Down => "down",
            HealthStatus::NotConfigured => "not_configured",
            HealthStatus::Unknown => "unknown",
        }
    }
}

/// Rolling per-source counters. Monotonic for the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub source: String,
    pub configured: bool,
    pub status: HealthStatus,
    pub success_count: u64,
    pub failure_count: u64,
    pub skipped_count: u64,
    pub consecutive_failures: u32,
    pub last_latency_ms: Option<u64>,
    pub last_error_kind: Option<ErrorKind>,
    pub last_error: Option<String>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
}

impl HealthRecord {
    pub fn new(source: &str, configured: bool) -> Self {
        let mut record = Self {
            source: source.to_string(),
            configured,
            status: HealthStatus::Unknown,
            success_count: 0,
            failure_count: 0,
            skipped_count: 0,
            consecutive_failures: 0,
            last_latency_ms: None,
            last_error_kind: None,
            last_error: None,
            last_success_at: None,
            last_failure_at: None,
        };
        record.refresh_status();
        record
    }

    pub fn refresh_status(&mut self) {
        self.status = if !self.configured {
            HealthStatus::NotConfigured
        } else if self.consecutive_failures >= DOWN_AFTER_FAILURES {
            HealthStatus::Down
        } else if self.consecutive_failures > 0 {
            HealthStatus::Degraded
        } else if self.success_count > 0 {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unknown
        };
    }
}
