use std::collections::{
    HashMap,
    VecDeque,
};
use std::time::Duration;

use dashmap::DashMap;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimit {
    pub fn per_minute(max_requests: u32) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Rate limit reached for {source_id}, retry in {retry_after:?}")]
pub struct RateLimited {
    pub source_id: String,
    pub retry_after: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permit {
    pub source_id: String,
    /// Grants left in the current window; `None` when the source is unlimited
    pub remaining: Option<u32>,
}

/// Per-source sliding-window log. Never waits: an exhausted window is
/// reported immediately and leaves the log untouched.
pub struct RateLimiter {
    limits: HashMap<String, RateLimit>,
    windows: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            limits: HashMap::new(),
            windows: DashMap::new(),
        }
    }

    pub fn with_limit(mut self, source_id: &str, limit: RateLimit) -> Self {
        self.set_limit(source_id, limit);
        self
    }

    pub fn set_limit(&mut self, source_id: &str, limit: RateLimit) {
        self.limits.insert(source_id.to_string(), limit);
    }

    pub fn limit_for(&self, source_id: &str) -> Option<RateLimit> {
        self.limits.get(source_id).copied()
    }

    pub fn acquire(&self, source_id: &str) -> Result<Permit, RateLimited> {
        self.acquire_at(source_id, Instant::now())
    }

    pub(crate) fn acquire_at(&self, source_id: &str, now: Instant) -> Result<Permit, RateLimited> {
        let Some(limit) = self.limits.get(source_id) else {
            return Ok(Permit {
                source_id: source_id.to_string(),
                remaining: None,
            });
        };

        let mut log = self.windows.entry(source_id.to_string()).or_default();

        let in_window = |t: &Instant| now.saturating_duration_since(*t) < limit.window;
        let live = log.iter().filter(|t| in_window(t)).count() as u32;

        if live >= limit.max_requests {
            let retry_after = log
                .iter()
                .find(|t| in_window(t))
                .map(|oldest| limit.window.saturating_sub(now.saturating_duration_since(*oldest)))
                .unwrap_or(limit.window);

            tracing::debug!(
                source = %source_id,
                retry_after_ms = retry_after.as_millis() as u64,
                "Rate limit reached"
            );
            return Err(RateLimited {
                source_id: source_id.to_string(),
                retry_after,
            });
        }

        log.retain(in_window);
        log.push_back(now);

        Ok(Permit {
            source_id: source_id.to_string(),
            remaining: Some(limit.max_requests - live - 1),
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
