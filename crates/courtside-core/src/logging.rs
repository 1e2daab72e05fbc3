//! Subscriber setup for the Courtside binaries.
//!
//! `RUST_LOG` picks the filter and `COURTSIDE_LOG_FORMAT` picks the output
//! shape (`full`, `compact` or `json`).

use std::str::FromStr;

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

pub const DEFAULT_LOG_FILTER: &str = "courtside_core=info,courtside_web=info,\
     courtside_source_espn=info,courtside_source_nba=info,courtside_source_odds=info,\
     tower_http=info";

pub const LOG_FORMAT_ENV: &str = "COURTSIDE_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "text" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// `RUST_LOG` directives when present and valid, else [`DEFAULT_LOG_FILTER`]
fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Unknown format names fall back to the default and are returned so the
/// caller can warn once a subscriber exists
fn resolve_format(raw: Option<&str>) -> (LogFormat, Option<String>) {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => (LogFormat::default(), None),
        Some(raw) => match raw.parse() {
            Ok(format) => (format, None),
            Err(e) => (LogFormat::default(), Some(e)),
        },
    }
}

pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let raw_format = std::env::var(LOG_FORMAT_ENV).ok();
    let (format, rejected) = resolve_format(raw_format.as_deref());

    init_with(build_filter(directives.as_deref()), format);

    if let Some(reason) = rejected {
        tracing::warn!(env = LOG_FORMAT_ENV, reason = %reason, "Using full log format");
    }
}

pub fn init_with(filter: EnvFilter, format: LogFormat) {
    let layer = match format {
        LogFormat::Full => fmt::layer().with_target(true).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    };

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
