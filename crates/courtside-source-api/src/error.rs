use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Shared failure taxonomy every binding translates its provider errors into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    ParseError,
    RateLimited,
    Unauthorized,
    Unreachable,
    NotConfigured,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Unreachable => "unreachable",
            ErrorKind::NotConfigured => "not_configured",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Malformed payload: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Source unreachable: {0}")]
    Unreachable(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::Timeout(_) => ErrorKind::Timeout,
            SourceError::ParseError(_) => ErrorKind::ParseError,
            SourceError::RateLimited(_) => ErrorKind::RateLimited,
            SourceError::Unauthorized(_) => ErrorKind::Unauthorized,
            SourceError::Unreachable(_) => ErrorKind::Unreachable,
            SourceError::NotConfigured(_) => ErrorKind::NotConfigured,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SourceError::Timeout(msg)
            | SourceError::ParseError(msg)
            | SourceError::RateLimited(msg)
            | SourceError::Unauthorized(msg)
            | SourceError::Unreachable(msg)
            | SourceError::NotConfigured(msg) => msg,
        }
    }

    /// Translates a transport-level reqwest failure. The request URL is dropped
    /// from the message since query strings can carry credentials.
    pub fn from_transport(context: &str, err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            SourceError::Timeout(format!("{context}: {err}"))
        } else if err.is_decode() {
            SourceError::ParseError(format!("{context}: {err}"))
        } else {
            SourceError::Unreachable(format!("{context}: {err}"))
        }
    }

    /// Translates a non-success HTTP status
    pub fn from_status(context: &str, status: reqwest::StatusCode, body: &str) -> Self {
        let detail = if body.is_empty() {
            format!("{context}: HTTP {status}")
        } else {
            format!("{context}: HTTP {status}: {}", truncate(body, 200))
        };

        match status.as_u16() {
            401 | 403 => SourceError::Unauthorized(detail),
            429 => SourceError::RateLimited(detail),
            _ => SourceError::Unreachable(detail),
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SourceError::from_status("teams", StatusCode::UNAUTHORIZED, "").kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            SourceError::from_status("teams", StatusCode::FORBIDDEN, "nope").kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            SourceError::from_status("teams", StatusCode::TOO_MANY_REQUESTS, "").kind(),
            ErrorKind::RateLimited
        );
        assert_eq!(
            SourceError::from_status("teams", StatusCode::BAD_GATEWAY, "").kind(),
            ErrorKind::Unreachable
        );
        assert_eq!(
            SourceError::from_status("teams", StatusCode::NOT_FOUND, "").kind(),
            ErrorKind::Unreachable
        );
    }

    #[test]
    fn test_serde_json_error_is_parse_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert_eq!(SourceError::from(err).kind(), ErrorKind::ParseError);
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(1000);
        let err = SourceError::from_status("odds", StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert!(err.message().len() < 300);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotConfigured).unwrap();
        assert_eq!(json, "\"not_configured\"");
        assert_eq!(ErrorKind::ParseError.to_string(), "parse_error");
    }

    #[tokio::test]
    async fn test_transport_error_omits_query_string() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/v4/odds?apiKey=s3cret-key")
            .send()
            .await
            .unwrap_err();

        let source_err = SourceError::from_transport("Odds API odds", err);
        assert_eq!(source_err.kind(), ErrorKind::Unreachable);
        assert!(!source_err.message().contains("s3cret-key"));
        assert!(!source_err.to_string().contains("apiKey"));
    }
}
