//! Typed errors surfaced by the forecast pipeline and the scorers.

use serde::Serialize;
use thiserror::Error;

/// Why a forecast could not be produced for a spot.
///
/// The aggregator never propagates these past its boundary; they travel
/// alongside an empty series so the caller can tell "server down" apart from
/// "nothing to show".
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// Network failure or non-2xx status from an upstream endpoint.
    #[error("{endpoint} unavailable: {reason}")]
    UpstreamUnavailable { endpoint: String, reason: String },

    /// The upstream answered, but the payload is not what we expect.
    #[error("{endpoint} returned a malformed response: {reason}")]
    MalformedResponse { endpoint: String, reason: String },
}

impl FetchError {
    pub fn unavailable(endpoint: &str, reason: impl ToString) -> Self {
        Self::UpstreamUnavailable {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(endpoint: &str, reason: impl ToString) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-friendly tag, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::UpstreamUnavailable { .. } => "upstream_unavailable",
            FetchError::MalformedResponse { .. } => "malformed_response",
        }
    }
}

/// A physical reading that cannot be scored (negative or not a number).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {value} (must be a finite, non-negative number)")]
pub struct InvalidInput {
    pub field: &'static str,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_names_endpoint() {
        let err = FetchError::unavailable("marine", "connection refused");
        assert_eq!(err.to_string(), "marine unavailable: connection refused");
        assert_eq!(err.kind(), "upstream_unavailable");
    }

    #[test]
    fn test_malformed_kind() {
        let err = FetchError::malformed("wind", "missing field `hourly`");
        assert_eq!(err.kind(), "malformed_response");
        assert!(err.to_string().contains("missing field `hourly`"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let err = FetchError::unavailable("wind", "timeout");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "upstream_unavailable");
        assert_eq!(json["endpoint"], "wind");
    }
}
