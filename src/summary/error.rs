//! Summary fetch error types
//!
//! Every failure of a stats cycle ends up as one of these. Both variants are
//! handled the same way by the poller: logged, surfaced as a transient
//! notice, and retried by the next scheduled cycle.

use thiserror::Error;

/// Errors that can occur while fetching the stats summary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a successful response
    #[error("Network error: {0}")]
    Network(#[from] NetworkFailure),

    /// The response body is not a valid summary document
    #[error("Malformed summary: {0}")]
    Decode(String),
}

/// Why a request failed before a usable body arrived
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkFailure {
    #[error("request timed out")]
    Timeout,

    #[error("endpoint unavailable")]
    Unavailable,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Decode(_) => "decode",
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
