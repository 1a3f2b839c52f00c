//! Summary document types
//!
//! - `SummaryRecord`: the aggregate counts returned by the stats endpoint
//! - `Scope`: whether those counts cover the operator's own channels or the
//!   whole network
//!
//! Decoding is strict on the five counters and lenient on everything else:
//! unknown fields are ignored and a malformed `scope` or `timestamp` is
//! treated as absent.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{FetchError, FetchResult};

/// Which channels the counters describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Only channels owned by the current operator
    #[serde(rename = "self")]
    Own,
    /// Every channel in the network
    #[serde(rename = "network")]
    Network,
}

impl Scope {
    /// Map a wire label to a scope. Only `"network"` selects the network
    /// scope; any other label means the operator's own channels.
    pub fn from_label(label: &str) -> Self {
        if label == "network" {
            Scope::Network
        } else {
            Scope::Own
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Scope::Own => "self",
            Scope::Network => "network",
        }
    }
}

/// One parsed stats summary
///
/// Immutable once decoded. No invariant ties `sfw_channels + nsfw_channels`
/// to `total_channels`; the remote service is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub total_channels: u64,
    pub pending_applications: u64,
    pub sfw_channels: u64,
    pub nsfw_channels: u64,
    pub total_subscribers: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}

/// Wire shape; optional fields are taken raw so a bad value degrades to `None`
#[derive(Debug, Deserialize)]
struct RawSummary {
    total_channels: u64,
    pending_applications: u64,
    sfw_channels: u64,
    nsfw_channels: u64,
    total_subscribers: u64,
    #[serde(default)]
    scope: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
}

impl SummaryRecord {
    /// Create a record with the given counters and no scope or timestamp
    pub fn new(
        total_channels: u64,
        pending_applications: u64,
        sfw_channels: u64,
        nsfw_channels: u64,
        total_subscribers: u64,
    ) -> Self {
        Self {
            total_channels,
            pending_applications,
            sfw_channels,
            nsfw_channels,
            total_subscribers,
            scope: None,
            timestamp: None,
        }
    }

    /// Builder method: set scope
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Builder method: set timestamp
    pub fn timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Decode a summary from a JSON response body
    pub fn from_slice(body: &[u8]) -> FetchResult<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Decode a summary from an already-parsed JSON value
    pub fn from_value(value: Value) -> FetchResult<Self> {
        if !value.is_object() {
            return Err(FetchError::Decode(
                "expected a JSON object at the top level".to_string(),
            ));
        }

        let raw: RawSummary = serde_json::from_value(value)?;

        let scope = match raw.scope.filter(is_present) {
            Some(Value::String(label)) => Some(Scope::from_label(&label)),
            None => None,
            Some(other) => {
                tracing::debug!(scope = %other, "Ignoring non-string scope");
                None
            }
        };

        let timestamp = raw.timestamp.filter(is_present).and_then(|v| {
            let parsed = parse_timestamp(&v);
            if parsed.is_none() {
                tracing::debug!(timestamp = %v, "Ignoring unparseable timestamp");
            }
            parsed
        });

        Ok(Self {
            total_channels: raw.total_channels,
            pending_applications: raw.pending_applications,
            sfw_channels: raw.sfw_channels,
            nsfw_channels: raw.nsfw_channels,
            total_subscribers: raw.total_subscribers,
            scope,
            timestamp,
        })
    }
}

/// Whether an optional field carries a value. `null`, `false`, `0` and the
/// empty string count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse the optional `timestamp` field
///
/// Accepts RFC 3339, a naive ISO datetime (read as UTC), a bare date, or a
/// number of milliseconds since the Unix epoch.
fn parse_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt);
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc().fixed_offset());
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(naive.and_utc().fixed_offset());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.fixed_offset()),
        _ => None,
    }
}
