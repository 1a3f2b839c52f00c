//! Summary fetcher
//!
//! One request per call, no retries: the next scheduled cycle is the retry.

#[cfg(feature = "native")]
mod http;

#[cfg(feature = "native")]
pub use http::HttpSummaryFetcher;

use async_trait::async_trait;

use crate::summary::{FetchResult, SummaryRecord};

/// Default stats endpoint of the admin web server
pub const DEFAULT_STATS_URL: &str = "http://localhost:5000/api/stats";

/// Source of stats summaries
#[async_trait]
pub trait SummaryFetcher: Send + Sync {
    /// Fetch and decode the current summary
    async fn fetch_summary(&self) -> FetchResult<SummaryRecord>;
}
