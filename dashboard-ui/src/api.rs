//! Stats API Client
//!
//! Fetches the stats summary with the browser's fetch.

use dashboard_sync::{FetchResult, NetworkFailure, SummaryRecord};
use gloo_net::http::Request;

/// Same-origin stats endpoint
pub const DEFAULT_STATS_PATH: &str = "/api/stats";

/// Local storage key that overrides the endpoint
const STATS_URL_KEY: &str = "dashboard_stats_url";

/// Get the stats URL from local storage or use the default
pub fn get_stats_url() -> String {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(STATS_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_STATS_PATH.to_string())
}

/// Fetch the current summary
pub async fn fetch_summary(url: &str) -> FetchResult<SummaryRecord> {
    let response = Request::get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| NetworkFailure::Transport(e.to_string()))?;

    if !response.ok() {
        return Err(NetworkFailure::Status(response.status()).into());
    }

    let body = response
        .binary()
        .await
        .map_err(|e| NetworkFailure::Transport(e.to_string()))?;

    SummaryRecord::from_slice(&body)
}
