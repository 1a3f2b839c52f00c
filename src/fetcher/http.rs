//! HTTP summary fetcher
//!
//! GETs the stats endpoint with reqwest and classifies failures the same way
//! the rest of the crate reports them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use super::SummaryFetcher;
use crate::summary::{FetchError, FetchResult, NetworkFailure, SummaryRecord};

/// Fetches summaries from a fixed HTTP endpoint
pub struct HttpSummaryFetcher {
    client: Client,
    endpoint: String,
}

impl HttpSummaryFetcher {
    /// Create a fetcher for `endpoint` with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkFailure::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SummaryFetcher for HttpSummaryFetcher {
    async fn fetch_summary(&self) -> FetchResult<SummaryRecord> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkFailure::Status(status.as_u16()).into());
        }

        let body = response.bytes().await.map_err(classify)?;
        SummaryRecord::from_slice(&body)
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    let failure = if e.is_timeout() {
        NetworkFailure::Timeout
    } else if e.is_connect() {
        NetworkFailure::Unavailable
    } else {
        NetworkFailure::Transport(e.to_string())
    };
    failure.into()
}
