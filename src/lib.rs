//! # Dashboard Sync
//!
//! Live statistics synchronization for the channel network admin dashboard.
//! Polls the stats endpoint, merges the summary into the already-rendered
//! page without a reload, keeps the channel ratio chart in step, and shows a
//! short-lived notice when a poll fails.
//!
//! ## Modules
//!
//! - [`summary`]: Summary record and fetch errors
//! - [`fetcher`]: Fetcher trait and the reqwest implementation
//! - [`view`]: Display slot, chart and notice abstractions; in-memory view
//! - [`reconciler`]: Writes summaries into display slots
//! - [`chart`]: Pushes counts into the chart widget
//! - [`reporter`]: Transient error notices
//! - [`scheduler`]: Polling loop
//! - [`widgets`]: Theme, emoji picker and day-card rules
//!
//! The `native` feature (on by default) adds the tokio scheduler, the HTTP
//! fetcher and config loading. Without it the crate builds for wasm and the
//! page drives cycles with its own timers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dashboard_sync::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let fetcher = HttpSummaryFetcher::new(
//!         config.endpoint.url.clone(),
//!         config.endpoint.request_timeout(),
//!     )?;
//!     let view = Arc::new(MemoryView::dashboard(&config.display.chart_name));
//!
//!     let cycle = SyncCycle::new(
//!         Arc::new(fetcher),
//!         Arc::clone(&view),
//!         ViewReconciler::new(config.phrases.clone(), config.display.display_zone()),
//!         ChartAdapter::new(config.display.chart_name.clone(), config.phrases.clone()),
//!         ErrorReporter::new(config.phrases.fetch_error.clone()),
//!     );
//!
//!     let handle = PollScheduler::new(cycle, PollState::new(config.polling.interval())).start();
//!     tokio::signal::ctrl_c().await?;
//!     handle.shutdown();
//!
//!     println!("{:?}", view.snapshot());
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod fetcher;
pub mod phrases;
pub mod reconciler;
pub mod reporter;
pub mod summary;
pub mod view;
pub mod widgets;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod scheduler;

// Re-export top-level types for convenience
pub use summary::{FetchError, FetchResult, NetworkFailure, Scope, SummaryRecord};

pub use view::{
    ChartSnapshot, DisplaySlot, MemoryView, Notice, NoticeAnchor, NoticeId, SlotId,
    SlotSnapshot, View, ViewSnapshot,
};

pub use chart::{ChartAdapter, ChartWidget, TitleStyle, DEFAULT_CHART_NAME};
pub use fetcher::{SummaryFetcher, DEFAULT_STATS_URL};
pub use phrases::Phrasebook;
pub use reconciler::{DisplayZone, ViewReconciler};
pub use reporter::{ErrorReporter, NOTICE_CLASS, NOTICE_EXPIRY};

#[cfg(feature = "native")]
pub use fetcher::HttpSummaryFetcher;

#[cfg(feature = "native")]
pub use scheduler::{
    CycleOutcome, PollHandle, PollScheduler, PollState, SyncCycle, MIN_POLL_INTERVAL, POLL_INTERVAL,
};

#[cfg(feature = "native")]
pub use config::{
    Config, ConfigError, ConfigSource, DisplayConfig, EndpointConfig, LoggingConfig,
    PollingConfig,
};
