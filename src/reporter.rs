//! Error reporter
//!
//! Turns a failed fetch into one transient notice. At most one notice is
//! shown at a time: a new failure removes the previous notice before
//! mounting its own, and every notice removes itself after its expiry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::summary::FetchError;
use crate::view::{Notice, NoticeId, View};

/// How long a notice stays up
pub const NOTICE_EXPIRY: Duration = Duration::from_millis(5000);

/// Classes of the mounted notice element
pub const NOTICE_CLASS: &str = "alert alert-danger mt-3";

/// Surfaces fetch failures in the view
#[derive(Debug)]
pub struct ErrorReporter {
    message: String,
    expiry: Duration,
    next_id: AtomicU64,
}

impl ErrorReporter {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expiry: NOTICE_EXPIRY,
            next_id: AtomicU64::new(0),
        }
    }

    /// Builder method: set the notice lifetime
    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn notice_expiry(&self) -> Duration {
        self.expiry
    }

    /// Log `error` and replace any visible notice with a new one.
    ///
    /// Returns the id of the mounted notice, or `None` when the page has no
    /// anchor. Removal after expiry is up to the caller's timer; see
    /// [`ErrorReporter::report`] for the tokio version.
    pub fn mount_notice(&self, view: &dyn View, error: &FetchError) -> Option<NoticeId> {
        tracing::error!(error = %error, kind = error.kind(), "Error fetching stats");

        view.clear_notices();

        let Some(anchor) = view.notice_anchor() else {
            tracing::debug!("No notice anchor on page, error not shown");
            return None;
        };

        let notice = Notice {
            id: NoticeId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            text: self.message.clone(),
            class: NOTICE_CLASS.to_string(),
        };
        anchor.mount(&notice);

        Some(notice.id)
    }

    /// Mount a notice for `error` and schedule its removal.
    #[cfg(feature = "native")]
    pub fn report<V>(&self, view: &std::sync::Arc<V>, error: &FetchError) -> Option<NoticeId>
    where
        V: View + Send + Sync + 'static,
    {
        let id = self.mount_notice(view.as_ref(), error)?;

        let view = std::sync::Arc::clone(view);
        let expiry = self.expiry;
        tokio::spawn(async move {
            tokio::time::sleep(expiry).await;
            view.remove_notice(id);
            tracing::debug!(notice = %id, "Error notice expired");
        });

        Some(id)
    }
}
