//! View reconciler
//!
//! Merges a summary into the already-rendered page slot by slot. Each slot
//! is written only if present, so the same reconciler serves the full
//! dashboard and pages that show just the navbar badge.

use chrono::{DateTime, FixedOffset, Local};

use crate::phrases::Phrasebook;
use crate::summary::SummaryRecord;
use crate::view::{write_text, SlotId, View};

/// Timestamp layout used by the dashboard locale (`uk-UA`)
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Zone the last-updated label is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    /// The host's zone, with the offset in effect at each timestamp
    Local,
    /// One offset for every timestamp
    Fixed(FixedOffset),
}

impl From<FixedOffset> for DisplayZone {
    fn from(offset: FixedOffset) -> Self {
        DisplayZone::Fixed(offset)
    }
}

/// Writes summary fields into display slots
#[derive(Debug, Clone)]
pub struct ViewReconciler {
    phrases: Phrasebook,
    zone: DisplayZone,
}

impl ViewReconciler {
    /// Create a reconciler rendering timestamps in `zone`
    pub fn new(phrases: Phrasebook, zone: impl Into<DisplayZone>) -> Self {
        Self {
            phrases,
            zone: zone.into(),
        }
    }

    pub fn phrases(&self) -> &Phrasebook {
        &self.phrases
    }

    /// Apply `record` to every present slot. Never fails and is idempotent.
    pub fn reconcile(&self, view: &dyn View, record: &SummaryRecord) {
        let counters = [
            (SlotId::TotalChannels, record.total_channels),
            (SlotId::PendingChannels, record.pending_applications),
            (SlotId::SfwChannels, record.sfw_channels),
            (SlotId::NsfwChannels, record.nsfw_channels),
            (SlotId::TotalSubscribers, record.total_subscribers),
        ];

        for (id, value) in counters {
            write_text(view, id, &value.to_string());
        }

        self.apply_pending_badge(view, record.pending_applications);

        if let Some(scope) = record.scope {
            write_text(view, SlotId::Subtitle, self.phrases.subtitle(scope));
        }

        if let Some(timestamp) = record.timestamp {
            let label = self.phrases.last_updated(&self.format_timestamp(timestamp));
            write_text(view, SlotId::LastUpdated, &label);
        }
    }

    /// Render a timestamp the way the last-updated slot shows it
    pub fn format_timestamp(&self, timestamp: DateTime<FixedOffset>) -> String {
        match self.zone {
            DisplayZone::Local => timestamp
                .with_timezone(&Local)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            DisplayZone::Fixed(offset) => timestamp
                .with_timezone(&offset)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
        }
    }

    // A hidden badge keeps its old text; the next positive count overwrites
    // it before showing it again.
    fn apply_pending_badge(&self, view: &dyn View, pending: u64) {
        let Some(badge) = view.slot(SlotId::PendingBadge) else {
            return;
        };

        if pending > 0 {
            badge.set_text(&pending.to_string());
            badge.set_visible(true);
        } else {
            badge.set_visible(false);
        }
    }
}
