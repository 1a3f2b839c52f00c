//! Rendered view abstraction
//!
//! The dashboard page is already rendered when polling starts. This module
//! describes the small surface the sync engine needs from it:
//!
//! - **Display slots**: named text nodes and badges, looked up fresh every
//!   cycle. A missing slot is not an error; writes to it simply do nothing.
//! - **Chart widget**: looked up by name, never created or destroyed here.
//! - **Notice anchor**: where the transient error notice is mounted.
//!
//! [`MemoryView`] is an in-process implementation used by the headless CLI
//! and by tests. The wasm crate implements the same trait over the DOM.

mod memory;

pub use memory::{ChartSnapshot, MemoryView, SlotSnapshot, ViewSnapshot};

use serde::Serialize;

use crate::chart::ChartWidget;

/// Addressable locations the engine writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotId {
    /// Navbar badge with the pending count; hidden when there is nothing pending
    PendingBadge,
    TotalChannels,
    PendingChannels,
    SfwChannels,
    NsfwChannels,
    TotalSubscribers,
    Subtitle,
    LastUpdated,
}

impl SlotId {
    pub const ALL: [SlotId; 8] = [
        SlotId::PendingBadge,
        SlotId::TotalChannels,
        SlotId::PendingChannels,
        SlotId::SfwChannels,
        SlotId::NsfwChannels,
        SlotId::TotalSubscribers,
        SlotId::Subtitle,
        SlotId::LastUpdated,
    ];

    /// CSS selector for the slot on the dashboard page
    pub fn selector(self) -> &'static str {
        match self {
            SlotId::PendingBadge => ".pending-count",
            SlotId::TotalChannels => "#total-channels",
            SlotId::PendingChannels => "#pending-channels",
            SlotId::SfwChannels => "#sfw-channels",
            SlotId::NsfwChannels => "#nsfw-channels",
            SlotId::TotalSubscribers => "#total-subscribers",
            SlotId::Subtitle => "#stats-subtitle",
            SlotId::LastUpdated => "#last-updated",
        }
    }
}

/// Handle to one present slot
pub trait DisplaySlot {
    fn set_text(&self, text: &str);
    fn set_visible(&self, visible: bool);
}

/// Container a transient notice can be mounted into
pub trait NoticeAnchor {
    fn mount(&self, notice: &Notice);
}

/// The rendered page as seen by the sync engine
///
/// Every lookup returns `None` when the target is not on the current page.
/// Implementations must not cache presence between calls.
pub trait View {
    fn slot(&self, id: SlotId) -> Option<Box<dyn DisplaySlot + '_>>;

    fn chart(&self, name: &str) -> Option<Box<dyn ChartWidget + '_>>;

    fn notice_anchor(&self) -> Option<Box<dyn NoticeAnchor + '_>>;

    /// Remove every transient notice currently shown
    fn clear_notices(&self);

    /// Remove one notice if it is still shown
    fn remove_notice(&self, id: NoticeId);
}

/// Identifies a mounted notice so its expiry removes only that notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NoticeId(pub u64);

impl std::fmt::Display for NoticeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transient notice as mounted into the anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: NoticeId,
    pub text: String,
    /// CSS classes applied to the notice element
    pub class: String,
}

/// Write `text` into a slot if the slot is present
pub fn write_text(view: &dyn View, id: SlotId, text: &str) -> bool {
    match view.slot(id) {
        Some(slot) => {
            slot.set_text(text);
            true
        }
        None => false,
    }
}
