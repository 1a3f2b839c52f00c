//! In-memory view
//!
//! Holds slot text and visibility, an optional chart and the mounted notices
//! behind one mutex. Used by the headless CLI and as the view in tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::{DisplaySlot, Notice, NoticeAnchor, NoticeId, SlotId, View};
use crate::chart::{ChartWidget, TitleStyle};

/// Rendered state of one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSnapshot {
    pub text: String,
    pub visible: bool,
}

impl Default for SlotSnapshot {
    fn default() -> Self {
        Self {
            text: String::new(),
            visible: true,
        }
    }
}

/// Rendered state of the chart widget
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSnapshot {
    pub name: String,
    pub series: Vec<u64>,
    pub title: Option<String>,
    pub title_style: Option<TitleStyle>,
    pub redraws: u64,
}

/// Point-in-time copy of everything the view displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub slots: BTreeMap<SlotId, SlotSnapshot>,
    pub chart: Option<ChartSnapshot>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Default)]
struct MemoryState {
    slots: BTreeMap<SlotId, SlotSnapshot>,
    chart: Option<ChartSnapshot>,
    anchor: bool,
    notices: Vec<Notice>,
}

/// View kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<MemoryState>,
}

impl MemoryView {
    /// Create an empty view with no slots, chart or anchor
    pub fn new() -> Self {
        Self::default()
    }

    /// A view shaped like the full dashboard page
    pub fn dashboard(chart_name: &str) -> Self {
        Self::new()
            .with_slots(SlotId::ALL)
            .with_chart(chart_name)
            .with_notice_anchor()
    }

    /// Builder method: add a slot
    pub fn with_slot(self, id: SlotId) -> Self {
        self.lock().slots.insert(id, SlotSnapshot::default());
        self
    }

    /// Builder method: add several slots
    pub fn with_slots(self, ids: impl IntoIterator<Item = SlotId>) -> Self {
        {
            let mut state = self.lock();
            for id in ids {
                state.slots.insert(id, SlotSnapshot::default());
            }
        }
        self
    }

    /// Builder method: register a chart widget under `name`
    pub fn with_chart(self, name: &str) -> Self {
        self.lock().chart = Some(ChartSnapshot {
            name: name.to_string(),
            ..ChartSnapshot::default()
        });
        self
    }

    /// Builder method: add the notice anchor
    pub fn with_notice_anchor(self) -> Self {
        self.lock().anchor = true;
        self
    }

    /// Drop a slot, as if the page navigated away from it
    pub fn remove_slot(&self, id: SlotId) {
        self.lock().slots.remove(&id);
    }

    /// Set slot text directly, as the server-rendered page would
    pub fn preset_text(&self, id: SlotId, text: &str) {
        if let Some(slot) = self.lock().slots.get_mut(&id) {
            slot.text = text.to_string();
        }
    }

    /// Set the chart title directly, as the page script would
    pub fn preset_chart_title(&self, title: &str) {
        if let Some(chart) = self.lock().chart.as_mut() {
            chart.title = Some(title.to_string());
        }
    }

    pub fn text(&self, id: SlotId) -> Option<String> {
        self.lock().slots.get(&id).map(|s| s.text.clone())
    }

    pub fn is_visible(&self, id: SlotId) -> Option<bool> {
        self.lock().slots.get(&id).map(|s| s.visible)
    }

    pub fn chart_snapshot(&self) -> Option<ChartSnapshot> {
        self.lock().chart.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock().notices.clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.lock();
        ViewSnapshot {
            slots: state.slots.clone(),
            chart: state.chart.clone(),
            notices: state.notices.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct MemorySlot<'a> {
    view: &'a MemoryView,
    id: SlotId,
}

impl DisplaySlot for MemorySlot<'_> {
    fn set_text(&self, text: &str) {
        if let Some(slot) = self.view.lock().slots.get_mut(&self.id) {
            slot.text = text.to_string();
        }
    }

    fn set_visible(&self, visible: bool) {
        if let Some(slot) = self.view.lock().slots.get_mut(&self.id) {
            slot.visible = visible;
        }
    }
}

struct MemoryChart<'a> {
    view: &'a MemoryView,
}

impl ChartWidget for MemoryChart<'_> {
    fn replace_series(&self, values: &[u64]) {
        if let Some(chart) = self.view.lock().chart.as_mut() {
            chart.series = values.to_vec();
        }
    }

    fn set_title(&self, text: &str, style: &TitleStyle) {
        if let Some(chart) = self.view.lock().chart.as_mut() {
            chart.title = Some(text.to_string());
            chart.title_style = Some(style.clone());
        }
    }

    fn redraw(&self) {
        if let Some(chart) = self.view.lock().chart.as_mut() {
            chart.redraws += 1;
        }
    }
}

struct MemoryAnchor<'a> {
    view: &'a MemoryView,
}

impl NoticeAnchor for MemoryAnchor<'_> {
    fn mount(&self, notice: &Notice) {
        self.view.lock().notices.push(notice.clone());
    }
}

impl View for MemoryView {
    fn slot(&self, id: SlotId) -> Option<Box<dyn DisplaySlot + '_>> {
        if self.lock().slots.contains_key(&id) {
            Some(Box::new(MemorySlot { view: self, id }))
        } else {
            None
        }
    }

    fn chart(&self, name: &str) -> Option<Box<dyn ChartWidget + '_>> {
        let registered = self
            .lock()
            .chart
            .as_ref()
            .map(|c| c.name == name)
            .unwrap_or(false);

        if registered {
            Some(Box::new(MemoryChart { view: self }))
        } else {
            None
        }
    }

    fn notice_anchor(&self) -> Option<Box<dyn NoticeAnchor + '_>> {
        if self.lock().anchor {
            Some(Box::new(MemoryAnchor { view: self }))
        } else {
            None
        }
    }

    fn clear_notices(&self) {
        self.lock().notices.clear();
    }

    fn remove_notice(&self, id: NoticeId) {
        self.lock().notices.retain(|n| n.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_shape() {
        let view = MemoryView::dashboard("channelsChart");
        for id in SlotId::ALL {
            assert!(view.slot(id).is_some());
            assert_eq!(view.is_visible(id), Some(true));
        }
        assert!(view.chart("channelsChart").is_some());
        assert!(view.chart("otherChart").is_none());
        assert!(view.notice_anchor().is_some());
    }

    #[test]
    fn test_slot_presence_is_live() {
        let view = MemoryView::new().with_slot(SlotId::Subtitle);
        assert!(view.slot(SlotId::Subtitle).is_some());

        view.remove_slot(SlotId::Subtitle);
        assert!(view.slot(SlotId::Subtitle).is_none());
        assert_eq!(view.text(SlotId::Subtitle), None);
    }

    #[test]
    fn test_notice_bookkeeping() {
        let view = MemoryView::new().with_notice_anchor();
        let anchor = view.notice_anchor().unwrap();
        for id in 0..2 {
            anchor.mount(&Notice {
                id: NoticeId(id),
                text: "oops".into(),
                class: "alert".into(),
            });
        }
        drop(anchor);

        view.remove_notice(NoticeId(0));
        assert_eq!(view.notices().len(), 1);
        assert_eq!(view.notices()[0].id, NoticeId(1));

        view.clear_notices();
        assert!(view.notices().is_empty());
    }

    #[test]
    fn test_snapshot_serializes_slot_names() {
        let view = MemoryView::new().with_slot(SlotId::PendingBadge);
        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert_eq!(json["slots"]["pending-badge"]["visible"], true);
    }
}
