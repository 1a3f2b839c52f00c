//! Chart adapter
//!
//! The channel ratio chart is owned by the page. Each successful cycle
//! replaces its two-bucket series, optionally retitles it from the scope,
//! and asks it to redraw once.

use serde::{Deserialize, Serialize};

use crate::phrases::Phrasebook;
use crate::summary::SummaryRecord;
use crate::view::View;

/// Name the dashboard page registers its channel chart under
pub const DEFAULT_CHART_NAME: &str = "channelsChart";

/// Update contract of an externally owned chart widget
pub trait ChartWidget {
    /// Replace the first dataset with `values`
    fn replace_series(&self, values: &[u64]);

    fn set_title(&self, text: &str, style: &TitleStyle);

    fn redraw(&self);
}

/// Title options handed to the widget alongside the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleStyle {
    pub display: bool,
    pub font_size: u32,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            display: true,
            font_size: 14,
        }
    }
}

/// Pushes summary counts into the chart widget
#[derive(Debug, Clone)]
pub struct ChartAdapter {
    widget_name: String,
    phrases: Phrasebook,
    title_style: TitleStyle,
}

impl ChartAdapter {
    pub fn new(widget_name: impl Into<String>, phrases: Phrasebook) -> Self {
        Self {
            widget_name: widget_name.into(),
            phrases,
            title_style: TitleStyle::default(),
        }
    }

    /// Builder method: set the title style
    pub fn title_style(mut self, style: TitleStyle) -> Self {
        self.title_style = style;
        self
    }

    pub fn widget_name(&self) -> &str {
        &self.widget_name
    }

    /// Apply `record` to the chart if one is registered on the page.
    ///
    /// Without a scope the current title is kept, even if an earlier cycle
    /// set a scope-specific one.
    pub fn update_chart(&self, view: &dyn View, record: &SummaryRecord) {
        let Some(chart) = view.chart(&self.widget_name) else {
            tracing::trace!(widget = %self.widget_name, "No chart widget on page");
            return;
        };

        chart.replace_series(&[record.sfw_channels, record.nsfw_channels]);

        if let Some(scope) = record.scope {
            chart.set_title(self.phrases.chart_title(scope), &self.title_style);
        }

        chart.redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::Scope;
    use crate::view::MemoryView;

    fn adapter() -> ChartAdapter {
        ChartAdapter::new(DEFAULT_CHART_NAME, Phrasebook::default())
    }

    #[test]
    fn test_series_order_is_sfw_then_nsfw() {
        let view = MemoryView::new().with_chart(DEFAULT_CHART_NAME);
        adapter().update_chart(&view, &SummaryRecord::new(50, 3, 40, 10, 1000));

        let chart = view.chart_snapshot().unwrap();
        assert_eq!(chart.series, vec![40, 10]);
        assert_eq!(chart.redraws, 1);
        assert_eq!(chart.title, None);
    }

    #[test]
    fn test_scope_sets_title() {
        let view = MemoryView::new().with_chart(DEFAULT_CHART_NAME);
        let phrases = Phrasebook::default();

        adapter().update_chart(
            &view,
            &SummaryRecord::new(2, 0, 1, 1, 5).scope(Scope::Network),
        );
        let chart = view.chart_snapshot().unwrap();
        assert_eq!(chart.title.as_deref(), Some(phrases.network_chart_title.as_str()));
        assert_eq!(chart.title_style, Some(TitleStyle::default()));

        adapter().update_chart(&view, &SummaryRecord::new(2, 0, 1, 1, 5).scope(Scope::Own));
        let chart = view.chart_snapshot().unwrap();
        assert_eq!(chart.title.as_deref(), Some(phrases.own_chart_title.as_str()));
        assert_eq!(chart.redraws, 2);
    }

    #[test]
    fn test_missing_scope_keeps_stale_title() {
        let view = MemoryView::new().with_chart(DEFAULT_CHART_NAME);
        adapter().update_chart(
            &view,
            &SummaryRecord::new(2, 0, 1, 1, 5).scope(Scope::Network),
        );
        adapter().update_chart(&view, &SummaryRecord::new(3, 0, 2, 1, 5));

        let chart = view.chart_snapshot().unwrap();
        assert_eq!(chart.series, vec![2, 1]);
        assert_eq!(
            chart.title.as_deref(),
            Some(Phrasebook::default().network_chart_title.as_str())
        );
    }

    #[test]
    fn test_no_widget_is_noop() {
        let view = MemoryView::new().with_chart("someOtherChart");
        adapter().update_chart(&view, &SummaryRecord::new(1, 1, 1, 1, 1));
        assert_eq!(view.chart_snapshot().unwrap().redraws, 0);

        let bare = MemoryView::new();
        adapter().update_chart(&bare, &SummaryRecord::new(1, 1, 1, 1, 1));
        assert!(bare.chart_snapshot().is_none());
    }
}
