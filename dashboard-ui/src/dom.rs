//! DOM-backed view
//!
//! Every lookup queries the live document, so slots that appear or vanish
//! between polls are picked up on the next cycle.

use dashboard_sync::{
    ChartWidget, DisplaySlot, Notice, NoticeAnchor, NoticeId, SlotId, TitleStyle, View,
};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

/// Attribute marking notices mounted by the sync engine
const NOTICE_ATTR: &str = "data-stats-notice";

/// Notices go into the first card on the page
const NOTICE_HOST: &str = ".card";

/// The current document as a [`View`]
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn remove_all(&self, selector: &str) {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return;
        };
        for i in 0..nodes.length() {
            if let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                element.remove();
            }
        }
    }
}

impl View for DomView {
    fn slot(&self, id: SlotId) -> Option<Box<dyn DisplaySlot + '_>> {
        let element = self.query(id.selector())?.dyn_into::<HtmlElement>().ok()?;
        Some(Box::new(DomSlot(element)))
    }

    fn chart(&self, name: &str) -> Option<Box<dyn ChartWidget + '_>> {
        let window = web_sys::window()?;
        let chart = Reflect::get(&window, &JsValue::from_str(name)).ok()?;
        if !chart.is_object() {
            return None;
        }
        Some(Box::new(JsChart(chart)))
    }

    fn notice_anchor(&self) -> Option<Box<dyn NoticeAnchor + '_>> {
        let host = self.query(NOTICE_HOST)?;
        Some(Box::new(DomAnchor {
            document: &self.document,
            host,
        }))
    }

    fn clear_notices(&self) {
        self.remove_all(&format!("[{}]", NOTICE_ATTR));
    }

    fn remove_notice(&self, id: NoticeId) {
        self.remove_all(&format!("[{}=\"{}\"]", NOTICE_ATTR, id));
    }
}

struct DomSlot(HtmlElement);

impl DisplaySlot for DomSlot {
    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_visible(&self, visible: bool) {
        let display = if visible { "inline-block" } else { "none" };
        let _ = self.0.style().set_property("display", display);
    }
}

struct DomAnchor<'a> {
    document: &'a Document,
    host: Element,
}

impl NoticeAnchor for DomAnchor<'_> {
    fn mount(&self, notice: &Notice) {
        let Ok(element) = self.document.create_element("div") else {
            return;
        };
        element.set_class_name(&notice.class);
        element.set_text_content(Some(&notice.text));
        let _ = element.set_attribute(NOTICE_ATTR, &notice.id.to_string());
        let _ = self.host.append_child(&element);
    }
}

/// A Chart.js instance registered on `window`
struct JsChart(JsValue);

impl JsChart {
    fn path(&self, keys: &[&str]) -> Option<JsValue> {
        keys.iter().try_fold(self.0.clone(), |value, key| {
            Reflect::get(&value, &JsValue::from_str(key))
                .ok()
                .filter(JsValue::is_object)
        })
    }
}

impl ChartWidget for JsChart {
    fn replace_series(&self, values: &[u64]) {
        let Some(dataset) = self
            .path(&["data", "datasets"])
            .and_then(|datasets| Reflect::get_u32(&datasets, 0).ok())
            .filter(JsValue::is_object)
        else {
            web_sys::console::warn_1(&"Chart has no dataset to update".into());
            return;
        };

        let series: Array = values
            .iter()
            .map(|v| JsValue::from_f64(*v as f64))
            .collect();
        let _ = Reflect::set(&dataset, &"data".into(), &series);
    }

    fn set_title(&self, text: &str, style: &TitleStyle) {
        let Some(plugins) = self.path(&["options", "plugins"]) else {
            return;
        };

        let font = Object::new();
        let _ = Reflect::set(&font, &"size".into(), &style.font_size.into());

        let title = Object::new();
        let _ = Reflect::set(&title, &"display".into(), &style.display.into());
        let _ = Reflect::set(&title, &"text".into(), &text.into());
        let _ = Reflect::set(&title, &"font".into(), &font);

        let _ = Reflect::set(&plugins, &"title".into(), &title);
    }

    fn redraw(&self) {
        let update = Reflect::get(&self.0, &"update".into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        if let Some(update) = update {
            if let Err(e) = update.call0(&self.0) {
                web_sys::console::error_2(&"Chart update failed:".into(), &e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_sync::{ChartAdapter, Phrasebook, Scope, SummaryRecord, ViewReconciler};
    use chrono::FixedOffset;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn mount_fixture(html: &str) {
        document().body().unwrap().set_inner_html(html);
    }

    #[wasm_bindgen_test]
    fn test_reconcile_into_dom() {
        mount_fixture(
            r#"<span class="pending-count" style="display:none"></span>
               <div id="total-channels"></div>
               <div id="stats-subtitle"></div>"#,
        );
        let view = DomView::new(document());
        let record = SummaryRecord::new(50, 3, 40, 10, 1000).scope(Scope::Network);

        ViewReconciler::new(Phrasebook::default(), FixedOffset::east_opt(0).unwrap())
            .reconcile(&view, &record);

        let badge = view.query(".pending-count").unwrap();
        assert_eq!(badge.text_content().as_deref(), Some("3"));
        assert_eq!(
            badge.dyn_into::<HtmlElement>().unwrap().style().get_property_value("display").unwrap(),
            "inline-block"
        );
        assert_eq!(
            view.query("#stats-subtitle").unwrap().text_content().as_deref(),
            Some("Мережева статистика")
        );
    }

    #[wasm_bindgen_test]
    fn test_notice_lifecycle() {
        mount_fixture(r#"<div class="card"></div><div class="alert alert-danger">flash</div>"#);
        let view = DomView::new(document());
        let notice = |id| Notice {
            id: NoticeId(id),
            text: "failed".to_string(),
            class: "alert alert-danger mt-3".to_string(),
        };

        view.notice_anchor().unwrap().mount(&notice(1));
        view.clear_notices();
        view.notice_anchor().unwrap().mount(&notice(2));
        view.remove_notice(NoticeId(1));

        let mounted = document().query_selector_all("[data-stats-notice]").unwrap();
        assert_eq!(mounted.length(), 1);
        // Server-rendered alerts are not engine notices
        assert!(view.query(".alert:not([data-stats-notice])").is_some());

        view.remove_notice(NoticeId(2));
        assert!(view.query("[data-stats-notice]").is_none());
    }

    #[wasm_bindgen_test]
    fn test_missing_chart_is_skipped() {
        mount_fixture("");
        let view = DomView::new(document());
        assert!(view.chart("noSuchChart").is_none());

        ChartAdapter::new("noSuchChart", Phrasebook::default())
            .update_chart(&view, &SummaryRecord::new(1, 0, 1, 0, 0));
    }
}
