//! Stats polling
//!
//! Browser-timer counterpart of the native scheduler: one cycle right away,
//! then one per interval for the lifetime of the page. Cycles are spawned
//! independently, so a slow fetch can overlap the next tick.

use std::rc::Rc;

use dashboard_sync::{
    ChartAdapter, DisplayZone, ErrorReporter, FetchError, Phrasebook, ViewReconciler,
    DEFAULT_CHART_NAME,
};
use gloo_timers::callback::{Interval, Timeout};
use web_sys::Document;

use crate::api;
use crate::dom::DomView;

/// Time between cycle starts
const POLL_INTERVAL_MS: u32 = 30_000;

struct Poller {
    view: DomView,
    url: String,
    reconciler: ViewReconciler,
    chart: ChartAdapter,
    reporter: ErrorReporter,
}

/// Start polling for the lifetime of the page
pub fn start(document: Document) {
    let phrases = Phrasebook::default();
    let poller = Rc::new(Poller {
        view: DomView::new(document),
        url: api::get_stats_url(),
        reconciler: ViewReconciler::new(phrases.clone(), DisplayZone::Local),
        chart: ChartAdapter::new(DEFAULT_CHART_NAME, phrases.clone()),
        reporter: ErrorReporter::new(phrases.fetch_error),
    });

    run_cycle(Rc::clone(&poller));
    Interval::new(POLL_INTERVAL_MS, move || run_cycle(Rc::clone(&poller))).forget();
}

fn run_cycle(poller: Rc<Poller>) {
    wasm_bindgen_futures::spawn_local(async move {
        match api::fetch_summary(&poller.url).await {
            Ok(record) => {
                poller.reconciler.reconcile(&poller.view, &record);
                poller.chart.update_chart(&poller.view, &record);
            }
            Err(e) => report(poller, &e),
        }
    });
}

fn report(poller: Rc<Poller>, error: &FetchError) {
    web_sys::console::error_1(&format!("Error fetching stats: {}", error).into());

    let Some(id) = poller.reporter.mount_notice(&poller.view, error) else {
        return;
    };

    let expiry_ms = u32::try_from(poller.reporter.notice_expiry().as_millis()).unwrap_or(u32::MAX);
    Timeout::new(expiry_ms, move || poller.view.remove_notice(id)).forget();
}
