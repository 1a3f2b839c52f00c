//! Dashboard UI
//!
//! WASM bindings for the server-rendered admin dashboard.
//!
//! # Features
//!
//! - Live stats: polls the stats endpoint and updates counters, the pending
//!   badge and the channel chart in place
//! - Transient error notice when a poll fails
//! - Tooltips, flash auto-dismiss, day-card toggles, dark mode, emoji picker
//!
//! # Architecture
//!
//! The pages are rendered by the server; nothing here builds markup beyond the
//! error notice and the emoji buttons. The sync rules come from
//! `dashboard-sync` built without its native runtime, and this crate supplies
//! the DOM view, the browser fetch and the browser timers.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, DocumentReadyState};

mod api;
mod dom;
mod poll;
mod widgets;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() == DocumentReadyState::Loading {
        let ready_document = document.clone();
        let on_ready = Closure::once(move || start(ready_document));
        let _ = document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        );
        on_ready.forget();
    } else {
        start(document);
    }
}

fn start(document: Document) {
    widgets::init_tooltips(&document);
    widgets::dismiss_flash_messages(&document);
    poll::start(document.clone());
    widgets::init_day_toggles(&document);
    widgets::init_theme_toggle(&document);
    widgets::init_emoji_picker(&document);
}
