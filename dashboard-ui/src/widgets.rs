//! Page widgets
//!
//! DOM wiring for the small interactive pieces of the admin pages. The state
//! rules live in `dashboard_sync::widgets`.

use std::rc::Rc;

use dashboard_sync::widgets::{
    restore_theme, toggle_theme, DayCard, EmojiSelection, MemoryPreferenceStore, PreferenceStore,
    Theme, COMMON_EMOJIS, FLASH_DISMISS_DELAY, TOOLTIP_SELECTOR,
};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, Storage};

/// Elements matching `selector`, in document order
fn select_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn on_click(target: &Element, handler: impl FnMut() + 'static) {
    let closure = Closure::<dyn FnMut()>::new(handler);
    let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Hand every tooltip trigger to `bootstrap.Tooltip`, if bootstrap is loaded
pub fn init_tooltips(document: &Document) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(tooltip) = Reflect::get(&window, &"bootstrap".into())
        .ok()
        .filter(JsValue::is_object)
        .and_then(|bootstrap| Reflect::get(&bootstrap, &"Tooltip".into()).ok())
        .and_then(|ctor| ctor.dyn_into::<Function>().ok())
    else {
        return;
    };

    for trigger in select_all(document, TOOLTIP_SELECTOR) {
        if let Err(e) = Reflect::construct(&tooltip, &Array::of1(&trigger)) {
            web_sys::console::warn_2(&"Tooltip init failed:".into(), &e);
        }
    }
}

/// Close the flash messages present at load after a delay
pub fn dismiss_flash_messages(document: &Document) {
    let delay_ms = FLASH_DISMISS_DELAY.as_millis() as u32;

    for message in select_all(document, ".alert") {
        Timeout::new(delay_ms, move || {
            let close = message
                .query_selector(".btn-close")
                .ok()
                .flatten()
                .and_then(|button| button.dyn_into::<HtmlElement>().ok());
            if let Some(close) = close {
                close.click();
            }
        })
        .forget();
    }
}

/// Day toggles flip their card's highlight and checkbox
pub fn init_day_toggles(document: &Document) {
    for button in select_all(document, ".day-toggle") {
        let target = button.clone();
        on_click(&button, move || {
            let Some(card) = target.closest(".day-card").ok().flatten() else {
                return;
            };
            let Some(checkbox) = card
                .query_selector("input[type=\"checkbox\"]")
                .ok()
                .flatten()
                .and_then(|input| input.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };

            let state =
                DayCard::new(card.class_list().contains("active"), checkbox.checked()).toggled();
            let _ = card.class_list().toggle_with_force("active", state.active);
            checkbox.set_checked(state.checked);
        });
    }
}

/// Browser local storage as a preference store
struct LocalStorageStore(Storage);

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let _ = self.0.set_item(key, value);
    }
}

fn preference_store() -> Rc<dyn PreferenceStore> {
    match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        Some(storage) => Rc::new(LocalStorageStore(storage)),
        None => Rc::new(MemoryPreferenceStore::new()),
    }
}

fn apply_theme(document: &Document, toggle: &Element, theme: Theme) {
    if let Some(body) = document.body() {
        let _ = body
            .class_list()
            .toggle_with_force("dark-mode", theme.body_class().is_some());
    }
    if let Ok(Some(icon)) = toggle.query_selector("i") {
        let icons = icon.class_list();
        let _ = icons.remove_2(Theme::Light.icon_class(), Theme::Dark.icon_class());
        let _ = icons.add_1(theme.icon_class());
    }
}

fn current_theme(document: &Document) -> Theme {
    match document.body() {
        Some(body) if body.class_list().contains("dark-mode") => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Dark mode toggle with a persisted preference
pub fn init_theme_toggle(document: &Document) {
    let Some(toggle) = document.get_element_by_id("dark-mode-toggle") else {
        return;
    };
    let store = preference_store();

    if restore_theme(store.as_ref()) == Theme::Dark {
        apply_theme(document, &toggle, Theme::Dark);
    }

    let document = document.clone();
    let target = toggle.clone();
    on_click(&toggle, move || {
        let next = toggle_theme(store.as_ref(), current_theme(&document));
        apply_theme(&document, &target, next);
    });
}

/// Emoji buttons that fill the channel's emoji input
pub fn init_emoji_picker(document: &Document) {
    let Some(picker) = document.get_element_by_id("emoji-picker") else {
        return;
    };
    let Some(input) = document
        .get_element_by_id("emojis")
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };

    for emoji in COMMON_EMOJIS {
        let Some(button) = document
            .create_element("button")
            .ok()
            .and_then(|e| e.dyn_into::<HtmlButtonElement>().ok())
        else {
            continue;
        };
        button.set_type("button");
        button.set_class_name("emoji-btn");
        button.set_text_content(Some(emoji));

        let input = input.clone();
        on_click(&button, move || {
            let mut selection = EmojiSelection::parse(&input.value());
            if selection.add(emoji) {
                input.set_value(&selection.to_input_value());
            }
        });

        let _ = picker.append_child(&button);
    }
}
