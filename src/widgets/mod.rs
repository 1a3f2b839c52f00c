//! Page widgets outside the sync engine
//!
//! State rules for the small interactive pieces of the dashboard. The DOM
//! wiring lives in the wasm crate; the rules live here so they can be tested
//! natively.

mod day_card;
mod emoji;
mod theme;

pub use day_card::DayCard;
pub use emoji::{EmojiSelection, COMMON_EMOJIS, MAX_EMOJIS};
pub use theme::{
    restore_theme, toggle_theme, MemoryPreferenceStore, PreferenceStore, Theme, DARK_MODE_KEY,
};

use std::time::Duration;

/// Delay before server-rendered flash messages close themselves
pub const FLASH_DISMISS_DELAY: Duration = Duration::from_millis(5000);

/// Elements handed to the tooltip library on load
pub const TOOLTIP_SELECTOR: &str = "[data-bs-toggle=\"tooltip\"]";
