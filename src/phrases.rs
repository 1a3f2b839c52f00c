//! User-visible strings
//!
//! Defaults are the Ukrainian copy the dashboard ships with. Every field can
//! be overridden from the `[phrases]` config section.

use serde::{Deserialize, Serialize};

use crate::summary::Scope;

/// Localized text written into the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phrasebook {
    pub network_subtitle: String,
    pub own_subtitle: String,
    pub network_chart_title: String,
    pub own_chart_title: String,
    /// Prepended to the formatted timestamp in the last-updated slot
    pub last_updated_prefix: String,
    /// Body of the transient notice shown when a fetch fails
    pub fetch_error: String,
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self {
            network_subtitle: "Мережева статистика".to_string(),
            own_subtitle: "Статистика ваших каналів".to_string(),
            network_chart_title: "Мережеве співвідношення".to_string(),
            own_chart_title: "Ваші канали".to_string(),
            last_updated_prefix: "Останнє оновлення: ".to_string(),
            fetch_error: "Помилка завантаження статистики. Спробуйте пізніше.".to_string(),
        }
    }
}

impl Phrasebook {
    pub fn subtitle(&self, scope: Scope) -> &str {
        match scope {
            Scope::Network => &self.network_subtitle,
            Scope::Own => &self.own_subtitle,
        }
    }

    pub fn chart_title(&self, scope: Scope) -> &str {
        match scope {
            Scope::Network => &self.network_chart_title,
            Scope::Own => &self.own_chart_title,
        }
    }

    pub fn last_updated(&self, formatted: &str) -> String {
        format!("{}{}", self.last_updated_prefix, formatted)
    }
}
