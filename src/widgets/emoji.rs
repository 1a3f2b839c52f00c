//! Bounded emoji picker
//!
//! A channel is tagged with at most three emojis, stored in a text input as
//! a comma-separated list.

/// Emojis offered by the picker, in display order
pub const COMMON_EMOJIS: [&str; 17] = [
    "😊", "👍", "❤️", "🔥", "✨", "🎮", "📱", "💻", "🎵", "📚", "🍕", "🎬", "⚽", "🎨", "🚀", "🤔",
    "😂",
];

/// Upper bound on selected emojis
pub const MAX_EMOJIS: usize = 3;

/// Current picker selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiSelection {
    emojis: Vec<String>,
}

impl EmojiSelection {
    /// Parse the input's value. Blank entries are skipped.
    pub fn parse(value: &str) -> Self {
        let emojis = value
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
        Self { emojis }
    }

    /// Add `emoji`. A duplicate is ignored; when the selection is full the
    /// last emoji is replaced. Returns whether the selection changed.
    pub fn add(&mut self, emoji: &str) -> bool {
        if self.contains(emoji) {
            return false;
        }
        while self.emojis.len() >= MAX_EMOJIS {
            self.emojis.pop();
        }
        self.emojis.push(emoji.to_string());
        true
    }

    pub fn contains(&self, emoji: &str) -> bool {
        self.emojis.iter().any(|e| e == emoji)
    }

    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.emojis
    }

    /// Value written back into the input
    pub fn to_input_value(&self) -> String {
        self.emojis.join(", ")
    }
}
