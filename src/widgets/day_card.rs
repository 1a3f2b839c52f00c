//! Day-of-week schedule cards
//!
//! Each card carries an `active` class and a hidden checkbox that the form
//! submits. A click flips both. They are flipped independently, exactly as
//! the page does, so a card that was rendered out of sync stays out of sync.

/// Rendered state of one day card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCard {
    pub active: bool,
    pub checked: bool,
}

impl DayCard {
    pub fn new(active: bool, checked: bool) -> Self {
        Self { active, checked }
    }

    /// State after one click on the card's toggle
    pub fn toggled(self) -> Self {
        Self {
            active: !self.active,
            checked: !self.checked,
        }
    }

    /// Whether the highlight matches what the form will submit
    pub fn is_consistent(&self) -> bool {
        self.active == self.checked
    }
}
