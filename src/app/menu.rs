//! Joystick-to-menu mapping and held-input repeat gating.
//!
//! A held stick should not race through the menu.  The first deflection after
//! the stick returns to centre is accepted immediately; while it stays
//! deflected, further moves are accepted only once the repeat interval for
//! that axis has elapsed.  Vertical moves the cursor and wins over
//! horizontal when both are deflected; horizontal edits the selected value.

use crate::fsm::context::Selection;

/// One classified joystick sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoystickReading {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Push switch (activation).
    pub pressed: bool,
}

impl JoystickReading {
    pub fn vertical(&self) -> bool {
        self.up || self.down
    }

    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    /// Any axis deflected.
    pub fn deflected(&self) -> bool {
        self.vertical() || self.horizontal()
    }
}

/// What an accepted deflection does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SelectPrev,
    SelectNext,
    Decrement,
    Increment,
}

impl MenuAction {
    /// Map a deflected stick to an action.  `None` when centred.
    pub fn from_reading(stick: &JoystickReading) -> Option<Self> {
        if stick.up {
            Some(Self::SelectPrev)
        } else if stick.down {
            Some(Self::SelectNext)
        } else if stick.left {
            Some(Self::Decrement)
        } else if stick.right {
            Some(Self::Increment)
        } else {
            None
        }
    }

    /// Moves the cursor rather than editing a value.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::SelectPrev | Self::SelectNext)
    }
}

/// Repeat limiter for held directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatGate {
    last_accept_ms: u32,
    /// Stick returned to centre since the last accepted move.
    released: bool,
}

impl Default for RepeatGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RepeatGate {
    pub const fn new() -> Self {
        Self {
            last_accept_ms: 0,
            released: true,
        }
    }

    /// Would a move at `now_ms` be accepted under `interval_ms`?
    pub fn ready(&self, now_ms: u32, interval_ms: u32) -> bool {
        self.released || now_ms.wrapping_sub(self.last_accept_ms) >= interval_ms
    }

    /// Record an accepted move.
    pub fn accept(&mut self, now_ms: u32) {
        self.last_accept_ms = now_ms;
        self.released = false;
    }

    /// Stick is centred.
    pub fn release(&mut self) {
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

/// Cursor position after a vertical action.
pub fn move_selection(selection: Selection, action: MenuAction) -> Selection {
    match action {
        MenuAction::SelectPrev => selection.prev(),
        MenuAction::SelectNext => selection.next(),
        MenuAction::Decrement | MenuAction::Increment => selection,
    }
}
