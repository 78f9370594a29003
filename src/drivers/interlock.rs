//! Safety interlock input.
//!
//! ## Hardware
//!
//! Guard switch to ground with an internal pull-up: LOW = guard closed,
//! HIGH = guard open (tripped).
//!
//! The pin level is sampled on every [`InterlockInput::tripped`] call, so
//! the interlock works with or without the GPIO ISR service.  When the ISR
//! is installed it only latches "guard opened" so an opening shorter than
//! one tick is still reported once.  The ISR never touches machine state.

use core::sync::atomic::{AtomicBool, Ordering};

/// Reads the raw level of a GPIO (`true` = HIGH).
pub type LevelReader = fn(i32) -> bool;

/// Set by the ISR on a rising (guard-open) level, cleared by the next poll.
static INTERLOCK_OPENED: AtomicBool = AtomicBool::new(false);

/// ISR-side writer.  Lock-free; safe from interrupt context.
pub fn interlock_isr_handler(level_high: bool) {
    if level_high {
        INTERLOCK_OPENED.store(true, Ordering::Release);
    }
}

pub struct InterlockInput {
    gpio: i32,
    read_level: LevelReader,
    opened: &'static AtomicBool,
}

impl InterlockInput {
    /// Interlock on `gpio`, sampled through the board GPIO driver.
    pub fn new(gpio: i32) -> Self {
        Self::with_source(gpio, crate::drivers::hw_init::gpio_read, &INTERLOCK_OPENED)
    }

    /// Interlock with an explicit level reader and opening latch.
    pub fn with_source(gpio: i32, read_level: LevelReader, opened: &'static AtomicBool) -> Self {
        Self {
            gpio,
            read_level,
            opened,
        }
    }

    /// GPIO pin the guard switch is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Raw pin level (`true` = guard open).  Leaves the opening latch alone.
    pub fn level(&self) -> bool {
        (self.read_level)(self.gpio)
    }

    /// Guard open now, or opened since the previous call.
    pub fn tripped(&self) -> bool {
        let level = self.level();
        let pulse = self.opened.swap(false, Ordering::AcqRel);
        level || pulse
    }
}
