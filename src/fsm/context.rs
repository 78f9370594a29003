//! Machine state owned by the interaction controller.
//!
//! `MachineState` is the single mutable record the controller reads from and
//! writes to: menu cursor, job parameters, progress, run status, and the
//! transient input latches.  Outside the controller it is only visible
//! through `&MachineState`.

use super::{RunMachine, RunStatus};

// ---------------------------------------------------------------------------
// Menu cursor
// ---------------------------------------------------------------------------

/// Menu rows in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Selection {
    #[default]
    QuantityPerKit = 0,
    KitCount = 1,
    StartStop = 2,
}

impl Selection {
    pub const COUNT: u8 = 3;

    /// All rows, top to bottom.
    pub const ALL: [Self; Self::COUNT as usize] = [Self::QuantityPerKit, Self::KitCount, Self::StartStop];

    fn from_index(idx: u8) -> Self {
        Self::ALL[(idx % Self::COUNT) as usize]
    }

    /// Next row down, wrapping to the top.
    pub fn next(self) -> Self {
        Self::from_index(self as u8 + 1)
    }

    /// Next row up, wrapping to the bottom.
    pub fn prev(self) -> Self {
        Self::from_index(self as u8 + Self::COUNT - 1)
    }
}

// ---------------------------------------------------------------------------
// Wrapping job parameter
// ---------------------------------------------------------------------------

/// An integer confined to `1..=max` that wraps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappingValue {
    value: u8,
    max: u8,
}

impl WrappingValue {
    /// Start at 1.  `max` of 0 is treated as 1.
    pub fn new(max: u8) -> Self {
        Self { value: 1, max: max.max(1) }
    }

    pub fn get(self) -> u8 {
        self.value
    }

    pub fn max(self) -> u8 {
        self.max
    }

    /// `max` wraps to 1.
    pub fn increment(&mut self) {
        self.value = self.value % self.max + 1;
    }

    /// 1 wraps to `max`.
    pub fn decrement(&mut self) {
        let (v, m) = (u16::from(self.value), u16::from(self.max));
        self.value = ((v + m - 2) % m + 1) as u8;
    }
}

// ---------------------------------------------------------------------------
// MachineState
// ---------------------------------------------------------------------------

/// The controller's mutable record.
#[derive(Debug, Clone)]
pub struct MachineState {
    pub(crate) selection: Selection,
    pub(crate) quantity_per_kit: WrappingValue,
    pub(crate) kit_count: WrappingValue,
    /// 0–100, only meaningful while running.
    pub(crate) progress_percent: u8,
    pub(crate) run: RunMachine,
    /// Activation input was already down on the previous tick.
    pub(crate) switch_held: bool,
}

impl MachineState {
    /// Power-on state: first row selected, one resistor per kit, one kit, idle.
    pub fn new(max_quantity_per_kit: u8, max_kit_count: u8) -> Self {
        Self {
            selection: Selection::QuantityPerKit,
            quantity_per_kit: WrappingValue::new(max_quantity_per_kit),
            kit_count: WrappingValue::new(max_kit_count),
            progress_percent: 0,
            run: RunMachine::new(),
            switch_held: false,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn quantity_per_kit(&self) -> u8 {
        self.quantity_per_kit.get()
    }

    pub fn kit_count(&self) -> u8 {
        self.kit_count.get()
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn run_status(&self) -> RunStatus {
        self.run.status()
    }

    pub fn pre_pause_status(&self) -> RunStatus {
        self.run.pre_pause()
    }

    /// Progress to publish: `Some` only while running.
    pub fn published_progress(&self) -> Option<u8> {
        self.run_status().is_running().then_some(self.progress_percent)
    }
}
