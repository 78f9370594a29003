//! Mock adapters for integration tests.
//!
//! Records every render and mirror call so tests can assert on the full
//! output history without an LCD or a network stack.

use resistor_cutter::app::events::AppEvent;
use resistor_cutter::app::menu::JoystickReading;
use resistor_cutter::app::ports::{EventSink, InputPort, RenderPort, StatusMirrorPort, StatusUpdate};
use resistor_cutter::safety::{InterlockMonitor, SubscriberId};

// ── MockInputs ────────────────────────────────────────────────

/// Joystick and interlock levels set directly by the test.
pub struct MockInputs {
    pub stick: JoystickReading,
    pub tripped: bool,
    monitor: InterlockMonitor,
}

#[allow(dead_code)]
impl MockInputs {
    pub fn new() -> Self {
        Self {
            stick: JoystickReading::default(),
            tripped: false,
            monitor: InterlockMonitor::new(),
        }
    }

    pub fn subscribe(&mut self) -> SubscriberId {
        self.monitor.subscribe().unwrap()
    }

    pub fn centre(&mut self) {
        self.stick = JoystickReading::default();
    }

    pub fn up(&mut self) {
        self.stick = JoystickReading { up: true, ..Default::default() };
    }

    pub fn down(&mut self) {
        self.stick = JoystickReading { down: true, ..Default::default() };
    }

    pub fn left(&mut self) {
        self.stick = JoystickReading { left: true, ..Default::default() };
    }

    pub fn right(&mut self) {
        self.stick = JoystickReading { right: true, ..Default::default() };
    }

    pub fn press(&mut self) {
        self.stick = JoystickReading { pressed: true, ..Default::default() };
    }
}

impl InputPort for MockInputs {
    fn joystick(&mut self) -> JoystickReading {
        self.stick
    }

    fn interlock_changed(&mut self, subscriber: SubscriberId) -> Option<bool> {
        self.monitor.poll(subscriber, self.tripped)
    }
}

// ── Render call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    QuantityPerKit { value: u8, highlighted: bool, running: bool },
    KitCount { value: u8, highlighted: bool, running: bool },
    Progress { percent: u8, visible: bool },
    StartStop { highlighted: bool, running: bool },
    Paused,
}

// ── RecordingUi ───────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingUi {
    pub draws: Vec<DrawCall>,
    pub mirrors: Vec<StatusUpdate>,
}

#[allow(dead_code)]
impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.draws.clear();
        self.mirrors.clear();
    }

    pub fn last_mirror(&self) -> Option<&StatusUpdate> {
        self.mirrors.last()
    }
}

impl RenderPort for RecordingUi {
    fn draw_quantity_per_kit(&mut self, value: u8, highlighted: bool, running: bool) {
        self.draws.push(DrawCall::QuantityPerKit { value, highlighted, running });
    }

    fn draw_kit_count(&mut self, value: u8, highlighted: bool, running: bool) {
        self.draws.push(DrawCall::KitCount { value, highlighted, running });
    }

    fn draw_progress(&mut self, percent: u8, visible: bool) {
        self.draws.push(DrawCall::Progress { percent, visible });
    }

    fn draw_start_stop(&mut self, highlighted: bool, running: bool) {
        self.draws.push(DrawCall::StartStop { highlighted, running });
    }

    fn draw_paused(&mut self) {
        self.draws.push(DrawCall::Paused);
    }
}

impl StatusMirrorPort for RecordingUi {
    fn update_status(&mut self, status: &StatusUpdate) {
        self.mirrors.push(*status);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
