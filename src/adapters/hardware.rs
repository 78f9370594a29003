//! Hardware adapter: bridges the input peripherals to [`InputPort`].
//!
//! Owns the joystick driver, the interlock input and the
//! [`InterlockMonitor`] that turns the interlock level into per-subscriber
//! edges.  On non-espidf targets the drivers use their simulation stubs.

use crate::app::menu::JoystickReading;
use crate::app::ports::InputPort;
use crate::drivers::interlock::InterlockInput;
use crate::drivers::joystick::JoystickDriver;
use crate::error::Error;
use crate::safety::{InterlockMonitor, SubscriberId};

/// Concrete adapter over the joystick and safety interlock.
pub struct HardwareInputs {
    joystick: JoystickDriver,
    interlock: InterlockInput,
    monitor: InterlockMonitor,
}

impl HardwareInputs {
    pub fn new(joystick: JoystickDriver, interlock: InterlockInput) -> Self {
        Self {
            joystick,
            interlock,
            monitor: InterlockMonitor::new(),
        }
    }

    /// Register another consumer of interlock edges (controller, sequencer).
    pub fn subscribe_interlock(&mut self) -> Result<SubscriberId, Error> {
        self.monitor.subscribe()
    }

    /// Current interlock pin level, independent of any subscriber.
    pub fn interlock_tripped(&self) -> bool {
        self.interlock.level()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareInputs {
    fn joystick(&mut self) -> JoystickReading {
        self.joystick.read()
    }

    fn interlock_changed(&mut self, subscriber: SubscriberId) -> Option<bool> {
        let tripped = self.interlock.tripped();
        self.monitor.poll(subscriber, tripped)
    }
}
