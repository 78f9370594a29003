//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ InteractionController (domain)
//! ```
//!
//! Driven adapters (joystick, interlock, LCD, status page, event sinks)
//! implement these traits.  The
//! [`InteractionController`](super::service::InteractionController) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::fsm::RunStatus;
use crate::safety::SubscriberId;

use super::menu::JoystickReading;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the controller samples operator inputs through this.
pub trait InputPort {
    /// Classified joystick sample (directions plus push switch).
    fn joystick(&mut self) -> JoystickReading;

    /// `Some(tripped)` when the interlock level changed since `subscriber`
    /// last asked, `None` otherwise.  The first call for a subscriber always
    /// reports the current level.
    fn interlock_changed(&mut self, subscriber: SubscriberId) -> Option<bool>;
}

// ───────────────────────────────────────────────────────────────
// Render port (driven adapter: domain → display)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the local display.
///
/// Each region call is idempotent and touches only its own area.  A full
/// refresh calls the four regions in declaration order; the paused overlay
/// replaces all of them.
pub trait RenderPort {
    /// Resistors-per-kit field.
    fn draw_quantity_per_kit(&mut self, value: u8, highlighted: bool, running: bool);

    /// Kit-count field.
    fn draw_kit_count(&mut self, value: u8, highlighted: bool, running: bool);

    /// Progress bar.  Draws nothing unless `visible`.
    fn draw_progress(&mut self, percent: u8, visible: bool);

    /// Start/stop button.
    fn draw_start_stop(&mut self, highlighted: bool, running: bool);

    /// Full-screen paused overlay.
    fn draw_paused(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Status mirror port (driven adapter: domain → network page)
// ───────────────────────────────────────────────────────────────

/// Values republished to the remote status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub quantity_per_kit: u8,
    pub kit_count: u8,
    pub run_status: RunStatus,
    /// Present only while running.
    pub percent: Option<u8>,
}

/// Stores the latest state for network pollers.  Owns no timing logic.
pub trait StatusMirrorPort {
    fn update_status(&mut self, status: &StatusUpdate);
}

// ───────────────────────────────────────────────────────────────
// Run-state listener (driven adapter: domain → cutting sequencer)
// ───────────────────────────────────────────────────────────────

/// Receives user-driven run-state changes.
///
/// Invoked synchronously, after state, display and mirror already reflect
/// `status`.  Must return quickly: it delays the next tick.
pub trait RunStateListener {
    fn on_run_state_change(&mut self, status: RunStatus);
}

impl<F: FnMut(RunStatus)> RunStateListener for F {
    fn on_run_state_change(&mut self, status: RunStatus) {
        self(status)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
