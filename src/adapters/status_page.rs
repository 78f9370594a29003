//! Network status mirror.
//!
//! Implements [`StatusMirrorPort`] by storing the controller's latest
//! [`StatusUpdate`] behind a shared handle.  HTTP handlers run in the
//! server's own task and read through a clone of the same handle, so the
//! store is a `std::sync::Mutex`.  The mirror owns no timing logic: it only
//! answers whatever was last published.

use std::sync::{Arc, Mutex};

use crate::app::ports::{StatusMirrorPort, StatusUpdate};
use crate::fsm::RunStatus;
use crate::portal::pages::{self, StatusSnapshot};

/// Clonable handle over the latest published status.
#[derive(Clone)]
pub struct StatusPage {
    latest: Arc<Mutex<StatusUpdate>>,
}

impl Default for StatusPage {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPage {
    /// Starts with the power-on values so early pollers see something sane.
    pub fn new() -> Self {
        Self {
            latest: Arc::new(Mutex::new(StatusUpdate {
                quantity_per_kit: 1,
                kit_count: 1,
                run_status: RunStatus::Idle,
                percent: None,
            })),
        }
    }

    /// Latest published values.
    pub fn latest(&self) -> StatusUpdate {
        // A poisoned lock still holds a complete `Copy` value.
        *self.latest.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::from(&self.latest())
    }

    /// Status page HTML with the latest values filled in.
    pub fn main_html(&self) -> String {
        pages::render_main(&self.snapshot())
    }

    /// Latest values as JSON.
    pub fn json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| String::from("{}"))
    }
}

impl StatusMirrorPort for StatusPage {
    fn update_status(&mut self, status: &StatusUpdate) {
        let mut latest = self.latest.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *latest = *status;
    }
}
