//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART in production).  One line per event, tagged
//! with a fixed prefix so a serial capture can be grepped by kind.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(status) => {
                info!("START | initial_status={:?}", status);
            }
            AppEvent::RunStatusChanged { from, to, trigger } => {
                info!("RUN | {:?} -> {:?} | trigger={:?}", from, to, trigger);
            }
            AppEvent::SelectionChanged(sel) => {
                info!("MENU | selection={:?}", sel);
            }
            AppEvent::ValueChanged { field, value } => {
                info!("MENU | {:?}={}", field, value);
            }
            AppEvent::InterlockChanged { tripped: true } => {
                warn!("SAFETY | interlock tripped");
            }
            AppEvent::InterlockChanged { tripped: false } => {
                info!("SAFETY | interlock released");
            }
            AppEvent::RunCompleted { while_paused } => {
                info!("DONE | run complete | while_paused={}", while_paused);
            }
        }
    }
}
