//! Outbound application events.
//!
//! The [`InteractionController`](super::service::InteractionController)
//! emits these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::fsm::context::Selection;
use crate::fsm::{RunStatus, RunTrigger};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started (carries initial status).
    Started(RunStatus),

    /// The run status moved.
    RunStatusChanged {
        from: RunStatus,
        to: RunStatus,
        trigger: RunTrigger,
    },

    /// The menu cursor moved.
    SelectionChanged(Selection),

    /// A job parameter was edited.
    ValueChanged { field: Selection, value: u8 },

    /// The safety interlock changed level.
    InterlockChanged { tripped: bool },

    /// The cutting sequencer reported a finished job.
    /// `while_paused` means the pending resume was cancelled instead.
    RunCompleted { while_paused: bool },
}
