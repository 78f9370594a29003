//! Run-status state machine.
//!
//! ```text
//!            [start/stop]              [interlock tripped]
//!   IDLE ◀──────────────────▶ RUNNING ─────────────────────▶ PAUSED
//!    │      [run complete]       ▲                              │
//!    │                           └──[released, was RUNNING]─────┤
//!    └──────────[interlock tripped]──────────▶ PAUSED ──────────┘
//!                                   [released, was IDLE] → IDLE
//! ```
//!
//! The machine is a sum type plus one remembered prior state, advanced by a
//! single exhaustive transition function, [`RunMachine::apply`].  PAUSED is
//! only reachable through the interlock; the menu can only toggle between
//! IDLE and RUNNING.

pub mod context;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Exactly one of these holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RunStatus {
    #[default]
    Idle = 0,
    Running = 1,
    Paused = 2,
}

impl RunStatus {
    /// CSS class used by the status page.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Idle => "notCutting",
            Self::Running => "cutting",
            Self::Paused => "paused",
        }
    }

    /// Human-readable label used by the status page.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Not Cutting",
            Self::Running => "Cutting",
            Self::Paused => "Paused",
        }
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

// ---------------------------------------------------------------------------
// Triggers and transitions
// ---------------------------------------------------------------------------

/// Everything that can move the run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTrigger {
    /// Activation edge with START/STOP selected.
    StartStop,
    /// Safety interlock opened.
    InterlockTripped,
    /// Safety interlock closed again.
    InterlockReleased,
    /// The cutting sequencer finished the job on its own.
    RunComplete,
}

/// A status change produced by [`RunMachine::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RunStatus,
    pub to: RunStatus,
}

/// Run status plus the status to restore when the interlock releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunMachine {
    status: RunStatus,
    pre_pause: RunStatus,
}

impl RunMachine {
    pub const fn new() -> Self {
        Self {
            status: RunStatus::Idle,
            pre_pause: RunStatus::Idle,
        }
    }

    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Status the machine returns to when the interlock releases.
    /// Only meaningful while paused.
    pub const fn pre_pause(&self) -> RunStatus {
        self.pre_pause
    }

    /// Advance the machine.  Returns the status change, if any.
    ///
    /// `pre_pause` is written on entry to PAUSED and by `RunComplete` while
    /// paused; nothing else touches it.
    pub fn apply(&mut self, trigger: RunTrigger) -> Option<Transition> {
        let from = self.status;
        let to = match (from, trigger) {
            (RunStatus::Idle, RunTrigger::StartStop) => RunStatus::Running,
            (RunStatus::Running, RunTrigger::StartStop | RunTrigger::RunComplete) => RunStatus::Idle,

            (RunStatus::Idle | RunStatus::Running, RunTrigger::InterlockTripped) => {
                self.pre_pause = from;
                RunStatus::Paused
            }
            (RunStatus::Paused, RunTrigger::InterlockReleased) => self.pre_pause,

            // A job that finished while paused must not resume on release.
            (RunStatus::Paused, RunTrigger::RunComplete) => {
                self.pre_pause = RunStatus::Idle;
                return None;
            }

            (RunStatus::Paused, RunTrigger::StartStop | RunTrigger::InterlockTripped)
            | (RunStatus::Idle | RunStatus::Running, RunTrigger::InterlockReleased)
            | (RunStatus::Idle, RunTrigger::RunComplete) => return None,
        };

        self.status = to;
        Some(Transition { from, to })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_trigger() -> impl Strategy<Value = RunTrigger> {
        prop_oneof![
            Just(RunTrigger::StartStop),
            Just(RunTrigger::InterlockTripped),
            Just(RunTrigger::InterlockReleased),
            Just(RunTrigger::RunComplete),
        ]
    }

    proptest! {
        #[test]
        fn paused_only_entered_by_interlock(triggers in proptest::collection::vec(arb_trigger(), 1..100)) {
            let mut m = RunMachine::new();
            for t in triggers {
                if let Some(tr) = m.apply(t) {
                    if tr.to == RunStatus::Paused {
                        prop_assert_eq!(t, RunTrigger::InterlockTripped);
                    }
                    if tr.from == RunStatus::Paused {
                        prop_assert_eq!(t, RunTrigger::InterlockReleased);
                    }
                }
            }
        }

        #[test]
        fn pre_pause_never_paused(triggers in proptest::collection::vec(arb_trigger(), 1..100)) {
            let mut m = RunMachine::new();
            for t in triggers {
                m.apply(t);
                prop_assert_ne!(m.pre_pause(), RunStatus::Paused);
            }
        }

        #[test]
        fn no_direct_idle_running_while_paused(triggers in proptest::collection::vec(arb_trigger(), 1..100)) {
            let mut m = RunMachine::new();
            for t in triggers {
                let before = m;
                m.apply(t);
                if before.status() == RunStatus::Paused && m.status() != RunStatus::Paused {
                    prop_assert_eq!(m.status(), before.pre_pause());
                }
            }
        }
    }
}
