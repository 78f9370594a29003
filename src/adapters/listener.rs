//! Run-state handoff to a cutting sequencer running in another task.
//!
//! Uses an `embassy-sync` bounded channel so the sequencer can await
//! changes while the controller loop stays synchronous.  The return path
//! is two atomics the loop drains once per tick.
//!
//! ```text
//! ┌──────────────┐  RunStatus  ┌──────────────────┐
//! │ Control loop │────────────▶│ Cutting sequencer │
//! │  (sync)      │◀────────────│  (async)          │
//! └──────────────┘ progress,   └──────────────────┘
//!                  done
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::ports::RunStateListener;
use crate::fsm::RunStatus;

/// Pending run-state changes the sequencer has not consumed yet.
pub const RUN_STATE_DEPTH: usize = 4;

pub type RunStateChannel = Channel<CriticalSectionRawMutex, RunStatus, RUN_STATE_DEPTH>;

/// Control loop → sequencer.  Fed by [`ChannelListener`]; consumed through a
/// [`SequencerLink`].  `main` drains it while no sequencer task is attached.
pub static RUN_STATE_CHANNEL: RunStateChannel = Channel::new();

/// Listener that forwards into a channel without blocking the tick.
pub struct ChannelListener {
    channel: &'static RunStateChannel,
    dropped: u32,
}

impl ChannelListener {
    pub fn new(channel: &'static RunStateChannel) -> Self {
        Self { channel, dropped: 0 }
    }

    /// Changes lost because the channel was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl RunStateListener for ChannelListener {
    fn on_run_state_change(&mut self, status: RunStatus) {
        if self.channel.try_send(status).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("Run-state channel full, dropped {:?} ({} total)", status, self.dropped);
        }
    }
}

// ── Sequencer → loop ──────────────────────────────────────────

/// Sentinel for "no new progress since the last take".
const NO_PROGRESS: u8 = u8::MAX;

/// Latest progress published by the sequencer.
pub struct SequencerFeedback {
    progress: AtomicU8,
    done: AtomicBool,
}

impl SequencerFeedback {
    pub const fn new() -> Self {
        Self {
            progress: AtomicU8::new(NO_PROGRESS),
            done: AtomicBool::new(false),
        }
    }

    /// Sequencer side: publish a percentage (values above 100 are clamped).
    pub fn report_progress(&self, percent: u8) {
        self.progress.store(percent.min(100), Ordering::Release);
    }

    /// Sequencer side: the run finished on its own.
    pub fn report_done(&self) {
        self.done.store(true, Ordering::Release);
    }

    /// Loop side: progress reported since the previous call, if any.
    pub fn take_progress(&self) -> Option<u8> {
        match self.progress.swap(NO_PROGRESS, Ordering::AcqRel) {
            NO_PROGRESS => None,
            p => Some(p),
        }
    }

    /// Loop side: whether a completion is pending; clears it.
    pub fn take_done(&self) -> bool {
        self.done.swap(false, Ordering::AcqRel)
    }
}

impl Default for SequencerFeedback {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequencer → control loop.
pub static SEQUENCER_FEEDBACK: SequencerFeedback = SequencerFeedback::new();

// ── Sequencer endpoint ────────────────────────────────────────

/// Everything a cutting sequencer task needs: the run-state changes it
/// must act on and the feedback path into the control loop.
#[derive(Clone, Copy)]
pub struct SequencerLink {
    run_states: &'static RunStateChannel,
    feedback: &'static SequencerFeedback,
}

impl SequencerLink {
    /// Link over the firmware-wide channel and feedback.
    pub fn new() -> Self {
        Self::with(&RUN_STATE_CHANNEL, &SEQUENCER_FEEDBACK)
    }

    pub fn with(run_states: &'static RunStateChannel, feedback: &'static SequencerFeedback) -> Self {
        Self { run_states, feedback }
    }

    /// Next pending run-state change, without waiting.
    pub fn try_next(&self) -> Option<RunStatus> {
        self.run_states.try_receive().ok()
    }

    /// Wait for the next run-state change.
    pub async fn next(&self) -> RunStatus {
        self.run_states.receive().await
    }

    pub fn report_progress(&self, percent: u8) {
        self.feedback.report_progress(percent);
    }

    pub fn report_done(&self) {
        self.feedback.report_done();
    }
}

impl Default for SequencerLink {
    fn default() -> Self {
        Self::new()
    }
}
