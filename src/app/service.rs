//! Interaction controller — the hexagonal core.
//!
//! [`InteractionController`] owns the [`MachineState`], the run-state
//! machine and the held-input repeat gate.  It is the only component allowed
//! to move the run status.  All I/O flows through port traits injected at
//! call sites, making the controller testable with mock adapters.
//!
//! ```text
//!    InputPort ──▶ ┌──────────────────────────┐ ──▶ RenderPort
//!                  │  InteractionController    │ ──▶ StatusMirrorPort
//!    EventSink ◀── │  RunMachine · RepeatGate  │ ──▶ RunStateListener
//!                  └──────────────────────────┘
//! ```
//!
//! Every state-mutating path ends with the same notification step: redraw,
//! then mirror, then (for user-driven run changes only) the listener.

use log::{debug, info, warn};

use crate::config::CutterConfig;
use crate::fsm::context::{MachineState, Selection};
use crate::fsm::{RunStatus, RunTrigger, Transition};
use crate::safety::SubscriberId;

use super::events::AppEvent;
use super::menu::{move_selection, MenuAction, RepeatGate};
use super::ports::{EventSink, InputPort, RenderPort, RunStateListener, StatusMirrorPort, StatusUpdate};

// ───────────────────────────────────────────────────────────────
// InteractionController
// ───────────────────────────────────────────────────────────────

/// Single authority over the machine state.
pub struct InteractionController {
    state: MachineState,
    gate: RepeatGate,
    vertical_repeat_ms: u32,
    horizontal_repeat_ms: u32,
    /// Our slot on the shared interlock publisher.
    interlock: SubscriberId,
    listener: Option<Box<dyn RunStateListener>>,
}

impl InteractionController {
    /// Power-on controller.  Does **not** draw anything; call [`start`] next.
    ///
    /// [`start`]: Self::start
    pub fn new(config: &CutterConfig, interlock: SubscriberId) -> Self {
        Self {
            state: MachineState::new(config.menu.max_quantity_per_kit, config.menu.max_kit_count),
            gate: RepeatGate::new(),
            vertical_repeat_ms: config.menu.vertical_repeat_ms,
            horizontal_repeat_ms: config.menu.horizontal_repeat_ms,
            interlock,
            listener: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initial full render and mirror.
    pub fn start(&mut self, ui: &mut (impl RenderPort + StatusMirrorPort), sink: &mut impl EventSink) {
        self.notify(ui);
        sink.emit(&AppEvent::Started(self.state.run_status()));
        info!("InteractionController started in {:?}", self.state.run_status());
    }

    /// Register the run-state listener, replacing any previous one.
    pub fn set_button_listener(&mut self, listener: impl RunStateListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cycle: interlock → pause gate → menu or progress → button.
    ///
    /// `progress` is the sequencer's latest percentage, if it has one.
    pub fn tick(
        &mut self,
        now_ms: u32,
        progress: Option<u8>,
        inputs: &mut impl InputPort,
        ui: &mut (impl RenderPort + StatusMirrorPort),
        sink: &mut impl EventSink,
    ) {
        // 1. Safety first, every tick, whatever the state.
        if let Some(tripped) = inputs.interlock_changed(self.interlock) {
            self.set_paused_status(tripped, ui, sink);
        }

        let stick = inputs.joystick();

        // 2. Nothing else while paused.  The switch latch still follows the
        //    pin so a press held through the pause cannot fire on release.
        if self.state.run_status() == RunStatus::Paused {
            self.state.switch_held = stick.pressed;
            return;
        }

        // 3./4. Menu while idle, progress while running.
        match self.state.run_status() {
            RunStatus::Idle => {
                if let Some(action) = MenuAction::from_reading(&stick) {
                    self.navigate(now_ms, action, ui, sink);
                } else {
                    self.gate.release();
                }
            }
            RunStatus::Running => {
                if let Some(p) = progress {
                    let p = p.min(100);
                    if p != self.state.progress_percent {
                        self.state.progress_percent = p;
                        ui.update_status(&self.status_update());
                    }
                }
                ui.draw_progress(self.state.progress_percent, true);
            }
            RunStatus::Paused => {}
        }

        // 5. Activation edge.
        if stick.pressed {
            if !self.state.switch_held {
                self.state.switch_held = true;
                if self.state.selection == Selection::StartStop {
                    self.toggle_run(ui, sink);
                }
            }
        } else {
            self.state.switch_held = false;
        }
    }

    // ── External transitions ──────────────────────────────────

    /// Safety-interlock transition.  Always redraws and re-mirrors.
    pub fn set_paused_status(
        &mut self,
        paused: bool,
        ui: &mut (impl RenderPort + StatusMirrorPort),
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::InterlockChanged { tripped: paused });

        let trigger = if paused {
            RunTrigger::InterlockTripped
        } else {
            RunTrigger::InterlockReleased
        };
        match self.state.run.apply(trigger) {
            Some(tr) => self.report_transition(tr, trigger, sink),
            None => debug!(
                "Interlock paused={} with status {:?}: no change",
                paused,
                self.state.run_status()
            ),
        }

        self.notify(ui);
    }

    /// The cutting sequencer finished the job on its own.
    ///
    /// No listener call: the sequencer already knows.
    pub fn done_running(&mut self, ui: &mut (impl RenderPort + StatusMirrorPort), sink: &mut impl EventSink) {
        match self.state.run_status() {
            RunStatus::Running => {
                if let Some(tr) = self.state.run.apply(RunTrigger::RunComplete) {
                    self.state.progress_percent = 0;
                    self.report_transition(tr, RunTrigger::RunComplete, sink);
                    self.notify(ui);
                    sink.emit(&AppEvent::RunCompleted { while_paused: false });
                }
            }
            RunStatus::Paused if self.state.pre_pause_status() == RunStatus::Running => {
                self.state.run.apply(RunTrigger::RunComplete);
                self.state.progress_percent = 0;
                warn!("Run completed while paused; will not resume on release");
                sink.emit(&AppEvent::RunCompleted { while_paused: true });
            }
            status => debug!("done_running ignored in {:?}", status),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn quantity_per_kit(&self) -> u8 {
        self.state.quantity_per_kit()
    }

    pub fn kit_count(&self) -> u8 {
        self.state.kit_count()
    }

    pub fn run_status(&self) -> RunStatus {
        self.state.run_status()
    }

    /// Read-only view of everything the controller tracks.
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    // ── Internal ──────────────────────────────────────────────

    fn navigate(
        &mut self,
        now_ms: u32,
        action: MenuAction,
        ui: &mut (impl RenderPort + StatusMirrorPort),
        sink: &mut impl EventSink,
    ) {
        let interval = if action.is_vertical() {
            self.vertical_repeat_ms
        } else {
            self.horizontal_repeat_ms
        };
        if !self.gate.ready(now_ms, interval) {
            return;
        }
        self.gate.accept(now_ms);

        let selection = self.state.selection;
        if action.is_vertical() {
            self.state.selection = move_selection(selection, action);
            debug!("Menu selection -> {:?}", self.state.selection);
            sink.emit(&AppEvent::SelectionChanged(self.state.selection));
        } else {
            let field = match selection {
                Selection::QuantityPerKit => Some(&mut self.state.quantity_per_kit),
                Selection::KitCount => Some(&mut self.state.kit_count),
                Selection::StartStop => None,
            };
            if let Some(field) = field {
                match action {
                    MenuAction::Increment => field.increment(),
                    _ => field.decrement(),
                }
                let value = field.get();
                debug!("Menu {:?} -> {}", selection, value);
                sink.emit(&AppEvent::ValueChanged { field: selection, value });
            }
        }

        self.notify(ui);
    }

    fn toggle_run(&mut self, ui: &mut (impl RenderPort + StatusMirrorPort), sink: &mut impl EventSink) {
        let Some(tr) = self.state.run.apply(RunTrigger::StartStop) else {
            return;
        };
        if tr.to == RunStatus::Running {
            self.state.progress_percent = 0;
        }
        self.report_transition(tr, RunTrigger::StartStop, sink);
        self.notify(ui);

        if let Some(listener) = self.listener.as_mut() {
            listener.on_run_state_change(tr.to);
        }
    }

    fn report_transition(&self, tr: Transition, trigger: RunTrigger, sink: &mut impl EventSink) {
        info!("Run status {:?} -> {:?} ({:?})", tr.from, tr.to, trigger);
        sink.emit(&AppEvent::RunStatusChanged {
            from: tr.from,
            to: tr.to,
            trigger,
        });
    }

    /// Full redraw followed by a mirror update.
    fn notify(&self, ui: &mut (impl RenderPort + StatusMirrorPort)) {
        let s = &self.state;
        if s.run_status() == RunStatus::Paused {
            ui.draw_paused();
        } else {
            let running = s.run_status().is_running();
            ui.draw_quantity_per_kit(s.quantity_per_kit(), s.selection == Selection::QuantityPerKit, running);
            ui.draw_kit_count(s.kit_count(), s.selection == Selection::KitCount, running);
            ui.draw_progress(s.progress_percent, running);
            ui.draw_start_stop(s.selection == Selection::StartStop, running);
        }
        ui.update_status(&self.status_update());
    }

    fn status_update(&self) -> StatusUpdate {
        StatusUpdate {
            quantity_per_kit: self.state.quantity_per_kit(),
            kit_count: self.state.kit_count(),
            run_status: self.state.run_status(),
            percent: self.state.published_progress(),
        }
    }
}
