//! Integration tests for the InteractionController → ports pipeline.
//!
//! Drives the controller tick by tick with mock inputs and checks the
//! resulting machine state, draw calls, mirror updates and listener calls.

use std::cell::RefCell;
use std::rc::Rc;

use super::mock_hw::{DrawCall, MockInputs, RecordingSink, RecordingUi};

use resistor_cutter::app::events::AppEvent;
use resistor_cutter::app::service::InteractionController;
use resistor_cutter::config::CutterConfig;
use resistor_cutter::fsm::context::Selection;
use resistor_cutter::fsm::RunStatus;

struct Rig {
    ctl: InteractionController,
    inputs: MockInputs,
    ui: RecordingUi,
    sink: RecordingSink,
    calls: Rc<RefCell<Vec<RunStatus>>>,
}

impl Rig {
    /// Booted, interlock settled closed, output history cleared.
    fn new() -> Self {
        let mut inputs = MockInputs::new();
        let id = inputs.subscribe();
        let mut ctl = InteractionController::new(&CutterConfig::default(), id);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&calls);
        ctl.set_button_listener(move |s: RunStatus| seen.borrow_mut().push(s));

        let mut rig = Self {
            ctl,
            inputs,
            ui: RecordingUi::new(),
            sink: RecordingSink::new(),
            calls,
        };
        rig.ctl.start(&mut rig.ui, &mut rig.sink);
        rig.tick(0);
        rig.ui.clear();
        rig.sink.events.clear();
        rig
    }

    fn tick(&mut self, now_ms: u32) {
        self.tick_with(now_ms, None);
    }

    fn tick_with(&mut self, now_ms: u32, progress: Option<u8>) {
        self.ctl
            .tick(now_ms, progress, &mut self.inputs, &mut self.ui, &mut self.sink);
    }

    /// Move to START/STOP and press, releasing everything afterwards.
    fn start_run(&mut self, now_ms: u32) {
        self.inputs.up();
        self.tick(now_ms);
        self.inputs.press();
        self.tick(now_ms + 1);
        self.inputs.centre();
        self.tick(now_ms + 2);
        assert_eq!(self.ctl.run_status(), RunStatus::Running);
    }

    fn listener_calls(&self) -> Vec<RunStatus> {
        self.calls.borrow().clone()
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_renders_every_region_and_mirrors() {
    let mut inputs = MockInputs::new();
    let id = inputs.subscribe();
    let mut ctl = InteractionController::new(&CutterConfig::default(), id);
    let mut ui = RecordingUi::new();
    let mut sink = RecordingSink::new();

    ctl.start(&mut ui, &mut sink);

    assert_eq!(
        ui.draws,
        vec![
            DrawCall::QuantityPerKit { value: 1, highlighted: true, running: false },
            DrawCall::KitCount { value: 1, highlighted: false, running: false },
            DrawCall::Progress { percent: 0, visible: false },
            DrawCall::StartStop { highlighted: false, running: false },
        ]
    );
    assert_eq!(ui.mirrors.len(), 1);
    assert_eq!(ui.mirrors[0].percent, None);
    assert_eq!(sink.events, vec![AppEvent::Started(RunStatus::Idle)]);
}

// ── Menu navigation ───────────────────────────────────────────

#[test]
fn held_vertical_input_repeats_after_interval() {
    let mut rig = Rig::new();

    rig.inputs.down();
    rig.tick(0);
    assert_eq!(rig.ctl.state().selection(), Selection::KitCount);

    rig.tick(100);
    assert_eq!(rig.ctl.state().selection(), Selection::KitCount, "inside the 500 ms window");

    rig.tick(600);
    assert_eq!(rig.ctl.state().selection(), Selection::StartStop);
}

#[test]
fn centring_the_stick_rearms_immediately() {
    let mut rig = Rig::new();

    rig.inputs.down();
    rig.tick(1_000);
    rig.inputs.centre();
    rig.tick(1_020);
    rig.inputs.down();
    rig.tick(1_040);

    assert_eq!(rig.ctl.state().selection(), Selection::StartStop);
}

#[test]
fn selection_cycles_through_three_items() {
    let mut rig = Rig::new();
    let mut seen = Vec::new();
    for i in 0..4 {
        rig.inputs.down();
        rig.tick(i * 1_000);
        seen.push(rig.ctl.state().selection());
    }
    assert_eq!(
        seen,
        vec![
            Selection::KitCount,
            Selection::StartStop,
            Selection::QuantityPerKit,
            Selection::KitCount
        ]
    );

    rig.inputs.up();
    rig.tick(10_000);
    assert_eq!(rig.ctl.state().selection(), Selection::QuantityPerKit);
}

#[test]
fn horizontal_repeat_is_faster_than_vertical() {
    let mut rig = Rig::new();

    rig.inputs.right();
    rig.tick(0);
    rig.tick(200);
    assert_eq!(rig.ctl.quantity_per_kit(), 2);
    rig.tick(250);
    assert_eq!(rig.ctl.quantity_per_kit(), 3);
}

#[test]
fn vertical_wins_over_horizontal() {
    let mut rig = Rig::new();
    rig.inputs.stick.down = true;
    rig.inputs.stick.right = true;
    rig.tick(0);

    assert_eq!(rig.ctl.state().selection(), Selection::KitCount);
    assert_eq!(rig.ctl.quantity_per_kit(), 1);
}

#[test]
fn values_wrap_at_both_ends() {
    let mut rig = Rig::new();

    rig.inputs.left();
    rig.tick(0);
    assert_eq!(rig.ctl.quantity_per_kit(), 10);
    rig.inputs.centre();
    rig.tick(10);
    rig.inputs.right();
    rig.tick(20);
    assert_eq!(rig.ctl.quantity_per_kit(), 1);

    rig.inputs.down();
    rig.tick(1_000);
    rig.inputs.left();
    rig.tick(2_000);
    assert_eq!(rig.ctl.kit_count(), 50);
    rig.inputs.centre();
    rig.tick(2_010);
    rig.inputs.right();
    rig.tick(2_020);
    assert_eq!(rig.ctl.kit_count(), 1);
}

#[test]
fn horizontal_on_start_stop_changes_nothing() {
    let mut rig = Rig::new();
    rig.inputs.up();
    rig.tick(0);
    assert_eq!(rig.ctl.state().selection(), Selection::StartStop);

    rig.inputs.right();
    rig.tick(1_000);
    assert_eq!(rig.ctl.quantity_per_kit(), 1);
    assert_eq!(rig.ctl.kit_count(), 1);
    assert!(!rig.sink.events.iter().any(|e| matches!(e, AppEvent::ValueChanged { .. })));
}

#[test]
fn accepted_edit_redraws_in_order_then_mirrors() {
    let mut rig = Rig::new();
    rig.inputs.right();
    rig.tick(0);

    assert_eq!(
        rig.ui.draws,
        vec![
            DrawCall::QuantityPerKit { value: 2, highlighted: true, running: false },
            DrawCall::KitCount { value: 1, highlighted: false, running: false },
            DrawCall::Progress { percent: 0, visible: false },
            DrawCall::StartStop { highlighted: false, running: false },
        ]
    );
    assert_eq!(rig.ui.mirrors.len(), 1);
    assert_eq!(rig.ui.last_mirror().unwrap().quantity_per_kit, 2);
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::ValueChanged { field: Selection::QuantityPerKit, value: 2 }]
    );
}

#[test]
fn rejected_input_draws_nothing() {
    let mut rig = Rig::new();
    rig.inputs.down();
    rig.tick(0);
    rig.ui.clear();

    rig.tick(100);
    assert!(rig.ui.draws.is_empty());
    assert!(rig.ui.mirrors.is_empty());
}

// ── Start / stop ──────────────────────────────────────────────

#[test]
fn button_on_start_stop_starts_run_and_calls_listener() {
    let mut rig = Rig::new();
    rig.inputs.up();
    rig.tick(0);
    rig.ui.clear();

    rig.inputs.press();
    rig.tick(10);

    assert_eq!(rig.ctl.run_status(), RunStatus::Running);
    assert_eq!(rig.listener_calls(), vec![RunStatus::Running]);
    assert!(rig.ui.draws.contains(&DrawCall::Progress { percent: 0, visible: true }));
    assert!(rig.ui.draws.contains(&DrawCall::StartStop { highlighted: true, running: true }));
    assert_eq!(rig.ui.last_mirror().unwrap().percent, Some(0));
}

#[test]
fn held_button_toggles_once() {
    let mut rig = Rig::new();
    rig.inputs.up();
    rig.tick(0);
    rig.inputs.press();
    for t in 10..20 {
        rig.tick(t);
    }
    assert_eq!(rig.ctl.run_status(), RunStatus::Running);
    assert_eq!(rig.listener_calls().len(), 1);

    rig.inputs.centre();
    rig.tick(30);
    rig.inputs.press();
    rig.tick(40);
    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
    assert_eq!(rig.listener_calls(), vec![RunStatus::Running, RunStatus::Idle]);
}

#[test]
fn button_elsewhere_in_menu_does_nothing() {
    let mut rig = Rig::new();
    rig.inputs.press();
    rig.tick(0);
    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
    assert!(rig.listener_calls().is_empty());

    // Still held after scrolling onto START/STOP: no new edge.
    rig.inputs.stick.up = true;
    rig.tick(10);
    assert_eq!(rig.ctl.state().selection(), Selection::StartStop);
    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
}

#[test]
fn menu_is_locked_while_running() {
    let mut rig = Rig::new();
    rig.start_run(0);
    let selection = rig.ctl.state().selection();

    rig.inputs.right();
    rig.tick(1_000);
    rig.inputs.down();
    rig.tick(2_000);

    assert_eq!(rig.ctl.quantity_per_kit(), 1);
    assert_eq!(rig.ctl.state().selection(), selection);
}

// ── Progress ──────────────────────────────────────────────────

#[test]
fn running_tick_always_redraws_progress() {
    let mut rig = Rig::new();
    rig.start_run(0);
    rig.ui.clear();

    rig.tick_with(100, Some(35));
    rig.tick(120);

    assert_eq!(
        rig.ui.draws,
        vec![
            DrawCall::Progress { percent: 35, visible: true },
            DrawCall::Progress { percent: 35, visible: true },
        ]
    );
    assert_eq!(rig.ui.mirrors.len(), 1, "mirror only on change");
    assert_eq!(rig.ui.last_mirror().unwrap().percent, Some(35));
}

#[test]
fn progress_above_100_is_clamped() {
    let mut rig = Rig::new();
    rig.start_run(0);
    rig.tick_with(100, Some(180));
    assert_eq!(rig.ctl.state().progress_percent(), 100);
}

#[test]
fn idle_ignores_progress() {
    let mut rig = Rig::new();
    rig.tick_with(100, Some(50));
    assert_eq!(rig.ctl.state().progress_percent(), 0);
    assert!(rig.ui.draws.is_empty());
}

// ── Safety pause ──────────────────────────────────────────────

#[test]
fn pause_and_resume_preserves_progress() {
    let mut rig = Rig::new();
    rig.start_run(0);
    rig.tick_with(100, Some(40));

    rig.inputs.tripped = true;
    rig.tick(200);
    assert_eq!(rig.ctl.run_status(), RunStatus::Paused);
    assert_eq!(rig.ctl.state().pre_pause_status(), RunStatus::Running);
    assert_eq!(rig.ui.draws.last(), Some(&DrawCall::Paused));
    assert_eq!(rig.ui.last_mirror().unwrap().run_status, RunStatus::Paused);

    rig.inputs.tripped = false;
    rig.tick(300);
    assert_eq!(rig.ctl.run_status(), RunStatus::Running);
    assert_eq!(rig.ctl.state().progress_percent(), 40);
    assert_eq!(rig.listener_calls(), vec![RunStatus::Running], "interlock never calls the listener");
}

#[test]
fn pause_from_idle_returns_to_idle() {
    let mut rig = Rig::new();
    rig.inputs.tripped = true;
    rig.tick(0);
    assert_eq!(rig.ctl.run_status(), RunStatus::Paused);

    rig.inputs.tripped = false;
    rig.tick(10);
    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
}

#[test]
fn paused_machine_ignores_inputs_and_progress() {
    let mut rig = Rig::new();
    rig.inputs.tripped = true;
    rig.tick(0);
    rig.ui.clear();

    rig.inputs.right();
    rig.tick_with(1_000, Some(50));
    assert_eq!(rig.ctl.quantity_per_kit(), 1);
    assert!(rig.ui.draws.is_empty());
}

#[test]
fn button_held_through_pause_does_not_fire_on_release() {
    let mut rig = Rig::new();
    rig.inputs.up();
    rig.tick(0);
    rig.inputs.centre();
    rig.tick(10);

    rig.inputs.tripped = true;
    rig.tick(20);
    rig.inputs.press();
    rig.tick(30);
    rig.inputs.tripped = false;
    rig.tick(40);

    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
    assert!(rig.listener_calls().is_empty());
}

#[test]
fn trip_is_edge_triggered() {
    let mut rig = Rig::new();
    rig.inputs.tripped = true;
    rig.tick(0);
    let paused_events = rig.sink.events.len();
    rig.tick(10);
    rig.tick(20);
    assert_eq!(rig.sink.events.len(), paused_events);
}

// ── Completion ────────────────────────────────────────────────

#[test]
fn done_running_returns_to_idle_without_listener() {
    let mut rig = Rig::new();
    rig.start_run(0);
    rig.tick_with(100, Some(90));
    rig.ui.clear();

    rig.ctl.done_running(&mut rig.ui, &mut rig.sink);

    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
    assert_eq!(rig.ctl.state().progress_percent(), 0);
    assert_eq!(rig.listener_calls(), vec![RunStatus::Running]);
    assert_eq!(rig.ui.last_mirror().unwrap().run_status, RunStatus::Idle);
    assert!(rig.sink.events.contains(&AppEvent::RunCompleted { while_paused: false }));
}

#[test]
fn finished_while_paused_does_not_resume() {
    let mut rig = Rig::new();
    rig.start_run(0);
    rig.inputs.tripped = true;
    rig.tick(100);

    rig.ctl.done_running(&mut rig.ui, &mut rig.sink);
    assert_eq!(rig.ctl.run_status(), RunStatus::Paused);
    assert_eq!(rig.ctl.state().pre_pause_status(), RunStatus::Idle);

    rig.inputs.tripped = false;
    rig.tick(200);
    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
    assert!(rig.sink.events.contains(&AppEvent::RunCompleted { while_paused: true }));
}

#[test]
fn done_running_twice_is_harmless() {
    let mut rig = Rig::new();
    rig.start_run(0);
    rig.ctl.done_running(&mut rig.ui, &mut rig.sink);
    rig.ui.clear();
    rig.ctl.done_running(&mut rig.ui, &mut rig.sink);
    assert_eq!(rig.ctl.run_status(), RunStatus::Idle);
    assert!(rig.ui.draws.is_empty());
}
