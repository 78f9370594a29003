//! Controller driving the real LCD and status-page adapters.
//!
//! The LCD flushes into a counting panel; the status page is read back the
//! way the HTTP handler reads it.

use super::mock_hw::{MockInputs, RecordingSink};

use resistor_cutter::adapters::display::LcdDisplay;
use resistor_cutter::adapters::frontend::Frontend;
use resistor_cutter::adapters::status_page::StatusPage;
use resistor_cutter::app::service::InteractionController;
use resistor_cutter::config::CutterConfig;
use resistor_cutter::drivers::pcd8544::{FrameBuffer, FrameFlush};
use resistor_cutter::error::DisplayError;
use resistor_cutter::fsm::RunStatus;

#[derive(Default)]
struct CountingPanel {
    flushes: usize,
}

impl FrameFlush for CountingPanel {
    fn flush(&mut self, _frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.flushes += 1;
        Ok(())
    }
}

type Ui = Frontend<LcdDisplay<CountingPanel>, StatusPage>;

fn boot() -> (InteractionController, MockInputs, Ui, StatusPage, RecordingSink) {
    let mut inputs = MockInputs::new();
    let id = inputs.subscribe();
    let mut ctl = InteractionController::new(&CutterConfig::default(), id);
    let page = StatusPage::new();
    let mut ui = Frontend::new(LcdDisplay::new(CountingPanel::default()), page.clone());
    let mut sink = RecordingSink::new();
    ctl.start(&mut ui, &mut sink);
    ctl.tick(0, None, &mut inputs, &mut ui, &mut sink);
    (ctl, inputs, ui, page, sink)
}

#[test]
fn boot_paints_menu_and_publishes_status() {
    let (_ctl, _inputs, ui, page, _sink) = boot();

    // Quantity field highlighted: filled value box.
    assert!(ui.render.frame().pixel(64, 0));
    assert!(ui.render.frame().pixel(65, 1));
    // Start button outlined, not filled.
    assert!(ui.render.frame().pixel(25, 37));
    assert!(!ui.render.frame().pixel(26, 38));
    assert!(ui.render.panel().flushes >= 4);

    assert_eq!(
        page.json(),
        r#"{"resistorsPerKit":1,"kits":1,"runningClass":"notCutting","runningText":"Not Cutting"}"#
    );
}

#[test]
fn running_shows_progress_on_lcd_and_page() {
    let (mut ctl, mut inputs, mut ui, page, mut sink) = boot();
    inputs.up();
    ctl.tick(0, None, &mut inputs, &mut ui, &mut sink);
    inputs.press();
    ctl.tick(10, None, &mut inputs, &mut ui, &mut sink);
    inputs.centre();
    ctl.tick(20, Some(100), &mut inputs, &mut ui, &mut sink);

    assert_eq!(page.latest().run_status, RunStatus::Running);
    assert!(page.json().contains(r#""progress":100"#));
    assert!(page.main_html().contains("<h2>100%</h2>"));
    // Bar interior inverted at 100 %.
    assert!(ui.render.frame().pixel(6, 26));
    // Value boxes hidden while running.
    assert!(!ui.render.frame().pixel(64, 0));
}

#[test]
fn interlock_trip_shows_overlay_and_paused_page() {
    let (mut ctl, mut inputs, mut ui, page, mut sink) = boot();
    inputs.tripped = true;
    ctl.tick(10, None, &mut inputs, &mut ui, &mut sink);

    assert!(ui.render.frame().pixel(0, 15), "rule under PAUSED");
    assert!(!ui.render.frame().pixel(57, 47), "button cleared");
    assert!(page.main_html().contains("row paused"));
    assert!(!page.json().contains("progress"));
}
