//! Resistor Cutter Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-cadence control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareInputs   LcdDisplay    StatusPage    LogEventSink     │
//! │  (InputPort)      (RenderPort)  (Mirror)      (EventSink)      │
//! │  AccessPoint      ChannelListener (RunStateListener)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          InteractionController (pure logic)            │    │
//! │  │  RunMachine · RepeatGate · Menu                        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  InterlockMonitor (per-subscriber edges) · Watchdog            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::prelude::Peripherals;
use esp_idf_hal::spi::config::Config as SpiConfig;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriverConfig};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use resistor_cutter::adapters::access_point::{AccessPoint, RadioHandles};
use resistor_cutter::adapters::display::LcdDisplay;
use resistor_cutter::adapters::frontend::Frontend;
use resistor_cutter::adapters::hardware::HardwareInputs;
use resistor_cutter::adapters::listener::{ChannelListener, SequencerLink, RUN_STATE_CHANNEL, SEQUENCER_FEEDBACK};
use resistor_cutter::adapters::log_sink::LogEventSink;
use resistor_cutter::adapters::status_page::StatusPage;
use resistor_cutter::adapters::time::UptimeClock;
use resistor_cutter::app::service::InteractionController;
use resistor_cutter::config::CutterConfig;
use resistor_cutter::drivers::interlock::InterlockInput;
use resistor_cutter::drivers::joystick::JoystickDriver;
use resistor_cutter::drivers::pcd8544::Pcd8544;
use resistor_cutter::drivers::{hw_init, watchdog::Watchdog};
use resistor_cutter::error::Error;
use resistor_cutter::pins;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Resistor Cutter v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config (compile-time defaults, validated) ──────────
    let config = CutterConfig::default();
    config.validate().map_err(Error::from)?;

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the joystick ADC or interlock GPIO the machine is unsafe
        // to operate; halt and let the watchdog reset us.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        // The pin is still sampled every tick; only sub-tick openings go unseen.
        warn!("ISR service init failed: {}, interlock sampled per tick only", e);
    }
    let watchdog = Watchdog::new(config.timing.watchdog_timeout_ms);

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take().ok();

    // ── 4. Display ────────────────────────────────────────────
    // GPIO numbers mirror `pins::LCD_*`.
    let spi = SpiDeviceDriver::new_single(
        peripherals.spi2,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
        Option::<AnyIOPin>::None,
        Some(peripherals.pins.gpio0),
        &SpiDriverConfig::new(),
        &SpiConfig::new().baudrate(Hertz(pins::LCD_SPI_FREQ_HZ)),
    )?;
    let dc = PinDriver::output(peripherals.pins.gpio4)?;
    let rst = PinDriver::output(peripherals.pins.gpio2)?;
    let mut panel = Pcd8544::new(spi, dc, rst);
    panel.init(&mut Ets).map_err(Error::from)?;
    info!("LCD: PCD8544 ready");

    // ── 5. Adapters ───────────────────────────────────────────
    let mut inputs = HardwareInputs::new(
        JoystickDriver::new(config.joystick.clone()),
        InterlockInput::new(pins::SAFETY_INTERLOCK_GPIO),
    );
    let status_page = StatusPage::new();
    let mut ui = Frontend::new(LcdDisplay::new(panel), status_page.clone());
    let mut log_sink = LogEventSink::new();
    let clock = UptimeClock::new();

    // ── 6. Controller ─────────────────────────────────────────
    let interlock_slot = inputs.subscribe_interlock()?;
    let mut controller = InteractionController::new(&config, interlock_slot);
    controller.set_button_listener(ChannelListener::new(&RUN_STATE_CHANNEL));
    controller.start(&mut ui, &mut log_sink);

    // ── 7. Access point + captive portal ──────────────────────
    let mut access_point = AccessPoint::new(&config.portal, config.timing.dns_interval_ms, status_page)
        .map_err(Error::from)?;
    if let Err(e) = access_point.start(RadioHandles { modem: peripherals.modem, sysloop, nvs }) {
        // The machine is fully usable from the LCD without the status page.
        error!("Access point failed: {}, continuing offline", e);
    }

    // ── 8. Sequencer attach point ─────────────────────────────
    // A cutting sequencer task takes this link instead: it consumes
    // run-state changes and reports progress / completion through
    // SEQUENCER_FEEDBACK.  With none attached the loop drains it.
    let run_states = SequencerLink::new();

    info!("System ready. Entering control loop.");

    // ── 9. Control loop ───────────────────────────────────────
    let tick = std::time::Duration::from_millis(u64::from(config.timing.tick_interval_ms));
    loop {
        let now_ms = clock.now_ms();

        if SEQUENCER_FEEDBACK.take_done() {
            controller.done_running(&mut ui, &mut log_sink);
        }
        let progress = SEQUENCER_FEEDBACK.take_progress();
        while let Some(status) = run_states.try_next() {
            info!("SEQ | unattached | run_state={:?}", status);
        }
        controller.tick(now_ms, progress, &mut inputs, &mut ui, &mut log_sink);

        access_point.poll(now_ms);
        watchdog.feed();

        std::thread::sleep(tick);
    }
}
