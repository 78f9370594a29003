//! Analog thumb joystick: two potentiometer axes plus a push switch.
//!
//! ## Hardware
//!
//! Axes on ADC1 (12-bit, 0..=4095, centre ≈ 2048).  Switch is active-low
//! with an internal pull-up.  A reading within `deflection_margin` of
//! either rail counts as a deflection:
//!
//! | Axis | Near 0 | Near `adc_max` |
//! |------|--------|----------------|
//! | X    | left   | right          |
//! | Y    | up     | down           |

use crate::app::menu::JoystickReading;
use crate::config::JoystickConfig;

/// Classify one raw sample.  `switch_level_high` is the raw pin level.
pub fn classify(x: u16, y: u16, switch_level_high: bool, cfg: &JoystickConfig) -> JoystickReading {
    let low = cfg.deflection_margin;
    let high = cfg.adc_max.saturating_sub(cfg.deflection_margin);
    JoystickReading {
        up: y < low,
        down: y > high,
        left: x < low,
        right: x > high,
        pressed: !switch_level_high,
    }
}

pub struct JoystickDriver {
    cfg: JoystickConfig,
}

impl JoystickDriver {
    pub fn new(cfg: JoystickConfig) -> Self {
        Self { cfg }
    }

    /// Sample both axes and the switch.
    pub fn read(&mut self) -> JoystickReading {
        let (x, y, sw) = Self::read_raw();
        classify(x, y, sw, &self.cfg)
    }

    #[cfg(target_os = "espidf")]
    fn read_raw() -> (u16, u16, bool) {
        use crate::drivers::hw_init::{adc1_read, gpio_read};
        use crate::pins;
        (
            adc1_read(pins::ADC1_CH_JOYSTICK_X),
            adc1_read(pins::ADC1_CH_JOYSTICK_Y),
            gpio_read(pins::JOYSTICK_SW_GPIO),
        )
    }

    /// Simulation: stick centred, switch released.
    #[cfg(not(target_os = "espidf"))]
    fn read_raw() -> (u16, u16, bool) {
        (2048, 2048, true)
    }
}
