//! GPIO / peripheral pin assignments for the resistor cutter controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Nokia 5110 LCD (PCD8544 controller). VCC to 3V3, LIGHT and GND to GND
// ---------------------------------------------------------------------------

/// SPI clock.
pub const LCD_CLK_GPIO: i32 = 17;
/// SPI MOSI (the PCD8544 calls it DIN).
pub const LCD_DIN_GPIO: i32 = 16;
/// Data/command select: HIGH = display data, LOW = command.
pub const LCD_DC_GPIO: i32 = 4;
/// Chip enable (active LOW).
pub const LCD_CE_GPIO: i32 = 0;
/// Reset (active LOW).
pub const LCD_RST_GPIO: i32 = 2;

/// SPI clock for the PCD8544 (datasheet max is 4 MHz).
pub const LCD_SPI_FREQ_HZ: u32 = 4_000_000;

// ---------------------------------------------------------------------------
// Analog joystick
// ---------------------------------------------------------------------------

/// Push switch, active LOW with internal pull-up.
pub const JOYSTICK_SW_GPIO: i32 = 32;
/// Horizontal axis wiper. ADC1 channel 6 on the ESP32.
pub const JOYSTICK_X_GPIO: i32 = 34;
/// Vertical axis wiper. ADC1 channel 7 on the ESP32.
pub const JOYSTICK_Y_GPIO: i32 = 35;

pub const ADC1_CH_JOYSTICK_X: u32 = 6;
pub const ADC1_CH_JOYSTICK_Y: u32 = 7;

// ---------------------------------------------------------------------------
// Safety interlock
// ---------------------------------------------------------------------------

/// Guard switch with internal pull-up.
/// LOW = guard closed (switch pulls to ground), HIGH = guard open / tripped.
pub const SAFETY_INTERLOCK_GPIO: i32 = 33;
