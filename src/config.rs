//! System configuration parameters
//!
//! All tunable parameters for the resistor cutter.  There is no persistent
//! store: the firmware builds [`CutterConfig::default()`] at boot, so the
//! defaults below are the machine's compile-time constants.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CutterConfig {
    pub menu: MenuConfig,
    pub joystick: JoystickConfig,
    pub timing: TimingConfig,
    pub portal: PortalConfig,
}

/// Menu value domains and held-input repeat rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Upper bound of the resistors-per-kit field (lower bound is always 1).
    pub max_quantity_per_kit: u8,
    /// Upper bound of the kit-count field (lower bound is always 1).
    pub max_kit_count: u8,
    /// Minimum time between accepted selection moves while held (ms).
    pub vertical_repeat_ms: u32,
    /// Minimum time between accepted value edits while held (ms).
    pub horizontal_repeat_ms: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            max_quantity_per_kit: 10,
            max_kit_count: 50,
            // Slower than horizontal so a held stick doesn't overshoot the 3-item menu.
            vertical_repeat_ms: 500,
            horizontal_repeat_ms: 250,
        }
    }
}

/// Analog joystick thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoystickConfig {
    /// Full-scale ADC reading (12-bit on the ESP32).
    pub adc_max: u16,
    /// Distance from either rail that counts as a deflection.
    pub deflection_margin: u16,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            adc_max: 4095,
            deflection_margin: 500,
        }
    }
}

/// Main-loop cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Controller tick interval (ms).  Must stay ≤ 20 ms for the UI and DNS.
    pub tick_interval_ms: u32,
    /// Minimum interval between captive DNS servicing passes (ms).
    pub dns_interval_ms: u32,
    /// Task watchdog timeout; the loop feeds it every tick (ms).
    pub watchdog_timeout_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 20,
            dns_interval_ms: 30,
            watchdog_timeout_ms: 5_000,
        }
    }
}

/// Soft access point and captive portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Network name.  May not contain spaces.
    pub ssid: heapless::String<32>,
    /// WPA2 passphrase, 8–62 bytes.
    pub password: heapless::String<64>,
    /// 2.4 GHz channel.
    pub channel: u8,
    /// One client keeps the captive-portal escape working for JS-less popups.
    pub max_clients: u8,
    /// Address of the AP, gateway, web server and DNS answer.
    pub ip: [u8; 4],
    /// TTL placed on captive DNS answers.
    pub dns_ttl_secs: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        let mut ssid = heapless::String::new();
        let _ = ssid.push_str("Resistor_Cutter");
        let mut password = heapless::String::new();
        let _ = password.push_str("tekb0ts!");
        Self {
            ssid,
            password,
            channel: 6,
            max_clients: 1,
            // Public-space address; some Android builds refuse a captive portal on RFC1918.
            ip: [4, 3, 2, 1],
            dns_ttl_secs: 3600,
        }
    }
}

impl PortalConfig {
    /// `http://a.b.c.d/` for redirects.
    pub fn local_url(&self) -> heapless::String<24> {
        use core::fmt::Write;
        let mut url = heapless::String::new();
        let [a, b, c, d] = self.ip;
        // 23 bytes worst case ("http://255.255.255.255/").
        let _ = write!(url, "http://{a}.{b}.{c}.{d}/");
        url
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

/// Errors from [`CutterConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(field) => write!(f, "validation failed: {}", field),
        }
    }
}

/// Longest repeat interval accepted; anything slower makes the menu feel dead.
const MAX_REPEAT_MS: u32 = 5_000;
/// Upper bound on the tick cadence the DNS mirror tolerates.
const MAX_TICK_INTERVAL_MS: u32 = 20;
/// A watchdog shorter than this trips during the soft-AP bring-up.
const MIN_WATCHDOG_TIMEOUT_MS: u32 = 1_000;

impl CutterConfig {
    /// Reject values that would break menu arithmetic or the portal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |field| Err(ConfigError::ValidationFailed(field));

        if self.menu.max_quantity_per_kit == 0 {
            return fail("menu.max_quantity_per_kit");
        }
        if self.menu.max_kit_count == 0 {
            return fail("menu.max_kit_count");
        }
        if self.menu.vertical_repeat_ms == 0 || self.menu.vertical_repeat_ms > MAX_REPEAT_MS {
            return fail("menu.vertical_repeat_ms");
        }
        if self.menu.horizontal_repeat_ms == 0 || self.menu.horizontal_repeat_ms > MAX_REPEAT_MS {
            return fail("menu.horizontal_repeat_ms");
        }

        if self.joystick.adc_max == 0 || self.joystick.deflection_margin >= self.joystick.adc_max / 2 {
            return fail("joystick.deflection_margin");
        }

        if self.timing.tick_interval_ms == 0 || self.timing.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return fail("timing.tick_interval_ms");
        }
        if self.timing.dns_interval_ms == 0 {
            return fail("timing.dns_interval_ms");
        }
        if self.timing.watchdog_timeout_ms < MIN_WATCHDOG_TIMEOUT_MS {
            return fail("timing.watchdog_timeout_ms");
        }

        let ssid = self.portal.ssid.as_str();
        if ssid.is_empty() || ssid.contains(' ') || !ssid.bytes().all(|b| (0x21..=0x7E).contains(&b)) {
            return fail("portal.ssid");
        }
        if !(8..=62).contains(&self.portal.password.len()) {
            return fail("portal.password");
        }
        if !(1..=13).contains(&self.portal.channel) {
            return fail("portal.channel");
        }
        if self.portal.max_clients == 0 {
            return fail("portal.max_clients");
        }

        Ok(())
    }
}
