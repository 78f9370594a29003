//! Unified error types for the resistor cutter firmware.
//!
//! A single `Error` enum that every fallible edge (config, display, portal,
//! peripheral init) converts into.  The interaction controller itself is
//! infallible: physical inputs cannot fail in a way software detects, and
//! out-of-range values are prevented by wrap-around arithmetic.
//! All variants are `Copy` so they can be passed around without allocation.

use core::fmt;

use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;
use crate::portal::dns::DnsError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed validation.
    Config(ConfigError),
    /// The LCD could not be driven.
    Display(DisplayError),
    /// The access point, HTTP server, or captive DNS failed.
    Portal(PortalError),
    /// Every interlock subscriber slot is taken.
    SubscribersExhausted,
    /// Peripheral initialisation failed.
    Hardware(HwInitError),
    /// A captive DNS packet could not be handled.
    Dns(DnsError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Portal(e) => write!(f, "portal: {e}"),
            Self::SubscribersExhausted => write!(f, "interlock: no free subscriber slot"),
            Self::Hardware(e) => write!(f, "hw_init: {e}"),
            Self::Dns(e) => write!(f, "dns: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Hardware(e)
    }
}

impl From<DnsError> for Error {
    fn from(e: DnsError) -> Self {
        Self::Dns(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// SPI transfer to the controller failed.
    Bus,
    /// A control line (DC / RST) could not be driven.
    Pin,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI transfer failed"),
            Self::Pin => write!(f, "control pin write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Portal errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalError {
    /// Soft-AP could not be configured or started.
    AccessPointFailed,
    /// HTTP server could not be started or a handler could not be registered.
    HttpServerFailed,
    /// The captive DNS socket could not be bound.
    DnsBindFailed,
    /// The SSID/password pair was rejected.
    InvalidCredentials,
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessPointFailed => write!(f, "soft-AP start failed"),
            Self::HttpServerFailed => write!(f, "HTTP server start failed"),
            Self::DnsBindFailed => write!(f, "captive DNS bind failed"),
            Self::InvalidCredentials => write!(f, "invalid AP credentials"),
        }
    }
}

impl From<PortalError> for Error {
    fn from(e: PortalError) -> Self {
        Self::Portal(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
