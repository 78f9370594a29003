//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the interaction rules for the resistor cutter:
//! joystick navigation, menu editing, run-status orchestration and the
//! safety pause.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod menu;
pub mod ports;
pub mod service;
