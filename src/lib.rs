//! Resistor cutter controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod portal;
pub mod safety;

// Adapters and drivers carry their own cfg-gated platform bodies, so the
// crate compiles (and their host stubs are testable) off-target.
pub mod adapters;
pub mod drivers;
