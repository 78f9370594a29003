//! Peripheral drivers and hardware initialisation.

pub mod hw_init;
pub mod interlock;
pub mod joystick;
pub mod pcd8544;
pub mod watchdog;
