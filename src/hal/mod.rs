//! Hardware Abstraction Layer for the tractor controller.
//!
//! Thin wrappers over `embedded-hal` traits, so any board crate that
//! implements them (ESP-IDF, AVR, RP2040...) can drive the outputs.
//! Business logic stays in core modules, HAL is just I/O.

pub mod gpio;
pub mod audio;

pub use audio::AudioOut;
pub use gpio::{Light, MotorDrive};
