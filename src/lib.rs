//! # TinyTractor ECU
//!
//! Engine, horn and light controller for a toy tractor: an ignition and
//! throttle model drives an 8 kHz wavetable engine drone, horn songs, a
//! blinking light and a motor, all in fixed-point integer arithmetic.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Input | [`buttons`] | Resistive ladder decoder, read-and-clear clicks |
//! | Model | [`tractor`] | Ignition state machine, first-order speed filter |
//! | Audio | [`audio`] | Wavetable synth + horn song sequencer |
//! | Output | [`actuators`] / [`hal`] | Motor duty shaping, embedded-hal pins |
//! | Glue | [`scheduler`] | 8 kHz fast tick, control loop, 25 Hz model tick |
//!
//! All state lives in owned structures; the two execution contexts share
//! only [`scheduler::SharedSignals`]. No allocation, no floating point.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod logging;
pub mod log_drain;
pub mod buttons;
pub mod tractor;
pub mod audio;
pub mod actuators;
pub mod scheduler;
pub mod hal;

pub use audio::AudioEngine;
pub use buttons::{Button, ButtonDecoder};
pub use config::{ConfigError, ControllerConfig};
pub use logging::{LogLevel, LogStream};
pub use scheduler::{Controller, SharedSignals};
pub use tractor::{EngineStatus, IgnitionPosition, Tractor};
