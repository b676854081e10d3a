//! Real-time scheduling glue.
//!
//! Two cooperating contexts on one core:
//! - **Fast tick** (timer callback, 8 kHz): flags a sample as due and steps
//!   the motor soft PWM. Never blocks, never logs.
//! - **Control loop** (main loop): waits for the flag, computes the sample,
//!   and every 320th pass runs the 25 Hz model tick.
//!
//! They talk only through [`SharedSignals`].

pub mod shared;
pub mod soft_pwm;
pub mod controller;

pub use controller::{Controller, PassOutput};
pub use shared::{ModelOutputs, SharedSignals};
pub use soft_pwm::SoftPwm;

/// Body of the fast timer callback.
///
/// Returns the motor output level for this tick.
#[inline]
pub fn fast_tick(shared: &SharedSignals, pwm: &mut SoftPwm) -> bool {
    shared.signal_sample_due();
    pwm.tick(shared.motor_duty())
}
