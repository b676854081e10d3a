//! GPIO HAL for the light and the motor drive.

use embedded_hal::digital::{OutputPin, PinState};

use crate::scheduler::{fast_tick, SharedSignals, SoftPwm};

/// Light output, written once per model tick.
pub struct Light<P> {
    pin: P,
}

impl<P: OutputPin> Light<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Drive the light.
    #[inline]
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        self.pin.set_state(PinState::from(on))
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

/// Motor drive pin stepped by the fast tick.
///
/// Only writes the pin when the soft PWM level changes.
pub struct MotorDrive<P> {
    pin: P,
    pwm: SoftPwm,
    written: Option<bool>,
}

impl<P: OutputPin> MotorDrive<P> {
    /// Drive `pin` with a soft PWM of `period` fast ticks.
    pub fn new(pin: P, period: u8) -> Self {
        Self {
            pin,
            pwm: SoftPwm::new(period),
            written: None,
        }
    }

    /// Fast tick callback body: flag the sample and step the PWM.
    #[inline]
    pub fn on_fast_tick(&mut self, shared: &SharedSignals) -> Result<(), P::Error> {
        let level = fast_tick(shared, &mut self.pwm);
        if self.written != Some(level) {
            self.pin.set_state(PinState::from(level))?;
            self.written = Some(level);
        }
        Ok(())
    }

    /// Current PWM output level.
    #[inline]
    pub fn level(&self) -> bool {
        self.pwm.level()
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}
