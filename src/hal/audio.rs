//! Audio HAL: 8-bit samples onto a PWM channel.

use embedded_hal::pwm::SetDutyCycle;

/// PWM audio output. Sample 0 is 0 % duty, 255 is 100 %.
pub struct AudioOut<P> {
    channel: P,
}

impl<P: SetDutyCycle> AudioOut<P> {
    pub fn new(channel: P) -> Self {
        Self { channel }
    }

    /// Write one sample.
    #[inline]
    pub fn write(&mut self, sample: u8) -> Result<(), P::Error> {
        self.channel
            .set_duty_cycle_fraction(sample as u16, u8::MAX as u16)
    }

    /// Give the channel back.
    pub fn release(self) -> P {
        self.channel
    }
}
