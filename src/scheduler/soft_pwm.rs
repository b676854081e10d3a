//! Software PWM for the motor drive, stepped by the fast tick.

/// Soft PWM generator.
///
/// The output goes high at the start of each period (if duty > 0) and low
/// once the period counter reaches the duty. A duty equal to the period
/// keeps it high.
#[derive(Debug, Clone, Copy)]
pub struct SoftPwm {
    counter: u8,
    period: u8,
    level: bool,
}

impl SoftPwm {
    /// Generator with a period of `period` fast ticks, output low.
    pub const fn new(period: u8) -> Self {
        Self {
            counter: 0,
            period,
            level: false,
        }
    }

    /// Advance one fast tick with target `duty`; returns the output level.
    #[inline]
    pub fn tick(&mut self, duty: u8) -> bool {
        self.counter += 1;
        if self.counter >= self.period {
            self.counter = 0;
            if duty > 0 {
                self.level = true;
            }
        }
        if self.counter >= duty {
            self.level = false;
        }
        self.level
    }

    /// Current output level.
    #[inline]
    pub fn level(&self) -> bool {
        self.level
    }

    /// Period in fast ticks.
    #[inline]
    pub fn period(&self) -> u8 {
        self.period
    }
}
