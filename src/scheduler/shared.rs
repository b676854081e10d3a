//! Values shared between the fast tick and the control loop.
//!
//! Every field has exactly one writer:
//!
//! | Field | Writer | Reader |
//! |-------|--------|--------|
//! | sample due | fast tick sets, control loop clears | control loop |
//! | motor duty, light | control loop | fast tick / light pin |
//! | throttle, buttons ADC | converter callback | control loop |
//! | missed deadlines | fast tick | control loop |
//!
//! All fields are word-sized atomics; nothing here takes a lock.

use portable_atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Outputs computed by one model tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelOutputs {
    /// Light enable.
    pub led: bool,
    /// Motor soft-PWM duty, in fast ticks.
    pub motor_duty: u8,
    /// Engine speed (BP6) after the tick.
    pub speed: u8,
}

/// Shared signals.
pub struct SharedSignals {
    sample_due: AtomicBool,
    motor_duty: AtomicU8,
    led: AtomicBool,
    throttle_adc: AtomicU8,
    buttons_adc: AtomicU8,
    missed_deadlines: AtomicU32,
}

impl SharedSignals {
    /// Nothing due, outputs off, inputs at zero.
    pub const fn new() -> Self {
        Self {
            sample_due: AtomicBool::new(false),
            motor_duty: AtomicU8::new(0),
            led: AtomicBool::new(false),
            throttle_adc: AtomicU8::new(0),
            buttons_adc: AtomicU8::new(0),
            missed_deadlines: AtomicU32::new(0),
        }
    }

    /// Fast tick: a new sample is due.
    ///
    /// If the previous one was never taken the control loop missed its
    /// deadline; this is counted and nothing else. Returns `true` on a miss.
    #[inline]
    pub fn signal_sample_due(&self) -> bool {
        let missed = self.sample_due.swap(true, Ordering::AcqRel);
        if missed {
            self.missed_deadlines.fetch_add(1, Ordering::Relaxed);
        }
        missed
    }

    /// Control loop: read and clear the sample-due flag.
    #[inline]
    pub fn take_sample_due(&self) -> bool {
        self.sample_due.swap(false, Ordering::AcqRel)
    }

    /// Deadlines missed since boot.
    #[inline]
    pub fn missed_deadlines(&self) -> u32 {
        self.missed_deadlines.load(Ordering::Relaxed)
    }

    /// Control loop: publish a model tick's outputs to the fast path.
    #[inline]
    pub fn publish(&self, outputs: &ModelOutputs) {
        self.motor_duty.store(outputs.motor_duty, Ordering::Release);
        self.led.store(outputs.led, Ordering::Release);
    }

    /// Current motor duty target.
    #[inline]
    pub fn motor_duty(&self) -> u8 {
        self.motor_duty.load(Ordering::Acquire)
    }

    /// Current light output.
    #[inline]
    pub fn led(&self) -> bool {
        self.led.load(Ordering::Acquire)
    }

    /// Converter callback: store a throttle reading.
    #[inline]
    pub fn set_throttle_adc(&self, value: u8) {
        self.throttle_adc.store(value, Ordering::Release);
    }

    /// Converter callback: store a button ladder reading.
    #[inline]
    pub fn set_buttons_adc(&self, value: u8) {
        self.buttons_adc.store(value, Ordering::Release);
    }

    /// Converter result for the throttle. A failed conversion keeps the
    /// previous reading and hands the error back.
    #[inline]
    pub fn refresh_throttle_adc<E>(&self, reading: Result<u8, E>) -> Result<(), E> {
        reading.map(|value| self.set_throttle_adc(value))
    }

    /// Converter result for the button ladder, same rules as the throttle.
    #[inline]
    pub fn refresh_buttons_adc<E>(&self, reading: Result<u8, E>) -> Result<(), E> {
        reading.map(|value| self.set_buttons_adc(value))
    }

    /// Latest throttle reading (may be stale).
    #[inline]
    pub fn throttle_adc(&self) -> u8 {
        self.throttle_adc.load(Ordering::Acquire)
    }

    /// Latest button ladder reading (may be stale).
    #[inline]
    pub fn buttons_adc(&self) -> u8 {
        self.buttons_adc.load(Ordering::Acquire)
    }
}

impl Default for SharedSignals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_due_read_and_clear() {
        let shared = SharedSignals::new();
        assert!(!shared.take_sample_due());

        assert!(!shared.signal_sample_due());
        assert!(shared.take_sample_due());
        assert!(!shared.take_sample_due());
    }

    #[test]
    fn test_missed_deadline_counted() {
        let shared = SharedSignals::new();
        shared.signal_sample_due();
        assert!(shared.signal_sample_due());
        assert!(shared.signal_sample_due());
        assert_eq!(shared.missed_deadlines(), 2);

        // Still a single pending sample.
        assert!(shared.take_sample_due());
        assert!(!shared.take_sample_due());
    }

    #[test]
    fn test_failed_conversion_keeps_last_reading() {
        let shared = SharedSignals::new();
        assert_eq!(shared.refresh_throttle_adc::<()>(Ok(90)), Ok(()));
        assert_eq!(shared.refresh_buttons_adc::<()>(Ok(60)), Ok(()));

        assert_eq!(shared.refresh_throttle_adc(Err("timeout")), Err("timeout"));
        assert_eq!(shared.refresh_buttons_adc(Err("timeout")), Err("timeout"));
        assert_eq!(shared.throttle_adc(), 90);
        assert_eq!(shared.buttons_adc(), 60);

        assert_eq!(shared.refresh_throttle_adc::<()>(Ok(120)), Ok(()));
        assert_eq!(shared.throttle_adc(), 120);
    }

    #[test]
    fn test_publish() {
        let shared = SharedSignals::new();
        shared.publish(&ModelOutputs {
            led: true,
            motor_duty: 12,
            speed: 80,
        });
        assert!(shared.led());
        assert_eq!(shared.motor_duty(), 12);
    }
}
