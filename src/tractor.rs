//! Tractor engine model.
//!
//! Pure logic, no hardware dependencies. Consumes the ignition position and
//! throttle setpoint, produces the engine speed, the light blink output and
//! horn song requests. Fully testable on host.
//!
//! # Engine status
//!
//! - **Off**: holding the key on START starts cranking
//! - **Cranking**: after 4 s on START the engine catches; releasing early
//!   stalls it
//! - **Running**: follows the throttle; at speed it blinks the light and
//!   honks periodically
//!
//! # Speed units
//!
//! Public speeds are BP6 (64 = idle, 800 rpm). The filtered speed keeps 8
//! extra fractional bits (BP14). The filter uses shifts and one subtraction
//! only, so it runs on cores without a hardware multiplier.

use crate::audio::{HornPlayer, Song};

/// Model tick period in milliseconds (25 Hz).
pub const MODEL_TICK_MS: u32 = 40;

/// Model tick rate in Hz.
pub const MODEL_RATE_HZ: u32 = 1000 / MODEL_TICK_MS;

/// Idle speed (800 rpm).
pub const ENGINE_SPEED_IDLE: u8 = 64;

/// Minimum speed for light, horn and motor effects.
pub const ENGINE_SPEED_EFFECTS: u8 = 68;

/// Maximum speed.
pub const ENGINE_SPEED_MAX: u8 = 168;

/// Speed target while the starter turns the engine.
pub const ENGINE_SPEED_CRANKING: u8 = 2 * ENGINE_SPEED_IDLE / 5;

/// Ticks the key must stay on START before the engine catches (4 s).
pub const CRANKING_MIN_TICKS: u8 = (4000 / MODEL_TICK_MS) as u8;

/// Auto-honk cycle length (16 s).
pub const HORN_CYCLE_TICKS: u16 = (16000 / MODEL_TICK_MS) as u16;

/// Light blink cycle length (3 s).
pub const LED_CYCLE_TICKS: u8 = (3000 / MODEL_TICK_MS) as u8;

/// Blink counter values below this produce the flashes (odd values only).
const LED_FLASH_WINDOW: u8 = 12;

/// Extra fractional bits of the filtered speed.
const SPEED_FRAC_BITS: u32 = 8;

/// Filter shift while off: fast decay.
const FILTER_FAST: u32 = 2;
/// Filter shift while cranking or running below effects speed.
const FILTER_MEDIUM: u32 = 4;
/// Filter shift while running at speed: smooth.
const FILTER_SLOW: u32 = 6;

/// Ignition key position.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IgnitionPosition {
    #[default]
    Off = 0,
    On = 1,
    Start = 2,
}

/// Engine status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EngineStatus {
    #[default]
    Off,
    Cranking,
    Running,
}

/// Tractor engine model.
///
/// # Example
///
/// ```
/// use tractor_ecu::audio::HornPlayer;
/// use tractor_ecu::tractor::{EngineStatus, IgnitionPosition, Tractor};
///
/// let mut tractor = Tractor::new();
/// let mut horn = HornPlayer::new();
///
/// tractor.set_ignition_position(IgnitionPosition::Start);
/// tractor.update(&mut horn);
/// assert_eq!(tractor.status(), EngineStatus::Cranking);
/// ```
#[derive(Debug, Clone)]
pub struct Tractor {
    status: EngineStatus,
    /// Filtered speed, BP14.
    engine_speed: u16,
    /// Target speed, BP6.
    speed_setpoint: u8,
    ignition: IgnitionPosition,
    cranking_ticks: u8,
    horn_ticks: u16,
    led_ticks: u8,
}

impl Tractor {
    /// Engine off, speed zero.
    pub const fn new() -> Self {
        Self {
            status: EngineStatus::Off,
            engine_speed: 0,
            speed_setpoint: 0,
            ignition: IgnitionPosition::Off,
            cranking_ticks: 0,
            horn_ticks: 0,
            led_ticks: 0,
        }
    }

    /// Advance the model by one tick and return the light output.
    ///
    /// Also runs the horn sequencer tick, after any song the model started.
    pub fn update(&mut self, horn: &mut HornPlayer) -> bool {
        match self.status {
            EngineStatus::Off => self.tick_off(),
            EngineStatus::Cranking => self.tick_cranking(),
            EngineStatus::Running => self.tick_running(horn),
        }

        horn.tick();

        self.led_on()
    }

    fn tick_off(&mut self) {
        if self.ignition == IgnitionPosition::Start {
            self.status = EngineStatus::Cranking;
            self.speed_setpoint = ENGINE_SPEED_CRANKING;
            self.cranking_ticks = 0;
        }
        self.filter_speed(FILTER_FAST);
    }

    fn tick_cranking(&mut self) {
        self.cranking_ticks = self.cranking_ticks.saturating_add(1);
        if self.cranking_ticks > CRANKING_MIN_TICKS {
            self.status = EngineStatus::Running;
            self.speed_setpoint = ENGINE_SPEED_IDLE;
            self.horn_ticks = 0;
            // Next running tick wraps this to 0.
            self.led_ticks = LED_CYCLE_TICKS;
        } else if self.ignition != IgnitionPosition::Start {
            self.status = EngineStatus::Off;
            self.speed_setpoint = 0;
        }
        self.filter_speed(FILTER_MEDIUM);
    }

    fn tick_running(&mut self, horn: &mut HornPlayer) {
        if self.ignition == IgnitionPosition::Off {
            self.status = EngineStatus::Off;
            self.speed_setpoint = 0;
            return;
        }

        if self.speed() >= ENGINE_SPEED_EFFECTS {
            self.horn_ticks += 1;
            if self.horn_ticks == HORN_CYCLE_TICKS / 2 {
                horn.play(Song::DoubleHonk);
            } else if self.horn_ticks >= HORN_CYCLE_TICKS {
                horn.play(Song::SingleHonk);
                self.horn_ticks = 0;
            }
            self.filter_speed(FILTER_SLOW);
        } else {
            self.filter_speed(FILTER_MEDIUM);
        }

        self.led_ticks += 1;
        if self.led_ticks > LED_CYCLE_TICKS {
            self.led_ticks = 0;
        }
    }

    /// First-order low-pass toward the setpoint:
    /// `speed' = ((speed << a) - speed + (setpoint << 8)) >> a`.
    ///
    /// Larger `a` is slower. Shifts and a subtraction only.
    #[inline]
    fn filter_speed(&mut self, a: u32) {
        let speed = self.engine_speed as u32;
        let target = (self.speed_setpoint as u32) << SPEED_FRAC_BITS;
        self.engine_speed = (((speed << a) - speed + target) >> a) as u16;
    }

    /// Light output for the current tick.
    ///
    /// Six flashes during the start of each blink cycle, only at speed.
    #[inline]
    pub fn led_on(&self) -> bool {
        self.speed() >= ENGINE_SPEED_EFFECTS
            && (self.led_ticks & 0x01) != 0
            && self.led_ticks < LED_FLASH_WINDOW
    }

    /// Set the ignition key position (read on the next update).
    #[inline]
    pub fn set_ignition_position(&mut self, position: IgnitionPosition) {
        self.ignition = position;
    }

    /// Request a speed (BP6), clamped to idle..=max.
    ///
    /// Ignored unless the engine is running.
    pub fn set_speed_setpoint(&mut self, setpoint: u8) {
        if self.status != EngineStatus::Running {
            return;
        }
        self.speed_setpoint = setpoint.clamp(ENGINE_SPEED_IDLE, ENGINE_SPEED_MAX);
    }

    /// Play `song` on the horn, restarting the auto-honk cycle.
    ///
    /// Ignored while the key is OFF.
    pub fn play_horn_song(&mut self, horn: &mut HornPlayer, song: Song) {
        if self.ignition == IgnitionPosition::Off {
            return;
        }
        self.horn_ticks = 0;
        horn.play(song);
    }

    /// Engine speed, BP6 (truncated filter output).
    #[inline]
    pub fn speed(&self) -> u8 {
        (self.engine_speed >> SPEED_FRAC_BITS) as u8
    }

    /// Filtered speed with its extra fractional bits, BP14.
    #[inline]
    pub fn filtered_speed(&self) -> u16 {
        self.engine_speed
    }

    /// Current speed target, BP6.
    #[inline]
    pub fn speed_setpoint(&self) -> u8 {
        self.speed_setpoint
    }

    /// Engine status.
    #[inline]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Last ignition position set.
    #[inline]
    pub fn ignition_position(&self) -> IgnitionPosition {
        self.ignition
    }

    /// Ticks spent cranking.
    #[inline]
    pub fn cranking_ticks(&self) -> u8 {
        self.cranking_ticks
    }

    /// Position inside the auto-honk cycle.
    #[inline]
    pub fn horn_cycle_ticks(&self) -> u16 {
        self.horn_ticks
    }

    /// Position inside the blink cycle.
    #[inline]
    pub fn led_cycle_ticks(&self) -> u8 {
        self.led_ticks
    }
}

impl Default for Tractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_constants() {
        assert_eq!(MODEL_RATE_HZ, 25);
        assert_eq!(ENGINE_SPEED_CRANKING, 25);
        assert_eq!(CRANKING_MIN_TICKS, 100);
        assert_eq!(HORN_CYCLE_TICKS, 400);
        assert_eq!(LED_CYCLE_TICKS, 75);
    }

    #[test]
    fn test_filter_moves_toward_setpoint() {
        let mut tractor = Tractor::new();
        tractor.speed_setpoint = ENGINE_SPEED_IDLE;
        tractor.filter_speed(FILTER_MEDIUM);
        // (0 + 64 << 8) >> 4
        assert_eq!(tractor.filtered_speed(), 1024);

        tractor.filter_speed(FILTER_MEDIUM);
        assert_eq!(tractor.filtered_speed(), (1024 * 15 + 16384) >> 4);
    }

    #[test]
    fn test_filter_at_max_does_not_overflow() {
        let mut tractor = Tractor::new();
        tractor.engine_speed = (ENGINE_SPEED_MAX as u16) << 8;
        tractor.speed_setpoint = ENGINE_SPEED_MAX;
        tractor.filter_speed(FILTER_SLOW);
        assert_eq!(tractor.speed(), ENGINE_SPEED_MAX);
    }

    #[test]
    fn test_led_window() {
        let mut tractor = Tractor::new();
        tractor.engine_speed = (ENGINE_SPEED_EFFECTS as u16) << 8;

        let flashes = (0..=LED_CYCLE_TICKS)
            .filter(|&t| {
                tractor.led_ticks = t;
                tractor.led_on()
            })
            .count();
        assert_eq!(flashes, 6);
    }
}
