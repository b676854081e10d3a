//! Actuator shaping: throttle lever to speed setpoint, engine speed to
//! motor drive level.
//!
//! Pure functions, evaluated once per model tick.

use crate::config::ControllerConfig;
use crate::tractor::{ENGINE_SPEED_EFFECTS, ENGINE_SPEED_IDLE};

/// Convert a throttle ADC reading into a raw speed setpoint (BP6).
///
/// `IDLE + (adc - adc_idle) / 2`, saturated to a byte. The engine model
/// clamps the result to its own idle..=max range.
#[inline]
pub fn throttle_setpoint(adc: u8, config: &ControllerConfig) -> u8 {
    let delta = (adc as i16 - config.throttle_adc_idle as i16) >> 1;
    (ENGINE_SPEED_IDLE as i16 + delta).clamp(0, u8::MAX as i16) as u8
}

/// Motor soft-PWM duty for an engine speed (BP6).
///
/// Zero below effects speed, then `MIN + (speed - IDLE) / 2` up to `MAX`.
#[inline]
pub fn motor_duty_cycle(speed: u8, config: &ControllerConfig) -> u8 {
    if speed < ENGINE_SPEED_EFFECTS {
        return 0;
    }
    let duty = config.motor_duty_min as u16 + ((speed - ENGINE_SPEED_IDLE) >> 1) as u16;
    duty.min(config.motor_duty_max as u16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: ControllerConfig = ControllerConfig::DEFAULT;

    #[test]
    fn test_throttle_at_rest_is_idle() {
        assert_eq!(throttle_setpoint(38, &CONFIG), ENGINE_SPEED_IDLE);
        assert_eq!(throttle_setpoint(39, &CONFIG), ENGINE_SPEED_IDLE);
    }

    #[test]
    fn test_throttle_below_rest_goes_under_idle() {
        // Arithmetic shift: (0 - 38) >> 1 = -19
        assert_eq!(throttle_setpoint(0, &CONFIG), 45);
    }

    #[test]
    fn test_throttle_full_scale() {
        assert_eq!(throttle_setpoint(255, &CONFIG), 64 + 108);
    }

    #[test]
    fn test_motor_duty_profile() {
        assert_eq!(motor_duty_cycle(0, &CONFIG), 0);
        assert_eq!(motor_duty_cycle(67, &CONFIG), 0);
        assert_eq!(motor_duty_cycle(68, &CONFIG), 8);
        assert_eq!(motor_duty_cycle(100, &CONFIG), 24);
        assert_eq!(motor_duty_cycle(168, &CONFIG), 58);
        assert_eq!(motor_duty_cycle(255, &CONFIG), 58);
    }
}
