//! Module: config
//!
//! Purpose: Controller configuration (scheduler timing and actuator
//! calibration).
//!
//! Architecture:
//! - `ControllerConfig` is a plain `Copy` value, validated once at startup
//! - Engine model timing is fixed by the 25 Hz model tick and is not part
//!   of the configuration; neither are the button ladder bands
//!
//! Safety: Safe. No unsafe blocks.

use crate::tractor::MODEL_RATE_HZ;

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Audio sample rate = fast tick rate, in Hz.
    pub sample_rate_hz: u32,
    /// Soft PWM period, in fast ticks.
    pub pwm_period_ticks: u8,
    /// Motor duty at effects speed, in fast ticks.
    pub motor_duty_min: u8,
    /// Motor duty ceiling, in fast ticks.
    pub motor_duty_max: u8,
    /// Throttle ADC reading with the lever at rest.
    pub throttle_adc_idle: u8,
}

impl ControllerConfig {
    /// Defaults for the stock board.
    pub const DEFAULT: Self = Self {
        sample_rate_hz: 8000,
        pwm_period_ticks: 64,
        motor_duty_min: 6,
        motor_duty_max: 58,
        throttle_adc_idle: 38,
    };

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 || self.sample_rate_hz % MODEL_RATE_HZ != 0 {
            return Err(ConfigError::SampleRate);
        }
        if self.model_divisor_u32() > u16::MAX as u32 {
            return Err(ConfigError::SampleRate);
        }
        if self.pwm_period_ticks == 0 {
            return Err(ConfigError::PwmPeriod);
        }
        if self.motor_duty_min > self.motor_duty_max
            || self.motor_duty_max > self.pwm_period_ticks
        {
            return Err(ConfigError::MotorDuty);
        }
        Ok(())
    }

    /// Fast ticks per model tick (320 at 8 kHz).
    #[inline]
    pub fn model_divisor(&self) -> u16 {
        self.model_divisor_u32().min(u16::MAX as u32) as u16
    }

    #[inline]
    fn model_divisor_u32(&self) -> u32 {
        self.sample_rate_hz / MODEL_RATE_HZ
    }

    /// Fast tick period in microseconds.
    #[inline]
    pub fn sample_period_us(&self) -> u32 {
        1_000_000 / self.sample_rate_hz.max(1)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: Sample rate zero, not a multiple of the model rate, or too high
    SampleRate,
    /// C02: Soft PWM period is zero
    PwmPeriod,
    /// C03: Motor duty range inverted or beyond the PWM period
    MotorDuty,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::SampleRate => "C01",
            Self::PwmPeriod => "C02",
            Self::MotorDuty => "C03",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::SampleRate => "sample rate must be a multiple of the model rate",
            Self::PwmPeriod => "pwm period must be non-zero",
            Self::MotorDuty => "motor duty range invalid",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ControllerConfig::DEFAULT.validate(), Ok(()));
        assert_eq!(ControllerConfig::DEFAULT.model_divisor(), 320);
        assert_eq!(ControllerConfig::DEFAULT.sample_period_us(), 125);
    }

    #[test]
    fn test_rejects_odd_sample_rate() {
        let config = ControllerConfig {
            sample_rate_hz: 8001,
            ..ControllerConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::SampleRate));

        let config = ControllerConfig {
            sample_rate_hz: 0,
            ..ControllerConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::SampleRate));
    }

    #[test]
    fn test_rejects_duty_beyond_period() {
        let config = ControllerConfig {
            motor_duty_max: 65,
            ..ControllerConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::MotorDuty));
    }

    #[test]
    fn test_error_display() {
        let text = format!("{}", ConfigError::PwmPeriod);
        assert!(text.starts_with("C02"));
    }
}
