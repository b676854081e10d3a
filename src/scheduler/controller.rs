//! Control loop: one audio sample per pass, one model tick every N passes.
//!
//! # Pass
//!
//! ```text
//! sample due ──▶ next_sample(speed) ──▶ audio out          every pass (8 kHz)
//!                     │
//!                     └─ pass N ──▶ buttons ─▶ tractor ─▶ light, motor duty   (25 Hz)
//! ```
//!
//! The sample is computed before the model tick so the audio deadline is
//! met first; the model tick must stay well inside one sample period.

use crate::actuators::{motor_duty_cycle, throttle_setpoint};
use crate::audio::{AudioEngine, Song};
use crate::buttons::{Button, ButtonDecoder};
use crate::config::{ConfigError, ControllerConfig};
use crate::logging::{LogStream, LOG_BUFFER_SIZE};
use crate::tractor::{EngineStatus, IgnitionPosition, Tractor};
use crate::{ecu_debug, ecu_info, ecu_warn};

use super::shared::{ModelOutputs, SharedSignals};

/// Result of one control loop pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOutput {
    /// Audio sample for this pass.
    pub sample: u8,
    /// Outputs of the model tick, on the passes that ran one.
    pub model: Option<ModelOutputs>,
}

/// Controller owning the button decoder, engine model and synth.
///
/// # Example
///
/// ```
/// use tractor_ecu::config::ControllerConfig;
/// use tractor_ecu::logging::LogStream;
/// use tractor_ecu::scheduler::{Controller, SharedSignals};
///
/// let log: LogStream = LogStream::new();
/// let shared = SharedSignals::new();
/// let mut controller = Controller::new(ControllerConfig::DEFAULT, &log).unwrap();
///
/// shared.signal_sample_due();              // timer callback
/// let pass = controller.service(&shared);  // main loop
/// assert_eq!(pass.map(|p| p.sample), Some(128));
/// ```
pub struct Controller<'a, const N: usize = LOG_BUFFER_SIZE> {
    config: ControllerConfig,
    model_divisor: u16,
    pass_counter: u16,
    model_ticks: u32,
    reported_misses: u32,
    buttons: ButtonDecoder,
    tractor: Tractor,
    audio: AudioEngine,
    log: &'a LogStream<N>,
}

impl<'a, const N: usize> Controller<'a, N> {
    /// Build a controller after validating `config`.
    pub fn new(config: ControllerConfig, log: &'a LogStream<N>) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            model_divisor: config.model_divisor(),
            pass_counter: 0,
            model_ticks: 0,
            reported_misses: 0,
            buttons: ButtonDecoder::new(),
            tractor: Tractor::new(),
            audio: AudioEngine::new(),
            log,
        })
    }

    /// Run a pass if the fast tick flagged a sample as due.
    #[inline]
    pub fn service(&mut self, shared: &SharedSignals) -> Option<PassOutput> {
        if shared.take_sample_due() {
            Some(self.run_pass(shared))
        } else {
            None
        }
    }

    /// Run one pass unconditionally: compute a sample, and on every N-th
    /// pass run the model tick and publish its outputs.
    pub fn run_pass(&mut self, shared: &SharedSignals) -> PassOutput {
        let sample = self.audio.next_sample(self.tractor.speed());

        self.pass_counter += 1;
        if self.pass_counter < self.model_divisor {
            return PassOutput { sample, model: None };
        }
        self.pass_counter = 0;

        let tick = self.model_ticks;
        let outputs = self.model_tick(shared.throttle_adc(), shared.buttons_adc());
        shared.publish(&outputs);
        self.report_missed_deadlines(tick, shared.missed_deadlines());

        PassOutput {
            sample,
            model: Some(outputs),
        }
    }

    /// One model tick from raw analog readings.
    pub fn model_tick(&mut self, throttle_adc: u8, buttons_adc: u8) -> ModelOutputs {
        let tick = self.model_ticks;
        self.model_ticks = self.model_ticks.wrapping_add(1);

        self.buttons.set_level(buttons_adc);
        if self.buttons.is_clicked(Button::Horn) {
            ecu_debug!(self.log, tick, "horn button");
            self.tractor
                .play_horn_song(self.audio.horn_mut(), Song::Dixie);
        }

        let ignition = if self.buttons.is_pressed(Button::Start) {
            IgnitionPosition::Start
        } else if self.buttons.is_pressed(Button::On) {
            IgnitionPosition::On
        } else {
            IgnitionPosition::Off
        };
        self.tractor.set_ignition_position(ignition);
        self.tractor
            .set_speed_setpoint(throttle_setpoint(throttle_adc, &self.config));

        let before = self.tractor.status();
        let led = self.tractor.update(self.audio.horn_mut());
        let after = self.tractor.status();
        if before != after {
            self.log_transition(tick, before, after);
        }

        let speed = self.tractor.speed();
        ModelOutputs {
            led,
            motor_duty: motor_duty_cycle(speed, &self.config),
            speed,
        }
    }

    fn log_transition(&self, tick: u32, before: EngineStatus, after: EngineStatus) {
        match after {
            EngineStatus::Cranking => ecu_info!(self.log, tick, "cranking"),
            EngineStatus::Running => ecu_info!(self.log, tick, "engine running"),
            EngineStatus::Off if before == EngineStatus::Cranking => {
                ecu_info!(self.log, tick, "stalled after {} ticks", self.tractor.cranking_ticks())
            }
            EngineStatus::Off => ecu_info!(self.log, tick, "engine off"),
        }
    }

    fn report_missed_deadlines(&mut self, tick: u32, total: u32) {
        let new = total.wrapping_sub(self.reported_misses);
        if new > 0 {
            ecu_warn!(self.log, tick, "missed {} sample deadlines", new);
            self.reported_misses = total;
        }
    }

    /// Model ticks run since start.
    #[inline]
    pub fn model_ticks(&self) -> u32 {
        self.model_ticks
    }

    /// Engine model.
    #[inline]
    pub fn tractor(&self) -> &Tractor {
        &self.tractor
    }

    /// Synth.
    #[inline]
    pub fn audio(&self) -> &AudioEngine {
        &self.audio
    }

    /// Button decoder.
    #[inline]
    pub fn buttons(&self) -> &ButtonDecoder {
        &self.buttons
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_runs_every_divisor_passes() {
        let log: LogStream = LogStream::new();
        let shared = SharedSignals::new();
        let mut controller = Controller::new(ControllerConfig::DEFAULT, &log).unwrap();

        let ticks = (0..320 * 3)
            .filter(|_| controller.run_pass(&shared).model.is_some())
            .count();
        assert_eq!(ticks, 3);
        assert_eq!(controller.model_ticks(), 3);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let log: LogStream = LogStream::new();
        let config = ControllerConfig {
            pwm_period_ticks: 0,
            ..ControllerConfig::DEFAULT
        };
        assert_eq!(
            Controller::new(config, &log).err(),
            Some(ConfigError::PwmPeriod)
        );
    }
}
