//! TinyTractor ECU - firmware entry point
//!
//! 1. Validate the controller configuration
//! 2. Bring up the light pin, motor pin, audio PWM and the two ADC inputs
//! 3. Start the 8 kHz fast tick (esp_timer) driving the motor soft PWM
//! 4. Start the log drain thread
//! 5. Run the control loop on the main task

use core::time::Duration;
use std::thread;

use esp_idf_svc::hal::adc::attenuation::DB_11;
use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::ledc::config::TimerConfig;
use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_ARG};
use esp_idf_svc::timer::EspTaskTimerService;

use tractor_ecu::config::ControllerConfig;
use tractor_ecu::hal::{AudioOut, Light, MotorDrive};
use tractor_ecu::log_drain::drain_to;
use tractor_ecu::logging::{LogLevel, LogStream};
use tractor_ecu::scheduler::{Controller, SharedSignals};
use tractor_ecu::{ecu_error, ecu_info};

// Static allocations shared by the timer callback, control loop and drain.
static SHARED: SharedSignals = SharedSignals::new();
static LOG_STREAM: LogStream = LogStream::with_level(LogLevel::Info);

/// Audio PWM carrier, well above the sample rate.
const AUDIO_PWM_HZ: u32 = 62_500;

/// Log drain poll interval.
const DRAIN_INTERVAL_MS: u64 = 50;

/// 12-bit oneshot reading to the 8-bit scale the model works in.
#[inline]
fn to_adc8(raw: u16) -> u8 {
    (raw >> 4).min(u8::MAX as u16) as u8
}

fn main() {
    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();

    println!();
    println!("=== {} ===", env!("VERSION_STRING"));

    if let Err(err) = run() {
        println!("[FATAL] {}", err);
    }
}

fn run() -> Result<(), EspError> {
    let config = ControllerConfig::DEFAULT;
    let mut controller = match Controller::new(config, &LOG_STREAM) {
        Ok(controller) => controller,
        Err(err) => {
            println!("[FATAL] {}", err);
            return Err(EspError::from_infallible::<ESP_ERR_INVALID_ARG>());
        }
    };

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // Light and motor outputs
    let mut light = Light::new(PinDriver::output(pins.gpio4)?);
    let mut motor = MotorDrive::new(PinDriver::output(pins.gpio5)?, config.pwm_period_ticks);

    // Audio: 8-bit samples as PWM duty
    let audio_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new()
            .frequency(Hertz(AUDIO_PWM_HZ))
            .resolution(Resolution::Bits8),
    )?;
    let mut audio = AudioOut::new(LedcDriver::new(
        peripherals.ledc.channel0,
        &audio_timer,
        pins.gpio6,
    )?);

    // Throttle potentiometer and button ladder
    let adc = AdcDriver::new(peripherals.adc1)?;
    let adc_config = AdcChannelConfig {
        attenuation: DB_11,
        ..Default::default()
    };
    let mut throttle_in = AdcChannelDriver::new(&adc, pins.gpio1, &adc_config)?;
    let mut buttons_in = AdcChannelDriver::new(&adc, pins.gpio2, &adc_config)?;

    // Fast tick: sample clock + motor soft PWM
    let timer_service = EspTaskTimerService::new()?;
    // A failed pin write is retried on the next level change.
    let fast_tick = timer_service.timer(move || {
        let _ = motor.on_fast_tick(&SHARED);
    })?;
    fast_tick.every(Duration::from_micros(config.sample_period_us() as u64))?;

    // Background log drain
    thread::Builder::new()
        .name("log_drain".into())
        .stack_size(4096)
        .spawn(|| {
            let mut text = String::new();
            loop {
                if drain_to(&LOG_STREAM, &mut text) > 0 || !text.is_empty() {
                    print!("{}", text);
                    text.clear();
                }
                thread::sleep(Duration::from_millis(DRAIN_INTERVAL_MS));
            }
        })
        .map_err(|_| EspError::from_infallible::<ESP_ERR_INVALID_ARG>())?;

    ecu_info!(
        LOG_STREAM,
        0,
        "ready: {} Hz, model every {} samples",
        config.sample_rate_hz,
        config.model_divisor()
    );

    loop {
        let Some(pass) = controller.service(&SHARED) else {
            core::hint::spin_loop();
            continue;
        };

        if audio.write(pass.sample).is_err() {
            ecu_error!(LOG_STREAM, controller.model_ticks(), "audio write failed");
        }

        if let Some(outputs) = pass.model {
            let tick = controller.model_ticks().wrapping_sub(1);
            if light.set(outputs.led).is_err() {
                ecu_error!(LOG_STREAM, tick, "light write failed");
            }

            // Sample the inputs for the next model tick; a failed read keeps
            // the previous value.
            let throttle = adc.read_raw(&mut throttle_in).map(to_adc8);
            if SHARED.refresh_throttle_adc(throttle).is_err() {
                ecu_error!(LOG_STREAM, tick, "throttle read failed");
            }
            let buttons = adc.read_raw(&mut buttons_in).map(to_adc8);
            if SHARED.refresh_buttons_adc(buttons).is_err() {
                ecu_error!(LOG_STREAM, tick, "button ladder read failed");
            }
        }
    }
}
