//! Wavetables for the engine drone and the horn
//!
//! Both tracks are unsigned 8-bit, centred on [`SILENCE`], generated at
//! compile time with integer-only const fns (no table needs to be loaded
//! at runtime and nothing here touches floating point).
//!
//! - Engine: 400 samples = four firing pulses of 100 samples. Played at
//!   one sample per tick (8 kHz) at idle speed.
//! - Horn: 256 samples = eight periods of 32 samples, i.e. 250 Hz when a
//!   note advances one sample per tick.

/// Mid-scale level: the value of an idle track.
pub const SILENCE: u8 = 128;

/// Engine track length in samples.
pub const ENGINE_TRACK_LEN: usize = 400;

/// Engine track fractional precision (bits below the sample index).
pub const ENGINE_FRAC_BITS: u32 = 4;

/// Horn track length in samples.
pub const HORN_TRACK_LEN: usize = 256;

/// Horn track fractional precision: finer than the engine so more pitches
/// can be told apart.
pub const HORN_FRAC_BITS: u32 = 6;

/// A looping wavetable plus the fixed-point format of its phase.
#[derive(Debug, Clone, Copy)]
pub struct Wavetable {
    samples: &'static [u8],
    frac_bits: u32,
    /// `len << frac_bits`, the phase wrap point.
    limit: u16,
    /// Sub-sample offset splitting the three interpolation zones.
    third: u16,
}

impl Wavetable {
    /// Describe a table sampled with `frac_bits` of sub-sample precision.
    ///
    /// # Panics
    ///
    /// At compile time if the table is empty or if the scaled length plus a
    /// full 8-bit increment does not fit the 16-bit phase.
    pub const fn new(samples: &'static [u8], frac_bits: u32) -> Self {
        assert!(!samples.is_empty(), "wavetable must not be empty");
        assert!(
            (samples.len() << frac_bits) + u8::MAX as usize <= u16::MAX as usize,
            "wavetable phase must fit 16 bits"
        );

        let scale = 1u16 << frac_bits;
        Self {
            samples,
            frac_bits,
            limit: (samples.len() << frac_bits) as u16,
            third: scale / 3,
        }
    }

    /// Number of samples.
    #[inline]
    pub const fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: empty tables are rejected at construction.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Phase value at which the cursor wraps back to zero.
    #[inline]
    pub const fn phase_limit(&self) -> u16 {
        self.limit
    }

    /// Sub-sample scale (`1 << frac_bits`).
    #[inline]
    pub const fn scale(&self) -> u16 {
        1 << self.frac_bits
    }

    /// Raw sample at `index`, wrapping to the start past the end.
    #[inline]
    pub fn sample(&self, index: usize) -> u8 {
        if index >= self.samples.len() {
            self.samples[0]
        } else {
            self.samples[index]
        }
    }

    /// Three-point interpolated read at a fixed-point `phase`.
    ///
    /// - first third of a sample step: the sample below
    /// - last third: the sample above
    /// - middle: both halved and summed
    #[inline]
    pub fn read(&self, phase: u16) -> u8 {
        let index = (phase >> self.frac_bits) as usize;
        let offset = phase & (self.scale() - 1);

        let below = self.sample(index);
        let above = self.sample(index + 1);

        if offset < self.third {
            below
        } else if offset < self.scale() - self.third {
            (below >> 1) + (above >> 1)
        } else {
            above
        }
    }
}

/// Engine drone samples.
pub static ENGINE_RUNNING: [u8; ENGINE_TRACK_LEN] = engine_running();

/// Horn samples.
pub static TRACTOR_HORN: [u8; HORN_TRACK_LEN] = tractor_horn();

/// Engine track descriptor.
pub static ENGINE_TRACK: Wavetable = Wavetable::new(&ENGINE_RUNNING, ENGINE_FRAC_BITS);

/// Horn track descriptor.
pub static HORN_TRACK: Wavetable = Wavetable::new(&TRACTOR_HORN, HORN_FRAC_BITS);

/// Integer sine over one 256-step turn, amplitude ±127.
///
/// Two parabolic half-waves; within 6 % of a true sine, plenty for 8-bit audio.
const fn isin(phase: u8) -> i16 {
    let x = (phase & 0x7F) as i16; // position inside the half-wave
    let mut y = (x * (128 - x)) >> 5; // 0..=128
    if y > 127 {
        y = 127;
    }
    if phase & 0x80 != 0 {
        -y
    } else {
        y
    }
}

/// One step of a 16-bit Galois LFSR (taps 16, 14, 13, 11).
const fn lfsr_step(state: u16) -> u16 {
    let lsb = state & 1;
    let next = state >> 1;
    if lsb != 0 {
        next ^ 0xB400
    } else {
        next
    }
}

const fn clamp_u8(value: i16) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

const fn engine_running() -> [u8; ENGINE_TRACK_LEN] {
    const PULSE_LEN: usize = 100;
    // Uneven cylinders give the drone its lope.
    const CYLINDER_GAIN: [i16; 4] = [8, 6, 7, 5];

    let mut table = [SILENCE; ENGINE_TRACK_LEN];
    let mut noise = 0xACE1u16;
    let mut i = 0;
    while i < ENGINE_TRACK_LEN {
        let pos = i % PULSE_LEN;
        let gain = CYLINDER_GAIN[i / PULSE_LEN];
        let envelope = (PULSE_LEN - pos) as i16; // 100..=1

        // Exhaust bark: eight ring cycles per pulse, decaying.
        let ring = isin(((pos * 2048 / PULSE_LEN) & 0xFF) as u8);
        let bark = (ring * envelope / PULSE_LEN as i16) * gain / 16;

        // Block body: one slow cycle per pulse.
        let body = isin(((pos * 256 / PULSE_LEN) & 0xFF) as u8) / 6;

        noise = lfsr_step(noise);
        let hiss = (noise & 0x0F) as i16 - 8;

        table[i] = clamp_u8(SILENCE as i16 + bark + body + hiss);
        i += 1;
    }
    table
}

const fn tractor_horn() -> [u8; HORN_TRACK_LEN] {
    const PERIOD: usize = 32;
    const STEP: usize = 256 / PERIOD;

    let mut table = [SILENCE; HORN_TRACK_LEN];
    let mut i = 0;
    while i < HORN_TRACK_LEN {
        let phase = ((i * STEP) & 0xFF) as u8;
        let fundamental = isin(phase);
        let second = isin(phase.wrapping_mul(2));
        let third = isin(phase.wrapping_mul(3));

        // Brassy: strong odd harmonic on top of the fundamental.
        let value = (fundamental * 2 + second + third) / 6;

        table[i] = clamp_u8(SILENCE as i16 + value);
        i += 1;
    }
    table
}
