//! Two-track wavetable synth: engine drone + horn
//!
//! Each track has its own fixed-point phase accumulator. Pitch comes from
//! the increment (engine speed, or the current horn note), never from a
//! multiply or divide in the sample path.

use super::horn::HornPlayer;
use super::songs::Song;
use super::wavetable::{Wavetable, ENGINE_TRACK, HORN_TRACK, SILENCE};

/// Fixed-point playback cursor over one [`Wavetable`].
///
/// Invariant: `phase < table.phase_limit()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseCursor {
    phase: u16,
}

impl PhaseCursor {
    /// Cursor at the start of the table.
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> u16 {
        self.phase
    }

    /// Back to the start of the table.
    #[inline]
    pub fn reset(&mut self) {
        self.phase = 0;
    }

    /// Advance by `increment` (wrapping at the table end) and read.
    #[inline]
    pub fn advance(&mut self, increment: u8, table: &Wavetable) -> u8 {
        self.phase += increment as u16;
        if self.phase >= table.phase_limit() {
            self.phase -= table.phase_limit();
        }
        table.read(self.phase)
    }
}

/// Mix the two tracks: the horn rides on the engine after its silence
/// offset is removed, saturated to 8 bits.
#[inline]
pub fn mix(engine: u8, horn: u8) -> u8 {
    let sample = engine as i16 + horn as i16 - SILENCE as i16;
    sample.clamp(0, u8::MAX as i16) as u8
}

/// Audio synthesis engine.
///
/// # Example
///
/// ```
/// use tractor_ecu::audio::{AudioEngine, SILENCE};
///
/// let mut audio = AudioEngine::new();
/// assert_eq!(audio.next_sample(0), SILENCE); // engine stopped, horn idle
/// ```
#[derive(Debug, Clone)]
pub struct AudioEngine {
    engine: PhaseCursor,
    horn_cursor: PhaseCursor,
    horn: HornPlayer,
}

impl AudioEngine {
    /// Engine stopped, horn idle.
    pub const fn new() -> Self {
        Self {
            engine: PhaseCursor::new(),
            horn_cursor: PhaseCursor::new(),
            horn: HornPlayer::new(),
        }
    }

    /// Produce one mixed sample. Call at the sample rate.
    ///
    /// `engine_speed` is the public engine speed (BP6, 64 = idle).
    #[inline]
    pub fn next_sample(&mut self, engine_speed: u8) -> u8 {
        let engine_sample = if engine_speed != 0 {
            // Engine track: 4 fractional bits, speed / 4 per sample.
            self.engine.advance(engine_speed >> 2, &ENGINE_TRACK)
        } else {
            self.engine.reset();
            SILENCE
        };

        let increment = self.horn.increment();
        let horn_sample = if self.horn.is_playing() && increment != 0 {
            self.horn_cursor.advance(increment, &HORN_TRACK)
        } else {
            self.horn_cursor.reset();
            SILENCE
        };

        mix(engine_sample, horn_sample)
    }

    /// Start horn song `id`; unknown ids are ignored.
    #[inline]
    pub fn play_song(&mut self, id: u8) {
        self.horn.play_song(id);
    }

    /// Start `song` on the horn.
    #[inline]
    pub fn play(&mut self, song: Song) {
        self.horn.play(song);
    }

    /// Advance the horn sequencer. Call at the model rate.
    #[inline]
    pub fn horn_tick(&mut self) {
        self.horn.tick();
    }

    /// Horn sequencer state.
    #[inline]
    pub fn horn(&self) -> &HornPlayer {
        &self.horn
    }

    /// Horn sequencer, for the engine model to trigger songs.
    #[inline]
    pub fn horn_mut(&mut self) -> &mut HornPlayer {
        &mut self.horn
    }

    /// Engine track cursor.
    #[inline]
    pub fn engine_cursor(&self) -> &PhaseCursor {
        &self.engine
    }

    /// Horn track cursor.
    #[inline]
    pub fn horn_cursor(&self) -> &PhaseCursor {
        &self.horn_cursor
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}
