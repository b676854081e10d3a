//! Audio subsystem: engine drone and horn songs
//!
//! Architecture:
//! - Wavetables: compile-time generated, unsigned 8-bit, mid-scale silence
//! - Synth: two phase accumulators, 3-point interpolation, saturating mix
//! - Horn: song sequencer ticked at the model rate
//! - Output: one u8 sample per tick @ 8 kHz

pub mod wavetable;
pub mod songs;
pub mod horn;
pub mod synth;

pub use horn::HornPlayer;
pub use songs::{Song, SongRecord, SONG_LIBRARY, MAX_SONG_LEN};
pub use synth::{mix, AudioEngine, PhaseCursor};
pub use wavetable::{Wavetable, ENGINE_TRACK, HORN_TRACK, SILENCE};
