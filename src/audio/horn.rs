//! Horn song sequencer
//!
//! Ticked at the model rate (25 Hz), not the sample rate. Exposes the
//! current note's phase increment to the synth.

use super::songs::{Song, SongRecord, MAX_SONG_LEN};

/// Model ticks a sounding note lasts (160 ms).
pub const NOTE_TICKS: u8 = 4;

/// Model ticks a rest lasts (40 ms).
pub const REST_TICKS: u8 = 1;

/// Horn player.
///
/// The song is copied out of the library into a working buffer when it
/// starts, so playback never reads the static table again.
///
/// After the last note the cursor parks on one trailing rest slot
/// (`note_index == len`) before playback stops.
#[derive(Debug, Clone)]
pub struct HornPlayer {
    notes: [u8; MAX_SONG_LEN],
    len: u8,
    song: Option<Song>,
    note_index: u8,
    note_ticks: u8,
    increment: u8,
    playing: bool,
}

impl HornPlayer {
    /// Create an idle player with an empty song.
    pub const fn new() -> Self {
        Self {
            notes: [0; MAX_SONG_LEN],
            len: 0,
            song: None,
            note_index: 0,
            note_ticks: 0,
            increment: 0,
            playing: false,
        }
    }

    /// Start the song with raw id `id`. Unknown ids are ignored.
    #[inline]
    pub fn play_song(&mut self, id: u8) {
        if let Some(song) = Song::from_id(id) {
            self.play(song);
        }
    }

    /// Start `song` from its first note, replacing whatever was playing.
    pub fn play(&mut self, song: Song) {
        self.play_record(song.record());
    }

    /// Start playing `record`. Empty records and records longer than
    /// [`MAX_SONG_LEN`] are ignored and leave the player as it was.
    pub fn play_record(&mut self, record: &SongRecord) {
        let len = record.notes.len();
        if len == 0 || len > MAX_SONG_LEN {
            return;
        }

        self.notes = [0; MAX_SONG_LEN];
        self.notes[..len].copy_from_slice(record.notes);
        self.len = len as u8;
        self.song = Some(record.song);
        self.note_index = 0;
        self.note_ticks = 0;
        self.increment = self.notes[0];
        self.playing = true;
    }

    /// Advance the song by one model tick.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }

        let duration = if self.increment != 0 {
            NOTE_TICKS
        } else {
            REST_TICKS
        };

        self.note_ticks += 1;
        if self.note_ticks >= duration {
            self.note_ticks = 0;
            if self.note_index >= self.len {
                self.playing = false;
            } else {
                self.note_index += 1;
            }
        }

        self.increment = self.note(self.note_index);
    }

    /// Note at `index` of the working song; the trailing slot reads as a rest.
    #[inline]
    fn note(&self, index: u8) -> u8 {
        self.notes[..self.len as usize]
            .get(index as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Whether a song is in progress.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Horn phase increment for the current note (0 = rest).
    #[inline]
    pub fn increment(&self) -> u8 {
        self.increment
    }

    /// Last song started, if any.
    #[inline]
    pub fn song(&self) -> Option<Song> {
        self.song
    }

    /// Cursor into the working song.
    #[inline]
    pub fn note_index(&self) -> u8 {
        self.note_index
    }

    /// Length of the working song.
    #[inline]
    pub fn song_len(&self) -> u8 {
        self.len
    }
}

impl Default for HornPlayer {
    fn default() -> Self {
        Self::new()
    }
}
