//! Horn song library
//!
//! Each note is the horn phase increment for one note slot (64 = the horn
//! sample's own pitch), 0 is a rest.

/// Maximum notes in a song (size of the player's working buffer).
pub const MAX_SONG_LEN: usize = 30;

/// Songs the horn knows.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Song {
    /// One long honk.
    SingleHonk = 0,
    /// Two short honks.
    DoubleHonk = 1,
    /// "Dixie", played on the horn button.
    Dixie = 2,
}

impl Song {
    /// Number of songs in the library.
    pub const COUNT: usize = 3;

    /// Look up a song by its raw id. `None` outside the library.
    #[inline]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::SingleHonk),
            1 => Some(Self::DoubleHonk),
            2 => Some(Self::Dixie),
            _ => None,
        }
    }

    /// Library record for this song.
    #[inline]
    pub fn record(self) -> &'static SongRecord {
        &SONG_LIBRARY[self as usize]
    }
}

/// Immutable library entry.
#[derive(Debug)]
pub struct SongRecord {
    pub song: Song,
    pub notes: &'static [u8],
}

/// The library, indexed by [`Song`] discriminant.
pub static SONG_LIBRARY: [SongRecord; Song::COUNT] = [
    SongRecord {
        song: Song::SingleHonk,
        notes: &[64, 64, 64],
    },
    SongRecord {
        song: Song::DoubleHonk,
        notes: &[64, 64, 0, 64, 64],
    },
    SongRecord {
        song: Song::Dixie,
        notes: &[
            64, 80, 64, 64, 0, 64, 64, 0, 64, 72, 80, 85, 96, 96, 0, 96, 96, 0, 96, 96, 0, 80, 80,
        ],
    },
];
