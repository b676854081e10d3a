//! Horn sequencer tests

use tractor_ecu::audio::horn::{NOTE_TICKS, REST_TICKS};
use tractor_ecu::audio::{HornPlayer, Song, SongRecord, SONG_LIBRARY, MAX_SONG_LEN};

/// Ticks a song takes from start to stop, trailing rest included.
fn song_ticks(song: Song) -> usize {
    let notes = song.record().notes;
    let sounding = notes.iter().filter(|&&n| n != 0).count();
    let rests = notes.len() - sounding + 1;
    sounding * NOTE_TICKS as usize + rests * REST_TICKS as usize
}

fn play_to_end(horn: &mut HornPlayer) -> usize {
    let mut ticks = 0;
    while horn.is_playing() {
        horn.tick();
        ticks += 1;
        assert!(ticks < 1000, "song never ended");
    }
    ticks
}

#[test]
fn test_library_fits_working_buffer() {
    for record in SONG_LIBRARY.iter() {
        assert!(!record.notes.is_empty());
        assert!(record.notes.len() <= MAX_SONG_LEN);
    }
}

#[test]
fn test_songs_start_on_first_note() {
    let mut horn = HornPlayer::new();
    for record in SONG_LIBRARY.iter() {
        horn.play(record.song);
        assert!(horn.is_playing());
        assert_eq!(horn.note_index(), 0);
        assert_eq!(horn.increment(), record.notes[0]);
        assert_eq!(horn.song_len() as usize, record.notes.len());
    }
}

#[test]
fn test_every_song_duration() {
    for record in SONG_LIBRARY.iter() {
        let mut horn = HornPlayer::new();
        horn.play(record.song);
        assert_eq!(play_to_end(&mut horn), song_ticks(record.song), "{:?}", record.song);
    }
}

#[test]
fn test_note_sequence_followed() {
    let mut horn = HornPlayer::new();
    horn.play(Song::Dixie);

    let mut heard = Vec::new();
    let mut last_index = None;
    while horn.is_playing() {
        if last_index != Some(horn.note_index()) {
            heard.push(horn.increment());
            last_index = Some(horn.note_index());
        }
        horn.tick();
    }

    let mut expected = Song::Dixie.record().notes.to_vec();
    expected.push(0);
    assert_eq!(heard, expected);
}

#[test]
fn test_index_never_past_trailing_rest() {
    let mut horn = HornPlayer::new();
    horn.play(Song::DoubleHonk);
    while horn.is_playing() {
        horn.tick();
        assert!(horn.note_index() <= horn.song_len());
    }
    assert_eq!(horn.increment(), 0);
}

#[test]
fn test_restart_replaces_song() {
    let mut horn = HornPlayer::new();
    horn.play(Song::Dixie);
    for _ in 0..10 {
        horn.tick();
    }

    horn.play(Song::SingleHonk);
    assert_eq!(horn.song(), Some(Song::SingleHonk));
    assert_eq!(horn.note_index(), 0);
    assert_eq!(play_to_end(&mut horn), song_ticks(Song::SingleHonk));
}

#[test]
fn test_tick_when_idle_is_noop() {
    let mut horn = HornPlayer::new();
    horn.tick();
    assert!(!horn.is_playing());
    assert_eq!(horn.increment(), 0);
    assert_eq!(horn.note_index(), 0);
}

#[test]
fn test_empty_record_ignored() {
    let empty = SongRecord {
        song: Song::SingleHonk,
        notes: &[],
    };

    let mut horn = HornPlayer::new();
    horn.play_record(&empty);
    assert!(!horn.is_playing());
    assert_eq!(horn.song(), None);
    assert_eq!(horn.song_len(), 0);

    // A playing song is left alone too.
    horn.play(Song::Dixie);
    for _ in 0..6 {
        horn.tick();
    }
    let (index, increment) = (horn.note_index(), horn.increment());
    horn.play_record(&empty);
    assert!(horn.is_playing());
    assert_eq!(horn.song(), Some(Song::Dixie));
    assert_eq!(horn.note_index(), index);
    assert_eq!(horn.increment(), increment);
}

#[test]
fn test_oversize_record_ignored() {
    static LONG: [u8; MAX_SONG_LEN + 1] = [64; MAX_SONG_LEN + 1];
    let long = SongRecord {
        song: Song::Dixie,
        notes: &LONG,
    };

    let mut horn = HornPlayer::new();
    horn.play_record(&long);
    assert!(!horn.is_playing());
    assert_eq!(horn.song_len(), 0);
}

#[test]
fn test_record_at_capacity_plays() {
    static FULL: [u8; MAX_SONG_LEN] = [72; MAX_SONG_LEN];
    let full = SongRecord {
        song: Song::Dixie,
        notes: &FULL,
    };

    let mut horn = HornPlayer::new();
    horn.play_record(&full);
    assert!(horn.is_playing());
    assert_eq!(horn.song_len() as usize, MAX_SONG_LEN);
    assert_eq!(horn.increment(), 72);
}
