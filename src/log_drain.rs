//! Log drain formatting.
//!
//! Renders [`LogEntry`] values as text lines for whatever sink the board
//! has (serial console on the firmware, stdout in tests).
//!
//! Format: `[tick] LEVEL: message\n`

use core::fmt::Write;

use crate::logging::{BufWriter, LogEntry, LogStream};

/// Longest formatted line.
pub const MAX_LINE_LEN: usize = 128;

/// Format a log entry into `buf`. Returns the number of bytes written.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };

    let _ = writeln!(
        writer,
        "[{:8}] {}: {}",
        entry.tick,
        entry.level.as_str(),
        core::str::from_utf8(entry.message()).unwrap_or("<invalid utf8>")
    );

    writer.pos
}

/// Drain every pending entry of `stream` into `sink`.
///
/// Reports and resets the dropped counter after the entries. Returns the
/// number of entries written.
pub fn drain_to<W: Write, const N: usize>(stream: &LogStream<N>, sink: &mut W) -> usize {
    let mut line = [0u8; MAX_LINE_LEN];
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut line);
        if let Ok(text) = core::str::from_utf8(&line[..len]) {
            let _ = sink.write_str(text);
        }
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = writeln!(sink, "[WARN] Dropped: {}", dropped);
        stream.reset_dropped();
    }

    written
}
