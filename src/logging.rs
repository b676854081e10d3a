//! Non-blocking logging for the control loop.
//!
//! # Architecture
//!
//! ```text
//! Control loop           LogStream            Drain (background)
//! ────────────           ─────────            ──────────────────
//!
//! ecu_info!() ────────▶ [L0][L1][L2] ──────▶ serial console
//! bounded, no wait       ring buffer          blocking ok
//! ```
//!
//! # Rules
//!
//! - The control loop shares its time with the 8 kHz sample deadline: it
//!   never blocks on a log call
//! - The fast tick (timer callback) never logs
//! - Messages are dropped, and counted, when the ring is full
//! - Entries are stamped with the model tick number, not wall time

use core::cell::UnsafeCell;
use portable_atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 80;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 32;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Model tick the entry was written on.
    pub tick: u32,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        tick: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text.
    pub fn message(&self) -> &[u8] {
        &self.msg[..self.len as usize]
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log ring (single producer, single consumer).
///
/// - The control loop pushes, never blocks
/// - Drain runs at leisure on the background side
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
    min_level: LogLevel,
}

// SAFETY: One producer (control loop) owns the slots between read and
// write index; the consumer only reads slots the producer has published
// with a Release store of write_idx.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream keeping everything up to Debug.
    pub const fn new() -> Self {
        Self::with_level(LogLevel::Debug)
    }

    /// Create a new empty log stream keeping levels up to `min_level`.
    pub const fn with_level(min_level: LogLevel) -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            min_level,
        }
    }

    /// Whether entries at `level` are kept.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if filtered or dropped.
    /// Must only be called from the single producer.
    #[inline]
    pub fn push(&self, tick: u32, level: LogLevel, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: Single producer; the slot at `write` is not visible to the
        // consumer until write_idx is published below.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.tick = tick;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if no entries available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer; the slot was published by the producer.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating at the buffer end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// `core::fmt::Write` over a byte slice, silently truncating.
pub(crate) struct BufWriter<'a> {
    pub(crate) buf: &'a mut [u8],
    pub(crate) pos: usize,
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Log macro for the control loop.
///
/// # Example
///
/// ```ignore
/// ecu_log!(LogLevel::Info, LOG_STREAM, tick, "status {:?}", status);
/// ```
#[macro_export]
macro_rules! ecu_log {
    ($level:expr, $stream:expr, $tick:expr, $($arg:tt)*) => {{
        if $stream.enabled($level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($tick, $level, &buf[..len]);
        }
    }};
}

/// Error log.
#[macro_export]
macro_rules! ecu_error {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::ecu_log!($crate::logging::LogLevel::Error, $stream, $tick, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! ecu_warn {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::ecu_log!($crate::logging::LogLevel::Warn, $stream, $tick, $($arg)*)
    };
}

/// Info log.
#[macro_export]
macro_rules! ecu_info {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::ecu_log!($crate::logging::LogLevel::Info, $stream, $tick, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! ecu_debug {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::ecu_log!($crate::logging::LogLevel::Debug, $stream, $tick, $($arg)*)
    };
}

/// Trace log (maximum verbosity).
#[macro_export]
macro_rules! ecu_trace {
    ($stream:expr, $tick:expr, $($arg:tt)*) => {
        $crate::ecu_log!($crate::logging::LogLevel::Trace, $stream, $tick, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(7, LogLevel::Info, b"engine running"));
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.tick, 7);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), b"engine running");

        assert_eq!(stream.pending(), 0);
        assert!(stream.drain().is_none());
    }

    #[test]
    fn test_log_stream_full() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(1, LogLevel::Info, b"1"));
        assert!(stream.push(2, LogLevel::Info, b"2"));
        assert!(stream.push(3, LogLevel::Info, b"3"));
        assert!(stream.push(4, LogLevel::Info, b"4"));

        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        stream.drain();
        assert!(stream.push(6, LogLevel::Info, b"6"));
    }

    #[test]
    fn test_level_filter() {
        let stream = LogStream::<4>::with_level(LogLevel::Warn);

        assert!(!stream.push(1, LogLevel::Info, b"quiet"));
        assert!(stream.push(1, LogLevel::Error, b"loud"));
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<2>::new();
        let long = [b'x'; MAX_MSG_LEN + 10];

        assert!(stream.push(0, LogLevel::Warn, &long));
        assert_eq!(stream.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_macro_formats() {
        let stream = LogStream::<4>::new();
        crate::ecu_info!(stream, 3, "speed {}", 64);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.message(), b"speed 64");
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 8];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 4242));
        assert_eq!(&buf[..len], b"Hello 42");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_producer_consumer_threads() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let producer = {
            let stream = Arc::clone(&stream);
            thread::spawn(move || {
                for tick in 0..200u32 {
                    let _ = stream.push(tick, LogLevel::Info, b"tick");
                }
            })
        };

        let mut last = None;
        let mut received = 0;
        while received + stream.dropped() < 200 {
            if let Some(entry) = stream.drain() {
                if let Some(prev) = last {
                    assert!(entry.tick > prev, "entries must stay in order");
                }
                last = Some(entry.tick);
                received += 1;
            } else {
                thread::yield_now();
            }
        }
        producer.join().unwrap();
        assert!(received > 0);
    }
}
