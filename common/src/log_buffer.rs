//! Log buffer with levels and timestamps.
//!
//! A circular buffer of recent log entries that the host loop drains (the
//! simulator prints them, firmware can show them on a diagnostics screen).
//! Each entry has a level, a message and a timestamp.
//!
//! # Log Levels
//!
//! - `Trace`: verbose debugging
//! - `Debug`: debugging information
//! - `Info`: normal operation (context switches, calls)
//! - `Warn`: rejected requests, skipped elements
//! - `Error`: configuration errors (missing roots)
//!
//! # Clock
//!
//! The core never reads hardware time. The host loop advances a monotonic
//! millisecond clock with [`set_clock_ms`] and entries are stamped from it.
//!
//! # Usage
//!
//! ```ignore
//! use yatramate_common::{log_info, log_warn};
//!
//! log_info!("ctx -> {}", ctx);
//! log_warn!("request {} rejected", raw);
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use heapless::String;

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 32;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 64;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Verbose debugging
    Trace = 0,
    /// Debug information
    Debug = 1,
    /// Normal operation
    #[default]
    Info = 2,
    /// Warnings
    Warn = 3,
    /// Errors
    Error = 4,
}

impl LogLevel {
    /// Single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single log entry with level, message, and timestamp.
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// Log severity level.
    pub level: LogLevel,
    /// Log message (truncated to LOG_MSG_LEN).
    pub message: String<LOG_MSG_LEN>,
    /// Milliseconds on the host clock when the entry was pushed.
    pub timestamp_ms: u32,
}

impl LogEntry {
    /// Create a new log entry, truncating the message.
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u32,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for c in message.chars() {
            if msg.push(c).is_err() {
                break;
            }
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            message: String::new(),
            timestamp_ms: 0,
        }
    }
}

/// Circular buffer of log entries.
pub struct LogBuffer {
    entries: [LogEntry; LOG_ENTRIES],
    head: usize, // Next write position
    count: usize,
    pushed: u32,
}

impl LogBuffer {
    /// Create a new empty log buffer.
    pub const fn new() -> Self {
        Self {
            entries: [const {
                LogEntry {
                    level: LogLevel::Info,
                    message: String::new(),
                    timestamp_ms: 0,
                }
            }; LOG_ENTRIES],
            head: 0,
            count: 0,
            pushed: 0,
        }
    }

    /// Push a new log entry. Oldest entry is dropped if buffer is full.
    pub fn push(
        &mut self,
        entry: LogEntry,
    ) {
        self.entries[self.head] = entry;
        self.head = (self.head + 1) % LOG_ENTRIES;
        if self.count < LOG_ENTRIES {
            self.count += 1;
        }
        self.pushed = self.pushed.wrapping_add(1);
    }

    /// Get the number of entries in the buffer.
    #[inline]
    pub const fn len(&self) -> usize { self.count }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Entries ever pushed (wrapping). Consumers compare it with the value
    /// they saw last time to find out how many entries are new.
    #[inline]
    pub const fn total_pushed(&self) -> u32 { self.pushed }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> LogBufferIter<'_> {
        let start = if self.count < LOG_ENTRIES { 0 } else { self.head };
        LogBufferIter {
            buffer: self,
            pos: start,
            remaining: self.count,
        }
    }

    /// The newest `n` entries (fewer if the buffer holds fewer), oldest first.
    pub fn latest(
        &self,
        n: usize,
    ) -> impl Iterator<Item = &LogEntry> {
        self.iter().skip(self.count - n.min(self.count))
    }
}

impl Default for LogBuffer {
    fn default() -> Self { Self::new() }
}

/// Iterator over log buffer entries (oldest to newest).
pub struct LogBufferIter<'a> {
    buffer: &'a LogBuffer,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for LogBufferIter<'a> {
    type Item = &'a LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.buffer.entries[self.pos];
        self.pos = (self.pos + 1) % LOG_ENTRIES;
        self.remaining -= 1;
        Some(entry)
    }
}

/// Global log buffer protected by a mutex.
pub static LOG_BUFFER: Mutex<CriticalSectionRawMutex, LogBuffer> = Mutex::new(LogBuffer::new());

static CLOCK_MS: AtomicU32 = AtomicU32::new(0);

/// Advance the log clock. Called by the host loop once per tick.
#[inline]
pub fn set_clock_ms(now_ms: u32) { CLOCK_MS.store(now_ms, Ordering::Relaxed); }

/// Current log timestamp in milliseconds.
#[inline]
pub fn current_timestamp_ms() -> u32 { CLOCK_MS.load(Ordering::Relaxed) }

/// Push a log entry to the global buffer.
///
/// This is non-blocking - if the mutex is held, the log is dropped.
pub fn push_log(
    level: LogLevel,
    message: &str,
) {
    #[cfg(feature = "defmt")]
    match level {
        LogLevel::Trace => defmt::trace!("{=str}", message),
        LogLevel::Debug => defmt::debug!("{=str}", message),
        LogLevel::Info => defmt::info!("{=str}", message),
        LogLevel::Warn => defmt::warn!("{=str}", message),
        LogLevel::Error => defmt::error!("{=str}", message),
    }

    let entry = LogEntry::new(level, message, current_timestamp_ms());

    if let Ok(mut buffer) = LOG_BUFFER.try_lock() {
        buffer.push(entry);
    }
}

/// Log a message at Info level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::log_buffer::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Info, buf.as_str());
    }};
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::log_buffer::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Warn, buf.as_str());
    }};
}

/// Log a message at Error level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::log_buffer::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Error, buf.as_str());
    }};
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::log_buffer::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::log_buffer::push_log($crate::log_buffer::LogLevel::Debug, buf.as_str());
    }};
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_truncates_message() {
        let long = "x".repeat(LOG_MSG_LEN + 10);
        let entry = LogEntry::new(LogLevel::Warn, &long, 5);
        assert_eq!(entry.message.len(), LOG_MSG_LEN);
        assert_eq!(entry.timestamp_ms, 5);
    }

    #[test]
    fn test_buffer_wraps_oldest_first() {
        let mut buffer = LogBuffer::new();
        for i in 0..(LOG_ENTRIES as u32 + 3) {
            buffer.push(LogEntry::new(LogLevel::Info, "m", i));
        }
        assert_eq!(buffer.len(), LOG_ENTRIES);
        assert_eq!(buffer.total_pushed(), LOG_ENTRIES as u32 + 3);
        let first = buffer.iter().next().map(|e| e.timestamp_ms);
        assert_eq!(first, Some(3));
        let last = buffer.iter().last().map(|e| e.timestamp_ms);
        assert_eq!(last, Some(LOG_ENTRIES as u32 + 2));
    }

    #[test]
    fn test_latest() {
        let mut buffer = LogBuffer::new();
        for i in 0..4 {
            buffer.push(LogEntry::new(LogLevel::Info, "m", i));
        }
        let stamps: Vec<u32> = buffer.latest(2).map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps, vec![2, 3]);
        assert_eq!(buffer.latest(10).count(), 4);
        assert_eq!(buffer.latest(0).count(), 0);
    }

    #[test]
    fn test_macro_pushes_to_global_buffer() {
        // Other tests log concurrently; a contended push is dropped, so retry.
        let mut found = false;
        for _ in 0..100 {
            crate::log_warn!("probe {}", 42);
            if let Ok(buffer) = LOG_BUFFER.try_lock() {
                found = buffer.iter().any(|e| e.message == "probe 42" && e.level == LogLevel::Warn);
            }
            if found {
                break;
            }
        }
        assert!(found);
    }

    #[test]
    fn test_level_prefix() {
        assert_eq!(LogLevel::Error.prefix(), 'E');
        assert!(LogLevel::Warn > LogLevel::Info);
    }
}
