//! Crash record
//!
//! A fatal top-level fault is persisted to a fixed flash location
//! before the device restarts. The firmware captures the panic message
//! across the reset and writes it `postcard`-encoded on the next boot.

use heapless::String;

/// Marker distinguishing a valid record from erased flash.
pub const CRASH_MAGIC: u32 = 0x4152_4D43; // "ARMC"

/// Bounded fault description length.
pub const MAX_CRASH_MSG: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrashRecord {
    pub magic: u32,
    /// Uptime at the moment the record was written, in milliseconds.
    pub uptime_ms: u64,
    pub msg: String<MAX_CRASH_MSG>,
}

impl CrashRecord {
    /// Build a record, truncating an over-long description.
    pub fn new(uptime_ms: u64, msg: &str) -> Self {
        let mut bounded: String<MAX_CRASH_MSG> = String::new();
        let mut end = msg.len().min(MAX_CRASH_MSG);
        while !msg.is_char_boundary(end) {
            end -= 1;
        }
        let _ = bounded.push_str(&msg[..end]);
        Self {
            magic: CRASH_MAGIC,
            uptime_ms,
            msg: bounded,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == CRASH_MAGIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip_fields() {
        let rec = CrashRecord::new(1234, "index out of bounds");
        assert!(rec.is_valid());
        assert_eq!(rec.uptime_ms, 1234);
        assert_eq!(rec.msg.as_str(), "index out of bounds");
    }

    #[test]
    fn test_long_description_is_truncated() {
        let msg = "x".repeat(500);
        let rec = CrashRecord::new(0, &msg);
        assert!(rec.msg.len() <= MAX_CRASH_MSG);
        assert!(!rec.msg.is_empty());
    }
}
