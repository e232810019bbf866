//! System configuration types
//!
//! The firmware embeds an `armilla.toml` which `build.rs` validates
//! and translates into a `SystemConfig` literal at compile time.

use heapless::{String, Vec};

/// Maximum stored Wi-Fi credentials.
pub const MAX_CREDENTIALS: usize = 4;

pub const MAX_SSID_LEN: usize = 32;
pub const MAX_PSK_LEN: usize = 64;

/// One known access point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WifiCredential {
    pub ssid: String<MAX_SSID_LEN>,
    pub psk: String<MAX_PSK_LEN>,
}

impl WifiCredential {
    /// Build a credential, truncating over-long input.
    ///
    /// Truncation never splits a multi-byte character, so the stored
    /// fields may be slightly shorter than the byte limits.
    pub fn new(ssid: &str, psk: &str) -> Self {
        let mut s: String<MAX_SSID_LEN> = String::new();
        let _ = s.push_str(truncate_on_boundary(ssid, MAX_SSID_LEN));
        let mut p: String<MAX_PSK_LEN> = String::new();
        let _ = p.push_str(truncate_on_boundary(psk, MAX_PSK_LEN));
        Self { ssid: s, psk: p }
    }
}

fn truncate_on_boundary(s: &str, max: usize) -> &str {
    let mut end = s.len().min(max);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shell tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemConfig {
    /// Idle window before the display blanks, in seconds.
    pub blank_after_s: u16,
    /// Initial backlight level (0..=3).
    pub brightness: u8,
    /// Known access points, consulted during scan filtering.
    pub wifi: Vec<WifiCredential, MAX_CREDENTIALS>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            blank_after_s: 15,
            brightness: 2,
            wifi: Vec::new(),
        }
    }
}

impl SystemConfig {
    pub fn idle_window_ms(&self) -> u32 {
        u32::from(self.blank_after_s) * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SystemConfig::default();
        assert_eq!(cfg.idle_window_ms(), 15_000);
        assert_eq!(cfg.brightness, 2);
        assert!(cfg.wifi.is_empty());
    }

    #[test]
    fn test_credential_truncation() {
        let long = "x".repeat(80);
        let cred = WifiCredential::new(&long, &long);
        assert_eq!(cred.ssid.len(), MAX_SSID_LEN);
        assert_eq!(cred.psk.len(), MAX_PSK_LEN);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // A two-byte character straddling the byte limit gets dropped
        // whole instead of panicking on a mid-character slice.
        let ssid = format!("{}é", "a".repeat(31));
        let psk = format!("{}é", "p".repeat(63));
        let cred = WifiCredential::new(&ssid, &psk);
        assert_eq!(cred.ssid.as_str(), "a".repeat(31));
        assert_eq!(cred.psk.as_str(), "p".repeat(63));
    }
}
