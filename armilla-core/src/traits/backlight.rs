//! Backlight control

/// Highest supported brightness level.
pub const BACKLIGHT_MAX: u8 = 3;

pub trait Backlight {
    /// Set brightness: 0 is off, 1..=3 map to board-specific supply
    /// voltages.
    fn set(&mut self, level: u8);
}
