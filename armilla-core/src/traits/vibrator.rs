//! Haptic feedback

pub trait Vibrator {
    /// One short haptic pulse.
    fn pulse(&mut self);
}
