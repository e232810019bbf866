//! Display panel control
//!
//! The shell only sequences panel power and frame gating; drawing
//! primitives belong to the rendering library and stay out of scope.

pub trait Display {
    /// Power the panel on.
    fn poweron(&mut self);

    /// Power the panel off for sleep.
    fn poweroff(&mut self);

    /// Gate pixel output while a frame is being composed. Every app
    /// switch is bracketed in mute so a partially drawn frame is never
    /// exposed.
    fn mute(&mut self, muted: bool);

    /// Clear the drawing surface to its post-boot state.
    fn reset(&mut self);
}
