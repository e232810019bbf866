//! Application capability contract
//!
//! Applications are polymorphic over an optional capability set. Every
//! hook defaults to a no-op (or "not consumed" for the predicates), and
//! the set of capabilities an application actually implements is
//! reported once via [`Application::capabilities`] and cached by the
//! container at registration time.

use crate::event::{Event, EventKind};
use crate::manager::SystemApi;

/// Capability flags reported by an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    /// Periodic ticks while foregrounded
    pub const TICK: Capabilities = Capabilities(0x01);
    /// Periodic ticks while backgrounded
    pub const TICK_BACKGROUND: Capabilities = Capabilities(0x02);
    /// Tap delivery
    pub const TOUCH: Capabilities = Capabilities(0x04);
    /// Swipe first-refusal
    pub const SWIPE: Capabilities = Capabilities(0x08);
    /// Button first-refusal
    pub const PRESS: Capabilities = Capabilities(0x10);

    pub fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

/// Error raised by an application hook.
///
/// Hook failures are contained at the container boundary: they are
/// logged and never propagate into the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppError(pub &'static str);

/// The contract every application implements.
///
/// Hooks receive the [`SystemApi`] shell context explicitly; there is
/// no global system singleton. `swipe` and `press` return `true` when
/// the event was consumed - an unconsumed event falls through to
/// shell navigation.
///
/// Implementations must be `Send`: the firmware keeps the manager
/// (and with it every registered application) behind a shared lock,
/// and hooks only ever run inside it.
pub trait Application: Send {
    /// Application name; the launcher ring is kept sorted by it.
    fn name(&self) -> &'static str;

    /// Capability set, read once at registration.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// Called when the application gains the display and input focus.
    /// Subscriptions (`request_event`) are typically made here, since
    /// the event mask is cleared on every switch.
    fn foreground(&mut self, sys: &mut SystemApi) -> Result<(), AppError> {
        let _ = sys;
        Ok(())
    }

    /// Called when the application loses focus.
    fn background(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    /// Periodic tick while foregrounded (requires `TICK`).
    fn tick(&mut self, sys: &mut SystemApi, elapsed_ms: u32) -> Result<(), AppError> {
        let _ = (sys, elapsed_ms);
        Ok(())
    }

    /// Periodic tick while backgrounded (requires `TICK_BACKGROUND`).
    fn tick_background(&mut self, sys: &mut SystemApi, elapsed_ms: u32) -> Result<(), AppError> {
        let _ = (sys, elapsed_ms);
        Ok(())
    }

    /// Tap delivery (requires `TOUCH` and a TOUCH subscription).
    fn touch(&mut self, sys: &mut SystemApi, event: Event) -> Result<(), AppError> {
        let _ = (sys, event);
        Ok(())
    }

    /// Swipe first-refusal. Return `true` to consume the event and
    /// suppress shell navigation.
    fn swipe(&mut self, sys: &mut SystemApi, event: Event) -> bool {
        let _ = (sys, event);
        false
    }

    /// Button first-refusal. Return `true` to consume the event and
    /// suppress Home navigation on release.
    fn press(&mut self, sys: &mut SystemApi, button: EventKind, pressed: bool) -> bool {
        let _ = (sys, button, pressed);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_flags() {
        let caps = Capabilities::TICK | Capabilities::TOUCH;
        assert!(caps.contains(Capabilities::TICK));
        assert!(caps.contains(Capabilities::TOUCH));
        assert!(!caps.contains(Capabilities::PRESS));
        assert!(Capabilities::NONE.contains(Capabilities::NONE));
    }

    #[test]
    fn test_default_hooks_are_noops() {
        struct Bare;
        impl Application for Bare {
            fn name(&self) -> &'static str {
                "Bare"
            }
        }

        let mut app = Bare;
        let mut sys = SystemApi::new();
        assert_eq!(app.capabilities(), Capabilities::NONE);
        assert!(app.foreground(&mut sys).is_ok());
        assert!(app.background().is_ok());
        assert!(!app.swipe(&mut sys, Event::new(EventKind::Left, 0, 0)));
        assert!(!app.press(&mut sys, EventKind::Home, true));
    }
}
