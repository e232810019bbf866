//! User interface events and subscription masks
//!
//! The discriminant values are wire-stable: they are the codes the
//! original shell protocol uses and must not be renumbered.

/// Interface actions delivered to the shell and to applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum EventKind {
    /// Downward swipe
    Down = 1,
    /// Upward swipe
    Up = 2,
    /// Leftward swipe
    Left = 3,
    /// Rightward swipe
    Right = 4,
    /// Tap on the panel
    Touch = 5,
    /// Hardware button, home semantics
    Home = 256,
    /// Hardware button, back semantics
    Back = 257,
}

impl EventKind {
    /// Directional swipe events (the four navigation directions).
    pub fn is_swipe(self) -> bool {
        matches!(
            self,
            EventKind::Down | EventKind::Up | EventKind::Left | EventKind::Right
        )
    }

    /// Whether a swipe runs along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, EventKind::Down | EventKind::Up)
    }
}

/// A classified input event carrying the final contact position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    pub kind: EventKind,
    pub x: i16,
    pub y: i16,
}

impl Event {
    pub fn new(kind: EventKind, x: i16, y: i16) -> Self {
        Self { kind, x, y }
    }
}

/// Event categories an application can subscribe to.
///
/// The mask is owned by the system manager and cleared on every app
/// switch: a freshly foregrounded app starts unsubscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventMask(u16);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    pub const TOUCH: EventMask = EventMask(0x0001);
    pub const SWIPE_LEFTRIGHT: EventMask = EventMask(0x0002);
    pub const SWIPE_UPDOWN: EventMask = EventMask(0x0004);
    pub const BUTTON: EventMask = EventMask(0x0008);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: EventMask) {
        self.0 |= other.0;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Whether the mask claims the axis a given swipe travels on.
    pub fn claims_swipe(self, kind: EventKind) -> bool {
        if kind.is_vertical() {
            self.contains(EventMask::SWIPE_UPDOWN)
        } else {
            self.contains(EventMask::SWIPE_LEFTRIGHT)
        }
    }
}

impl core::ops::BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: EventMask) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_codes_are_wire_stable() {
        assert_eq!(EventKind::Down as u16, 1);
        assert_eq!(EventKind::Up as u16, 2);
        assert_eq!(EventKind::Left as u16, 3);
        assert_eq!(EventKind::Right as u16, 4);
        assert_eq!(EventKind::Touch as u16, 5);
        assert_eq!(EventKind::Home as u16, 256);
        assert_eq!(EventKind::Back as u16, 257);
    }

    #[test]
    fn test_mask_operations() {
        let mut mask = EventMask::NONE;
        assert!(mask.is_empty());

        mask.insert(EventMask::TOUCH | EventMask::BUTTON);
        assert!(mask.contains(EventMask::TOUCH));
        assert!(mask.contains(EventMask::BUTTON));
        assert!(!mask.contains(EventMask::SWIPE_UPDOWN));

        mask.clear();
        assert!(mask.is_empty());
    }

    #[test]
    fn test_mask_claims_swipe_axis() {
        let updown = EventMask::SWIPE_UPDOWN;
        assert!(updown.claims_swipe(EventKind::Up));
        assert!(updown.claims_swipe(EventKind::Down));
        assert!(!updown.claims_swipe(EventKind::Left));

        let leftright = EventMask::SWIPE_LEFTRIGHT;
        assert!(leftright.claims_swipe(EventKind::Right));
        assert!(!leftright.claims_swipe(EventKind::Up));
    }
}
