//! Power state machine
//!
//! Owns the awake/asleep state, the single idle-timer deadline and the
//! may-sleep gate. The async sleep loop and the actual light-sleep
//! primitive live in the firmware; everything here is pure bookkeeping
//! so the invariants stay host-testable.

/// Idle window armed after user input, in milliseconds.
pub const DEFAULT_IDLE_MS: u32 = 15_000;

/// Short re-arm window after a background (periodic) wake.
pub const BACKGROUND_IDLE_MS: u32 = 15_000;

/// Bounded light-sleep quantum for one sleep-loop iteration.
pub const SLEEP_QUANTUM_MS: u32 = 300_000;

/// Grace period before the sleep loop's first iteration.
pub const BOOT_GRACE_MS: u32 = 15_000;

/// Hardware wake-reason code for user input.
pub const WAKE_REASON_USER: u32 = 2;

/// Hardware wake-reason code for the periodic timer.
pub const WAKE_REASON_TIMER: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    Awake,
    Sleeping,
}

/// Classified cause for exiting the light sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeKind {
    /// User input; restore the display and foreground the current app.
    UserInput,
    /// Periodic timer; permit scheduled background work only.
    Periodic,
    /// Anything else is spurious and ignored.
    Spurious,
}

impl WakeKind {
    pub fn from_code(code: u32) -> WakeKind {
        match code {
            WAKE_REASON_USER => WakeKind::UserInput,
            WAKE_REASON_TIMER => WakeKind::Periodic,
            _ => WakeKind::Spurious,
        }
    }
}

/// Idle timer and sleep gate bookkeeping.
///
/// The deadline is a single `Option`: re-arming replaces any pending
/// deadline, so there is never more than one timer outstanding.
pub struct PowerManager {
    state: PowerState,
    idle_ms: u32,
    deadline_ms: Option<u64>,
    may_sleep: bool,
    charging_at_sleep: bool,
}

impl PowerManager {
    pub fn new(idle_ms: u32) -> Self {
        Self {
            state: PowerState::Awake,
            idle_ms,
            deadline_ms: None,
            may_sleep: false,
            charging_at_sleep: false,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn may_sleep(&self) -> bool {
        self.may_sleep
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    pub fn idle_window_ms(&self) -> u32 {
        self.idle_ms
    }

    /// Charging flag captured when the device last entered sleep.
    pub fn charging_at_sleep(&self) -> bool {
        self.charging_at_sleep
    }

    /// Re-arm the idle timer for the default window and close the
    /// may-sleep gate.
    pub fn keep_awake(&mut self, now_ms: u64) {
        self.keep_awake_for(now_ms, self.idle_ms);
    }

    /// Re-arm the idle timer for an explicit window. Any pending
    /// deadline is replaced.
    pub fn keep_awake_for(&mut self, now_ms: u64, window_ms: u32) {
        self.deadline_ms = Some(now_ms + u64::from(window_ms));
        self.may_sleep = false;
    }

    /// Cancel the idle timer and open the may-sleep gate.
    pub fn release(&mut self) {
        self.deadline_ms = None;
        self.may_sleep = true;
    }

    /// Convert an elapsed deadline into a release. Returns `true` if
    /// the gate opened on this call.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                debug!("idle timer expired");
                self.release();
                true
            }
            _ => false,
        }
    }

    /// Record sleep entry, caching the charging flag.
    pub fn note_sleep(&mut self, charging: bool) {
        self.state = PowerState::Sleeping;
        self.charging_at_sleep = charging;
    }

    /// Record a user-initiated wake.
    pub fn note_wake(&mut self) {
        self.state = PowerState::Awake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_replaces_pending_deadline() {
        let mut pm = PowerManager::new(DEFAULT_IDLE_MS);

        pm.keep_awake_for(1_000, 5_000);
        pm.keep_awake_for(2_000, 5_000);

        // Exactly one pending timer, holding the most recent deadline.
        assert_eq!(pm.deadline_ms(), Some(7_000));
        assert!(!pm.may_sleep());
    }

    #[test]
    fn test_release_cancels_and_opens_gate() {
        let mut pm = PowerManager::new(DEFAULT_IDLE_MS);

        pm.keep_awake(0);
        assert!(pm.deadline_ms().is_some());

        pm.release();
        assert_eq!(pm.deadline_ms(), None);
        assert!(pm.may_sleep());
    }

    #[test]
    fn test_poll_releases_only_at_expiry() {
        let mut pm = PowerManager::new(DEFAULT_IDLE_MS);

        pm.keep_awake(0);
        assert!(!pm.poll(DEFAULT_IDLE_MS as u64 - 1));
        assert!(!pm.may_sleep());

        assert!(pm.poll(DEFAULT_IDLE_MS as u64));
        assert!(pm.may_sleep());
        assert_eq!(pm.deadline_ms(), None);

        // Nothing pending; further polls are no-ops.
        assert!(!pm.poll(u64::MAX));
    }

    #[test]
    fn test_wake_reason_codes() {
        assert_eq!(WakeKind::from_code(WAKE_REASON_USER), WakeKind::UserInput);
        assert_eq!(WakeKind::from_code(WAKE_REASON_TIMER), WakeKind::Periodic);
        assert_eq!(WakeKind::from_code(0), WakeKind::Spurious);
        assert_eq!(WakeKind::from_code(7), WakeKind::Spurious);
    }

    #[test]
    fn test_sleep_entry_caches_charging_flag() {
        let mut pm = PowerManager::new(DEFAULT_IDLE_MS);

        pm.note_sleep(true);
        assert_eq!(pm.state(), PowerState::Sleeping);
        assert!(pm.charging_at_sleep());

        pm.note_wake();
        assert_eq!(pm.state(), PowerState::Awake);
        // The cached flag reflects the last sleep entry.
        assert!(pm.charging_at_sleep());
    }
}
