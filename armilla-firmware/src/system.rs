//! Shared system manager handle
//!
//! The manager is written for single-threaded synchronous use; tasks
//! share it behind a blocking critical-section mutex and keep each
//! lock section short (no awaiting while holding it).

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

use armilla_core::manager::Manager;

use crate::board::WatchBoard;
use crate::channels::{FOREGROUND_WAKE, IDLE_REARM, SLEEP_GATE};

pub type WatchManager = Manager<WatchBoard>;
pub type SharedManager = Mutex<CriticalSectionRawMutex, RefCell<WatchManager>>;

/// Run a closure against the manager inside the lock.
pub fn with_manager<R>(shared: &SharedManager, f: impl FnOnce(&mut WatchManager) -> R) -> R {
    shared.lock(|cell| f(&mut cell.borrow_mut()))
}

/// Publish manager state the power and app tasks wait on: the current
/// idle deadline, the may-sleep gate and the foreground app's wake
/// slot. Called after any manager interaction that may have changed
/// any of them.
///
/// The gate signal matters for the navigation path that releases the
/// idle timer outright (Home on the default app): no deadline is left
/// to expire, so the sleep loop must be nudged from here.
pub fn publish_state(shared: &SharedManager) {
    let (deadline, may_sleep, current) = with_manager(shared, |m| {
        (m.power().deadline_ms(), m.power().may_sleep(), m.current_app())
    });
    IDLE_REARM.signal(deadline);
    if may_sleep {
        SLEEP_GATE.signal(());
    }
    if let Some(id) = current {
        FOREGROUND_WAKE[id.index()].signal(());
    }
}

/// Milliseconds since boot.
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}
