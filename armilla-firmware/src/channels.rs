//! Inter-task communication channels
//!
//! Defines the static channels and signals used for communication
//! between Embassy tasks. Uses embassy-sync primitives for safe async
//! communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use armilla_core::event::Event;
use armilla_core::manager::MAX_APPS;

/// Channel capacity for classified input events
const INPUT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for button edges
const BUTTON_CHANNEL_SIZE: usize = 4;

/// Classified touch events (taps and swipes) from the input task
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, Event, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Button edges from the PMIC interrupt bridge (true = pressed)
pub static BUTTON_CHANNEL: Channel<CriticalSectionRawMutex, bool, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// User activity hint that interrupts a pending light sleep
pub static WAKE_HINT: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Idle deadline expired; the sleep loop may proceed
pub static SLEEP_GATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// New idle deadline for the idle timer task (None cancels it)
pub static IDLE_REARM: Signal<CriticalSectionRawMutex, Option<u64>> = Signal::new();

/// Request one connectivity pass (radio up, time sync, radio down)
pub static CONNECT_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Haptic pulse request, duration in milliseconds
pub static VIBRATE: Signal<CriticalSectionRawMutex, u16> = Signal::new();

/// Per-app foreground wake signals; an app task parked in
/// `WaitForeground` resumes when its slot is signalled.
#[allow(clippy::declare_interior_mutable_const)]
const APP_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();
pub static FOREGROUND_WAKE: [Signal<CriticalSectionRawMutex, ()>; MAX_APPS] =
    [APP_SIGNAL; MAX_APPS];
