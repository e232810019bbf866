//! Idle timer and sleep loop
//!
//! Two tasks split the power orchestration: `idle_timer_task` is the
//! single pending idle timer (re-arming replaces the deadline), and
//! `sleep_task` runs the sleep/wake cycle whenever the gate opens.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use armilla_core::power::{
    WakeKind, BOOT_GRACE_MS, SLEEP_QUANTUM_MS, WAKE_REASON_TIMER, WAKE_REASON_USER,
};

use crate::channels::{CONNECT_REQUEST, IDLE_REARM, SLEEP_GATE, WAKE_HINT};
use crate::system::{now_ms, publish_state, with_manager, SharedManager};

/// The single pending idle timer.
///
/// Waits for the current deadline or its replacement; expiry is handed
/// to the power manager, which decides whether it still counts.
#[embassy_executor::task]
pub async fn idle_timer_task(shared: &'static SharedManager) {
    let mut deadline = with_manager(shared, |m| m.power().deadline_ms());
    loop {
        match deadline {
            Some(at) => {
                match select(Timer::at(Instant::from_millis(at)), IDLE_REARM.wait()).await {
                    Either::First(()) => {
                        let released = with_manager(shared, |m| m.power_mut().poll(now_ms()));
                        if released {
                            debug!("idle window expired");
                            SLEEP_GATE.signal(());
                        }
                        deadline = with_manager(shared, |m| m.power().deadline_ms());
                    }
                    Either::Second(next) => deadline = next,
                }
            }
            None => deadline = IDLE_REARM.wait().await,
        }
    }
}

/// The sleep loop. Every pass blocks on the may-sleep gate, so a
/// background wake's short re-arm window actually holds the next
/// light sleep off until it expires.
#[embassy_executor::task]
pub async fn sleep_task(shared: &'static SharedManager) {
    // Grace period so a fresh boot is never cut short.
    Timer::after_millis(u64::from(BOOT_GRACE_MS)).await;
    info!("sleep loop armed");

    loop {
        if !with_manager(shared, |m| m.power().may_sleep()) {
            SLEEP_GATE.wait().await;
            continue;
        }

        // Idempotent; a pass that comes back from a periodic or
        // spurious wake is already asleep.
        with_manager(shared, |m| m.enter_sleep());

        match WakeKind::from_code(light_sleep().await) {
            WakeKind::UserInput => {
                let now = now_ms();
                with_manager(shared, |m| m.wake_user(now));
                publish_state(shared);
            }
            WakeKind::Periodic => {
                // Display stays off; background work plus one
                // connectivity pass, then back under once the re-arm
                // window runs out.
                let now = now_ms();
                with_manager(shared, |m| m.wake_background(now));
                CONNECT_REQUEST.signal(());
                publish_state(shared);
            }
            WakeKind::Spurious => debug!("spurious wake"),
        }
    }
}

/// Bounded light sleep: wait for a user activity hint or one sleep
/// quantum, returning the hardware-style wake reason code.
async fn light_sleep() -> u32 {
    WAKE_HINT.reset();
    match select(
        WAKE_HINT.wait(),
        Timer::after_millis(u64::from(SLEEP_QUANTUM_MS)),
    )
    .await
    {
        Either::First(()) => WAKE_REASON_USER,
        Either::Second(()) => WAKE_REASON_TIMER,
    }
}
