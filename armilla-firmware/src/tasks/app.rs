//! Per-app scheduling task
//!
//! One pooled task per registered application drives that app's tick
//! loop. The core decides what to do; this task only awaits the
//! requested suspension (a timer or the app's foreground wake slot).

use embassy_futures::select::select;
use embassy_time::Timer;

use armilla_core::container::TickStep;
use armilla_core::manager::{AppId, MAX_APPS};

use crate::channels::FOREGROUND_WAKE;
use crate::system::{now_ms, with_manager, SharedManager};

#[embassy_executor::task(pool_size = MAX_APPS)]
pub async fn app_task(shared: &'static SharedManager, id: AppId) {
    let wake = &FOREGROUND_WAKE[id.index()];
    loop {
        let step = with_manager(shared, |m| m.tick_step(id, now_ms()));
        match step {
            TickStep::Delay(period_ms) => {
                // A foreground change mid-delay re-evaluates early.
                select(Timer::after_millis(u64::from(period_ms)), wake.wait()).await;
            }
            TickStep::WaitForeground => wake.wait().await,
        }
    }
}
