//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod app;
pub mod connectivity;
pub mod dispatch;
pub mod input;
pub mod power;

pub use app::app_task;
pub use connectivity::{connectivity_task, cyw43_task, net_task};
pub use dispatch::dispatch_task;
pub use input::{button_task, motion_task, rtc_tick_task, touch_task, vibrator_task};
pub use power::{idle_timer_task, sleep_task};
