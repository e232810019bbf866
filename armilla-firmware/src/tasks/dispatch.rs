//! Event dispatch task
//!
//! Owns event delivery into the manager: classified touch events and
//! button edges come in over the static channels, and every delivery
//! is followed by a state publish so the idle timer and app tasks see
//! the consequences.

use embassy_futures::select::{select, Either};

use crate::channels::{BUTTON_CHANNEL, INPUT_CHANNEL};
use crate::system::{now_ms, publish_state, with_manager, SharedManager};

#[embassy_executor::task]
pub async fn dispatch_task(shared: &'static SharedManager) {
    loop {
        match select(INPUT_CHANNEL.receive(), BUTTON_CHANNEL.receive()).await {
            Either::First(event) => {
                with_manager(shared, |m| m.dispatch_touch(event, now_ms()));
            }
            Either::Second(pressed) => {
                with_manager(shared, |m| m.dispatch_button(pressed, now_ms()));
            }
        }
        publish_state(shared);
    }
}
