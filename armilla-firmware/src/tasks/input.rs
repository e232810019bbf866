//! Input bridges
//!
//! Interrupt-driven tasks translating hardware events into the static
//! channels. All of them are side-effect-light: decode, queue, done.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::Timer;

use armilla_core::gesture::GestureClassifier;

use crate::board::cst816s::Cst816s;
use crate::board::pmic::Pmic;
use crate::channels::{BUTTON_CHANNEL, INPUT_CHANNEL, VIBRATE, WAKE_HINT};

/// Touch bridge: accumulate one contact session in the classifier and
/// queue whatever it reduces to on finger lift.
#[embassy_executor::task]
pub async fn touch_task(mut touch: Cst816s, mut irq: Input<'static>) {
    info!("touch task started");
    let mut classifier = GestureClassifier::new();

    loop {
        irq.wait_for_falling_edge().await;
        match touch.read_report().await {
            Ok(report) if report.finger_down => {
                classifier.add_sample(report.x, report.y);
            }
            Ok(_) => {
                if let Some(event) = classifier.end_session() {
                    INPUT_CHANNEL.send(event).await;
                }
            }
            Err(_) => warn!("touch controller read failed"),
        }
    }
}

/// Button bridge: decode the PMIC interrupt payload. A recognized
/// short press hints the sleep loop and queues a press/release pair;
/// anything else is logged and dropped.
#[embassy_executor::task]
pub async fn button_task(mut pmic: Pmic, mut irq: Input<'static>) {
    info!("button task started");

    loop {
        irq.wait_for_falling_edge().await;
        let status = match pmic.read_and_clear_irq() {
            Ok(status) => status,
            Err(_) => {
                warn!("pmic irq read failed");
                continue;
            }
        };

        if status & Pmic::IRQ_SHORT_PRESS != 0 {
            WAKE_HINT.signal(());
            BUTTON_CHANNEL.send(true).await;
            BUTTON_CHANNEL.send(false).await;
        } else {
            debug!("pmic irq {:08x} ignored", status);
        }
    }
}

/// RTC tick line. Observed for now; minute-level app scheduling rides
/// on the tick loops instead.
#[embassy_executor::task]
pub async fn rtc_tick_task(mut irq: Input<'static>) {
    loop {
        irq.wait_for_falling_edge().await;
        trace!("rtc tick");
    }
}

/// Motion sensor interrupt line. Observed for now.
#[embassy_executor::task]
pub async fn motion_task(mut irq: Input<'static>) {
    loop {
        irq.wait_for_falling_edge().await;
        trace!("motion event");
    }
}

/// Haptic motor driver; pulses are queued so the manager's pulse path
/// never blocks.
#[embassy_executor::task]
pub async fn vibrator_task(mut motor: Output<'static>) {
    loop {
        let duration_ms = VIBRATE.wait().await;
        motor.set_high();
        Timer::after_millis(u64::from(duration_ms)).await;
        motor.set_low();
    }
}
