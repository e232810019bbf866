//! Connectivity task
//!
//! One pass at startup, then one per request (a periodic wake queues a
//! request). The orchestration itself lives in the core crate; this
//! task just owns the link and the clock.

use cyw43_pio::PioSpi;
use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{DMA_CH0, PIO0};

use armilla_core::net;

use crate::board::pcf8563::SntpRtc;
use crate::board::wifi::WifiLink;
use crate::channels::CONNECT_REQUEST;

#[embassy_executor::task]
pub async fn connectivity_task(mut link: WifiLink, mut rtc: SntpRtc) {
    info!("connectivity task started");
    net::connect(&mut link, &mut rtc).await;

    loop {
        CONNECT_REQUEST.wait().await;
        net::connect(&mut link, &mut rtc).await;
    }
}

/// CYW43 chip runner.
#[embassy_executor::task]
pub async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// Network stack runner.
#[embassy_executor::task]
pub async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
