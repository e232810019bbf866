//! CYW43 Wi-Fi link
//!
//! The radio is consumed purely through the wake/sleep contract: scan,
//! filter against the embedded credential list, associate within a
//! bounded window, and always power back down afterwards.

use cyw43::{Control, JoinOptions};
use defmt::*;
use embassy_net::Stack;
use embassy_time::Timer;

use armilla_core::traits::Network;

/// Association poll window: sixty one-second polls.
const ASSOC_POLLS: u32 = 60;

pub struct WifiLink {
    control: Control<'static>,
    stack: Stack<'static>,
    credentials: &'static [(&'static str, &'static str)],
}

impl WifiLink {
    pub fn new(
        control: Control<'static>,
        stack: Stack<'static>,
        credentials: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            control,
            stack,
            credentials,
        }
    }

    /// Scan and return the first visible network we hold credentials
    /// for.
    async fn find_known(&mut self) -> Option<usize> {
        let credentials = self.credentials;
        let mut scanner = self.control.scan(Default::default()).await;
        while let Some(bss) = scanner.next().await {
            let len = (bss.ssid_len as usize).min(bss.ssid.len());
            let Ok(ssid) = core::str::from_utf8(&bss.ssid[..len]) else {
                continue;
            };
            if let Some(i) = credentials.iter().position(|(s, _)| *s == ssid) {
                debug!("found known network {}", ssid);
                return Some(i);
            }
        }
        None
    }
}

impl Network for WifiLink {
    async fn wake(&mut self) -> bool {
        if self.credentials.is_empty() {
            debug!("no stored wifi credentials");
            return false;
        }

        let Some(index) = self.find_known().await else {
            debug!("no known network in range");
            return false;
        };
        let (ssid, psk) = self.credentials[index];

        let options = if psk.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(psk.as_bytes())
        };
        if let Err(e) = self.control.join(ssid, options).await {
            warn!("join {} failed: {}", ssid, e.status);
            return false;
        }

        for _ in 0..ASSOC_POLLS {
            if self.stack.is_config_up() {
                info!("associated with {}", ssid);
                return true;
            }
            Timer::after_secs(1).await;
        }
        warn!("association with {} timed out", ssid);
        false
    }

    async fn sleep(&mut self) {
        self.control.leave().await;
        debug!("radio down");
    }

    fn is_connected(&self) -> bool {
        self.stack.is_config_up()
    }
}
