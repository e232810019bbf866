//! Connectivity orchestration
//!
//! Runs at startup and after every periodic (background) wake. The
//! radio is powered back down in all cases - it is never left on.

use crate::traits::{Network, Rtc};

/// Bring the radio up, perform exactly one time-synchronization
/// exchange if a connection was established, then power the radio
/// down again.
pub async fn connect<N: Network, R: Rtc>(net: &mut N, rtc: &mut R) {
    if net.wake().await && net.is_connected() {
        info!("network up, syncing time");
        rtc.sync_time().await;
    } else {
        debug!("network bring-up failed");
    }
    net.sleep().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    struct FakeNet {
        wake_result: bool,
        slept: bool,
    }

    impl Network for FakeNet {
        async fn wake(&mut self) -> bool {
            self.wake_result
        }

        async fn sleep(&mut self) {
            self.slept = true;
        }

        fn is_connected(&self) -> bool {
            self.wake_result
        }
    }

    struct FakeRtc {
        syncs: u32,
    }

    impl Rtc for FakeRtc {
        async fn sync_time(&mut self) {
            self.syncs += 1;
        }
    }

    #[test]
    fn test_connect_syncs_once_and_powers_down() {
        let mut net = FakeNet {
            wake_result: true,
            slept: false,
        };
        let mut rtc = FakeRtc { syncs: 0 };

        block_on(connect(&mut net, &mut rtc));

        assert_eq!(rtc.syncs, 1);
        assert!(net.slept);
    }

    #[test]
    fn test_failed_bringup_still_powers_down() {
        let mut net = FakeNet {
            wake_result: false,
            slept: false,
        };
        let mut rtc = FakeRtc { syncs: 0 };

        block_on(connect(&mut net, &mut rtc));

        assert_eq!(rtc.syncs, 0);
        assert!(net.slept);
    }
}
