//! PCF8563 RTC chip and SNTP time synchronization
//!
//! The chip keeps wall time across sleeps; `SntpRtc` refreshes it with
//! one bounded UDP exchange whenever the connectivity pass finds a
//! live link.

use defmt::*;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_rp::i2c;
use embassy_time::{with_timeout, Duration};
use embedded_hal::i2c::I2c as _;

use armilla_core::traits::Rtc;

use crate::board::SharedI2c;

/// RTC chip I2C address.
const ADDR: u8 = 0x51;

/// First time register (seconds).
const REG_SECONDS: u8 = 0x02;

const NTP_SERVER: &str = "pool.ntp.org";
const NTP_PORT: u16 = 123;

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970).
const NTP_UNIX_OFFSET: u32 = 2_208_988_800;

/// Bound on the whole SNTP exchange.
const SNTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Broken-down wall time as the chip stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

#[derive(Clone, Copy)]
pub struct Pcf8563 {
    bus: &'static SharedI2c,
}

impl Pcf8563 {
    pub fn new(bus: &'static SharedI2c) -> Self {
        Self { bus }
    }

    /// Write the full time block in one burst. The chip wants BCD, and
    /// the century flag rides on the month register.
    pub fn set_datetime(&mut self, dt: &DateTime) -> Result<(), i2c::Error> {
        let century = if dt.year >= 2000 { 0x00 } else { 0x80 };
        let buf = [
            REG_SECONDS,
            bcd(dt.second),
            bcd(dt.minute),
            bcd(dt.hour),
            bcd(dt.day),
            dt.weekday & 0x07,
            bcd(dt.month) | century,
            bcd((dt.year % 100) as u8),
        ];
        self.bus.lock(|cell| cell.borrow_mut().write(ADDR, &buf))
    }
}

fn bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Days-to-civil conversion (Gregorian, proleptic).
fn civil_from_unix(unix: u32) -> DateTime {
    let days = (unix / 86_400) as i64;
    let rem = unix % 86_400;

    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if m <= 2 { y + 1 } else { y };

    DateTime {
        year: year as u16,
        month: m as u8,
        day: d as u8,
        weekday: ((days + 4) % 7) as u8,
        hour: (rem / 3600) as u8,
        minute: (rem % 3600 / 60) as u8,
        second: (rem % 60) as u8,
    }
}

/// SNTP client writing the result to the RTC chip.
pub struct SntpRtc {
    stack: Stack<'static>,
    chip: Pcf8563,
}

impl SntpRtc {
    pub fn new(stack: Stack<'static>, chip: Pcf8563) -> Self {
        Self { stack, chip }
    }

    async fn exchange(&mut self) -> Option<u32> {
        let addrs = self
            .stack
            .dns_query(NTP_SERVER, DnsQueryType::A)
            .await
            .ok()?;
        let server = *addrs.first()?;

        let mut rx_meta = [PacketMetadata::EMPTY; 4];
        let mut tx_meta = [PacketMetadata::EMPTY; 4];
        let mut rx_buf = [0u8; 128];
        let mut tx_buf = [0u8; 128];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buf,
            &mut tx_meta,
            &mut tx_buf,
        );
        socket.bind(NTP_PORT).ok()?;

        // Client request: LI 0, version 4, mode 3.
        let mut packet = [0u8; 48];
        packet[0] = 0x23;
        socket.send_to(&packet, (server, NTP_PORT)).await.ok()?;

        let mut response = [0u8; 48];
        let (n, _) = socket.recv_from(&mut response).await.ok()?;
        if n < 48 {
            return None;
        }

        // Transmit timestamp, seconds part.
        let secs = u32::from_be_bytes([response[40], response[41], response[42], response[43]]);
        secs.checked_sub(NTP_UNIX_OFFSET)
    }
}

impl Rtc for SntpRtc {
    async fn sync_time(&mut self) {
        match with_timeout(SNTP_TIMEOUT, self.exchange()).await {
            Ok(Some(unix)) => {
                let dt = civil_from_unix(unix);
                info!(
                    "time sync: {}-{:02}-{:02} {:02}:{:02}:{:02}",
                    dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
                );
                if self.chip.set_datetime(&dt).is_err() {
                    warn!("rtc chip write failed");
                }
            }
            Ok(None) => warn!("sntp exchange failed"),
            Err(_) => warn!("sntp exchange timed out"),
        }
    }
}
