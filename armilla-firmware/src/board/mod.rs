//! Board adapter for the watch hardware
//!
//! Thin drivers behind the core hardware traits. The blocking I2C bus
//! is shared between the PMIC and the RTC chip through a
//! critical-section mutex; the display owns its SPI bus outright.

pub mod cst816s;
pub mod pcf8563;
pub mod pmic;
pub mod st7789;
pub mod wifi;

use core::cell::RefCell;

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use armilla_core::traits::{Backlight, Battery, Display, Vibrator};

use crate::channels::VIBRATE;
use pmic::Pmic;
use st7789::St7789;

/// The shared blocking I2C bus (PMIC, RTC chip).
pub type SharedI2c = Mutex<CriticalSectionRawMutex, RefCell<I2c<'static, I2C0, Blocking>>>;

/// Haptic pulse duration in milliseconds.
const PULSE_MS: u16 = 25;

/// The synchronous hardware bundle the system manager drives.
pub struct WatchBoard {
    display: St7789,
    pmic: Pmic,
}

impl WatchBoard {
    pub fn new(display: St7789, pmic: Pmic) -> Self {
        Self { display, pmic }
    }
}

impl Display for WatchBoard {
    fn poweron(&mut self) {
        self.display.poweron();
    }

    fn poweroff(&mut self) {
        self.display.poweroff();
    }

    fn mute(&mut self, muted: bool) {
        self.display.set_mute(muted);
    }

    fn reset(&mut self) {
        self.display.clear();
    }
}

impl Backlight for WatchBoard {
    fn set(&mut self, level: u8) {
        if let Err(_e) = self.pmic.set_backlight(level) {
            warn!("backlight write failed");
        }
    }
}

impl Vibrator for WatchBoard {
    fn pulse(&mut self) {
        // The motor is driven by its own task; a queued pulse keeps
        // this path non-blocking.
        VIBRATE.signal(PULSE_MS);
    }
}

impl Battery for WatchBoard {
    fn charging(&self) -> bool {
        self.pmic.charging().unwrap_or(false)
    }
}
