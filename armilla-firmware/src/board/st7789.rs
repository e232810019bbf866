//! ST7789 panel driver
//!
//! Only the surface the shell sequences through: panel power, the
//! mute latch and a full clear. Drawing proper belongs to the
//! applications and stays out of the firmware.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal::delay::DelayNs;

/// Panel edge in pixels; the panel is square.
pub const PANEL_PX: usize = 240;

// Command subset
const SWRESET: u8 = 0x01;
const SLPIN: u8 = 0x10;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPOFF: u8 = 0x28;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

pub struct St7789 {
    spi: Spi<'static, SPI0, Blocking>,
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
    muted: bool,
}

impl St7789 {
    pub fn new(
        spi: Spi<'static, SPI0, Blocking>,
        cs: Output<'static>,
        dc: Output<'static>,
        rst: Output<'static>,
    ) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            muted: false,
        }
    }

    /// Hardware reset and panel bring-up. 16-bit color, inverted
    /// (the panel ships inverted), normal mode.
    pub fn init(&mut self) {
        let mut delay = Delay;
        self.rst.set_low();
        delay.delay_ms(10);
        self.rst.set_high();
        delay.delay_ms(120);

        self.command(SWRESET, &[]);
        delay.delay_ms(150);
        self.command(SLPOUT, &[]);
        delay.delay_ms(10);
        self.command(COLMOD, &[0x55]);
        self.command(MADCTL, &[0x00]);
        self.command(INVON, &[]);
        self.command(NORON, &[]);
        self.clear();
        self.command(DISPON, &[]);
        info!("st7789 initialized");
    }

    pub fn poweron(&mut self) {
        let mut delay = Delay;
        self.command(SLPOUT, &[]);
        delay.delay_ms(10);
        self.command(DISPON, &[]);
    }

    pub fn poweroff(&mut self) {
        self.command(DISPOFF, &[]);
        self.command(SLPIN, &[]);
    }

    pub fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Blank the full frame. A no-op while muted, which is what lets
    /// app transitions hide the intermediate state.
    pub fn clear(&mut self) {
        if self.muted {
            return;
        }
        let end = (PANEL_PX - 1) as u16;
        self.command(CASET, &[0, 0, (end >> 8) as u8, end as u8]);
        self.command(RASET, &[0, 0, (end >> 8) as u8, end as u8]);
        self.command(RAMWR, &[]);

        self.dc.set_high();
        self.cs.set_low();
        let row = [0u8; PANEL_PX * 2];
        for _ in 0..PANEL_PX {
            if let Err(_e) = self.spi.blocking_write(&row) {
                warn!("st7789 write failed");
                break;
            }
        }
        self.cs.set_high();
    }

    fn command(&mut self, cmd: u8, params: &[u8]) {
        self.cs.set_low();
        self.dc.set_low();
        if let Err(_e) = self.spi.blocking_write(&[cmd]) {
            warn!("st7789 command failed");
        }
        if !params.is_empty() {
            self.dc.set_high();
            if let Err(_e) = self.spi.blocking_write(params) {
                warn!("st7789 param write failed");
            }
        }
        self.cs.set_high();
    }
}
