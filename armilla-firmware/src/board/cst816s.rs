//! CST816S touch controller
//!
//! One interrupt-driven report read per contact sample. Gesture
//! recognition is done in software; the controller's own gesture
//! engine is left unused.

use embassy_rp::i2c::{Async, Error, I2c};
use embassy_rp::peripherals::I2C1;

/// Touch controller I2C address.
const ADDR: u16 = 0x15;

/// One touch report.
#[derive(Debug, Clone, Copy)]
pub struct TouchReport {
    pub finger_down: bool,
    pub x: i16,
    pub y: i16,
}

pub struct Cst816s {
    i2c: I2c<'static, I2C1, Async>,
}

impl Cst816s {
    pub fn new(i2c: I2c<'static, I2C1, Async>) -> Self {
        Self { i2c }
    }

    /// Read the current report block (finger count plus the 12-bit
    /// coordinate pair).
    pub async fn read_report(&mut self) -> Result<TouchReport, Error> {
        let mut buf = [0u8; 7];
        self.i2c.write_read_async(ADDR, [0x00], &mut buf).await?;

        let fingers = buf[2] & 0x0F;
        let x = (i16::from(buf[3] & 0x0F) << 8) | i16::from(buf[4]);
        let y = (i16::from(buf[5] & 0x0F) << 8) | i16::from(buf[6]);

        Ok(TouchReport {
            finger_down: fingers > 0,
            x,
            y,
        })
    }
}
