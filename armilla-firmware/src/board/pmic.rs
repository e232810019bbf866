//! AXP-type power management IC
//!
//! Charging status, the backlight LDO and the interrupt status block.
//! The chip sits on the shared blocking I2C bus; every access locks
//! the bus for the duration of one transfer.

use embassy_rp::i2c;
use embedded_hal::i2c::I2c as _;

use crate::board::SharedI2c;

/// PMIC I2C address.
const ADDR: u8 = 0x35;

// Register subset
const REG_POWER_STATUS: u8 = 0x01;
const REG_LDO_ENABLE: u8 = 0x12;
const REG_LDO2_VOLTAGE: u8 = 0x28;
const REG_IRQ_STATUS1: u8 = 0x44;

/// Charging bit in the power status register.
const CHARGING_BIT: u8 = 0x40;

/// LDO2 (backlight) enable bit.
const LDO2_ENABLE_BIT: u8 = 0x04;

/// Handle onto the PMIC; cheap to clone, one per consumer.
#[derive(Clone, Copy)]
pub struct Pmic {
    bus: &'static SharedI2c,
}

impl Pmic {
    /// Short press of the power button, bit 17 of the packed
    /// interrupt status block.
    pub const IRQ_SHORT_PRESS: u32 = 0x0002_0000;

    pub fn new(bus: &'static SharedI2c) -> Self {
        Self { bus }
    }

    pub fn charging(&self) -> Result<bool, i2c::Error> {
        let status = self.read(REG_POWER_STATUS)?;
        Ok(status & CHARGING_BIT != 0)
    }

    /// Map backlight level 0..=3 to the LDO2 voltage; level 0 cuts
    /// the LDO entirely.
    pub fn set_backlight(&mut self, level: u8) -> Result<(), i2c::Error> {
        let enable = self.read(REG_LDO_ENABLE)?;
        if level == 0 {
            return self.write(REG_LDO_ENABLE, enable & !LDO2_ENABLE_BIT);
        }

        // 2.4 V / 2.8 V / 3.2 V in the register's 100 mV steps from
        // a 1.8 V base, packed into the high nibble.
        let volts_nibble = match level.min(3) {
            1 => 0x06,
            2 => 0x0A,
            _ => 0x0E,
        };
        let voltage = self.read(REG_LDO2_VOLTAGE)?;
        self.write(REG_LDO2_VOLTAGE, (voltage & 0x0F) | (volts_nibble << 4))?;
        self.write(REG_LDO_ENABLE, enable | LDO2_ENABLE_BIT)
    }

    /// Read the packed 32-bit interrupt status block and acknowledge
    /// every pending bit.
    pub fn read_and_clear_irq(&mut self) -> Result<u32, i2c::Error> {
        let mut regs = [0u8; 4];
        self.bus.lock(|cell| {
            let mut bus = cell.borrow_mut();
            bus.write_read(ADDR, &[REG_IRQ_STATUS1], &mut regs)?;
            // Writing the status back clears the handled bits.
            for (i, reg) in regs.iter().enumerate() {
                bus.write(ADDR, &[REG_IRQ_STATUS1 + i as u8, *reg])?;
            }
            Ok(())
        })?;
        Ok(u32::from_be_bytes(regs))
    }

    fn read(&self, reg: u8) -> Result<u8, i2c::Error> {
        let mut buf = [0u8; 1];
        self.bus.lock(|cell| {
            cell.borrow_mut().write_read(ADDR, &[reg], &mut buf)
        })?;
        Ok(buf[0])
    }

    fn write(&self, reg: u8, value: u8) -> Result<(), i2c::Error> {
        self.bus.lock(|cell| cell.borrow_mut().write(ADDR, &[reg, value]))
    }
}
