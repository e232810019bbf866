//! Crash record persistence
//!
//! The panic handler stores the message in reserved RAM and resets;
//! on the next boot, before normal bring-up, the message is encoded as
//! a crash record into a fixed flash sector.

use defmt::*;
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;

use armilla_core::crash::CrashRecord;

/// Total flash size of the board (2 MiB).
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Sector reserved for the crash record, well above the firmware
/// image.
const CRASH_OFFSET: u32 = 0x001F_0000;

/// If the previous boot panicked, persist its message before normal
/// bring-up.
pub fn store_pending(flash: &mut Flash<'_, FLASH, Blocking, FLASH_SIZE>) {
    let Some(msg) = panic_persist::get_panic_message_utf8() else {
        return;
    };
    warn!("previous boot panicked: {}", msg);

    // Uptime at panic time does not survive the reset.
    let record = CrashRecord::new(0, msg);
    let mut buf = [0xFFu8; 256];
    let used = match postcard::to_slice(&record, &mut buf) {
        Ok(data) => data.len(),
        Err(_) => {
            warn!("crash record encoding failed");
            return;
        }
    };

    if flash
        .blocking_erase(CRASH_OFFSET, CRASH_OFFSET + ERASE_SIZE as u32)
        .is_err()
        || flash.blocking_write(CRASH_OFFSET, &buf).is_err()
    {
        warn!("crash record flash write failed");
        return;
    }
    info!("crash record persisted ({} bytes)", used);
}
