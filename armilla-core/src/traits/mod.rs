//! Hardware abstraction traits
//!
//! One trait per concern. The register-level drivers behind these live
//! in the firmware crate; host tests substitute scripted mocks.

pub mod backlight;
pub mod battery;
pub mod display;
pub mod network;
pub mod rtc;
pub mod vibrator;

pub use backlight::Backlight;
pub use battery::Battery;
pub use display::Display;
pub use network::Network;
pub use rtc::Rtc;
pub use vibrator::Vibrator;

/// The synchronous hardware bundle the system manager drives.
///
/// Implemented by the firmware's board adapter; anything satisfying the
/// four concerns qualifies.
pub trait Board: Display + Backlight + Vibrator + Battery {}

impl<T: Display + Backlight + Vibrator + Battery> Board for T {}
