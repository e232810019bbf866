//! Quick ring placeholder applications
//!
//! Real watch applications are out of scope; these two exercise the
//! tick scheduling and button paths end to end on hardware.

use defmt::*;

use armilla_core::app::{AppError, Application, Capabilities};
use armilla_core::event::{EventKind, EventMask};
use armilla_core::manager::SystemApi;

/// Watch face placeholder: one tick per second.
pub struct ClockApp {
    seconds: u32,
}

impl ClockApp {
    pub fn new() -> Self {
        Self { seconds: 0 }
    }
}

impl Application for ClockApp {
    fn name(&self) -> &'static str {
        "Clock"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::TICK
    }

    fn foreground(&mut self, sys: &mut SystemApi) -> Result<(), AppError> {
        sys.request_tick(1000);
        Ok(())
    }

    fn tick(&mut self, _sys: &mut SystemApi, elapsed_ms: u32) -> Result<(), AppError> {
        self.seconds = self.seconds.wrapping_add(elapsed_ms / 1000);
        trace!("clock tick at {}s", self.seconds);
        Ok(())
    }
}

/// Stopwatch placeholder: the button toggles the run state.
pub struct StopwatchApp {
    running: bool,
    elapsed_ms: u32,
}

impl StopwatchApp {
    pub fn new() -> Self {
        Self {
            running: false,
            elapsed_ms: 0,
        }
    }
}

impl Application for StopwatchApp {
    fn name(&self) -> &'static str {
        "Stopwatch"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::TICK | Capabilities::PRESS
    }

    fn foreground(&mut self, sys: &mut SystemApi) -> Result<(), AppError> {
        sys.request_event(EventMask::BUTTON);
        sys.request_tick(100);
        Ok(())
    }

    fn tick(&mut self, _sys: &mut SystemApi, elapsed_ms: u32) -> Result<(), AppError> {
        if self.running {
            self.elapsed_ms = self.elapsed_ms.wrapping_add(elapsed_ms);
        }
        Ok(())
    }

    fn press(&mut self, _sys: &mut SystemApi, _button: EventKind, pressed: bool) -> bool {
        if pressed {
            self.running = !self.running;
            debug!("stopwatch {}", if self.running { "started" } else { "stopped" });
        }
        true
    }
}
