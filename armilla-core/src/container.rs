//! Per-application container
//!
//! Wraps one application, giving it uniform periodic-tick scheduling
//! and idempotent lifecycle transitions. Hook failures are caught and
//! logged here so one misbehaving application never affects the rest
//! of the system.

use crate::app::{Application, Capabilities};
use crate::event::{Event, EventKind};
use crate::manager::SystemApi;

/// Default tick period for foregrounded applications.
pub const DEFAULT_TICK_MS: u32 = 1000;

/// What the scheduling loop should do before the next call into a
/// container: sleep for the tick period, or park until the app is
/// foregrounded again (no busy-polling for apps without background
/// ticking).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickStep {
    Delay(u32),
    WaitForeground,
}

/// Container owning one application for the process lifetime.
pub struct AppContainer {
    app: &'static mut dyn Application,
    caps: Capabilities,
    period_ms: u32,
    in_foreground: bool,
    last_tick_ms: Option<u64>,
}

impl AppContainer {
    pub fn new(app: &'static mut dyn Application) -> Self {
        let caps = app.capabilities();
        Self {
            app,
            caps,
            period_ms: DEFAULT_TICK_MS,
            in_foreground: false,
            last_tick_ms: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.app.name()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn is_foreground(&self) -> bool {
        self.in_foreground
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Change the tick period (the `request_tick` path).
    pub fn set_period(&mut self, period_ms: u32) {
        self.period_ms = period_ms.max(1);
    }

    /// Foreground transition; calls the application hook exactly once
    /// per true edge.
    pub fn foreground(&mut self, sys: &mut SystemApi) {
        if self.in_foreground {
            return;
        }
        self.in_foreground = true;
        if let Err(e) = self.app.foreground(sys) {
            warn!("app {} foreground failed: {}", self.app.name(), e.0);
        }
    }

    /// Background transition; calls the application hook exactly once
    /// per true edge.
    pub fn background(&mut self) {
        if !self.in_foreground {
            return;
        }
        self.in_foreground = false;
        if let Err(e) = self.app.background() {
            warn!("app {} background failed: {}", self.app.name(), e.0);
        }
    }

    /// Forward a tap if the application has the capability.
    pub fn touch(&mut self, sys: &mut SystemApi, event: Event) {
        if !self.caps.contains(Capabilities::TOUCH) {
            return;
        }
        if let Err(e) = self.app.touch(sys, event) {
            warn!("app {} touch failed: {}", self.app.name(), e.0);
        }
    }

    /// Forward a swipe. A missing capability reads as "not consumed".
    pub fn swipe(&mut self, sys: &mut SystemApi, event: Event) -> bool {
        if !self.caps.contains(Capabilities::SWIPE) {
            return false;
        }
        self.app.swipe(sys, event)
    }

    /// Forward a button edge. A missing capability reads as "not
    /// consumed".
    pub fn press(&mut self, sys: &mut SystemApi, button: EventKind, pressed: bool) -> bool {
        if !self.caps.contains(Capabilities::PRESS) {
            return false;
        }
        self.app.press(sys, button, pressed)
    }

    /// One step of the per-app scheduling loop.
    ///
    /// Runs the appropriate tick hook for the current lifecycle state
    /// and tells the caller how to suspend until the next step.
    pub fn step(&mut self, sys: &mut SystemApi, now_ms: u64) -> TickStep {
        if !self.caps.contains(Capabilities::TICK) {
            return TickStep::WaitForeground;
        }

        if self.in_foreground {
            let elapsed = self.elapsed(now_ms);
            if let Err(e) = self.app.tick(sys, elapsed) {
                warn!("app {} tick failed: {}", self.app.name(), e.0);
            }
            TickStep::Delay(self.period_ms)
        } else if self.caps.contains(Capabilities::TICK_BACKGROUND) {
            let elapsed = self.elapsed(now_ms);
            if let Err(e) = self.app.tick_background(sys, elapsed) {
                warn!("app {} tick_background failed: {}", self.app.name(), e.0);
            }
            TickStep::Delay(self.period_ms)
        } else {
            self.last_tick_ms = None;
            TickStep::WaitForeground
        }
    }

    fn elapsed(&mut self, now_ms: u64) -> u32 {
        let elapsed = match self.last_tick_ms {
            Some(last) => now_ms.saturating_sub(last) as u32,
            None => 0,
        };
        self.last_tick_ms = Some(now_ms);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Counter {
        caps: Capabilities,
        fg_calls: &'static AtomicU32,
        bg_calls: &'static AtomicU32,
        tick_calls: &'static AtomicU32,
        fail_tick: bool,
    }

    impl Application for Counter {
        fn name(&self) -> &'static str {
            "Counter"
        }

        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn foreground(&mut self, _sys: &mut SystemApi) -> Result<(), AppError> {
            self.fg_calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn background(&mut self) -> Result<(), AppError> {
            self.bg_calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn tick(&mut self, _sys: &mut SystemApi, _elapsed_ms: u32) -> Result<(), AppError> {
            self.tick_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_tick {
                Err(AppError("induced fault"))
            } else {
                Ok(())
            }
        }
    }

    fn counter(
        caps: Capabilities,
        fail_tick: bool,
    ) -> (AppContainer, &'static AtomicU32, &'static AtomicU32, &'static AtomicU32) {
        let fg = Box::leak(Box::new(AtomicU32::new(0)));
        let bg = Box::leak(Box::new(AtomicU32::new(0)));
        let tick = Box::leak(Box::new(AtomicU32::new(0)));
        let app = Box::leak(Box::new(Counter {
            caps,
            fg_calls: fg,
            bg_calls: bg,
            tick_calls: tick,
            fail_tick,
        }));
        (AppContainer::new(app), fg, bg, tick)
    }

    #[test]
    fn test_lifecycle_transitions_are_edge_triggered() {
        let (mut c, fg, bg, _) = counter(Capabilities::NONE, false);
        let mut sys = SystemApi::new();

        c.foreground(&mut sys);
        c.foreground(&mut sys);
        assert_eq!(fg.load(Ordering::Relaxed), 1);
        assert!(c.is_foreground());

        c.background();
        c.background();
        assert_eq!(bg.load(Ordering::Relaxed), 1);
        assert!(!c.is_foreground());

        c.foreground(&mut sys);
        assert_eq!(fg.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_missing_capability_is_not_consumed() {
        let (mut c, _, _, _) = counter(Capabilities::NONE, false);
        let mut sys = SystemApi::new();
        let ev = Event::new(EventKind::Left, 10, 10);

        assert!(!c.swipe(&mut sys, ev));
        assert!(!c.press(&mut sys, EventKind::Home, false));
        // Touch without the capability is a silent no-op.
        c.touch(&mut sys, Event::new(EventKind::Touch, 10, 10));
    }

    #[test]
    fn test_step_foreground_ticks_and_delays() {
        let (mut c, _, _, ticks) = counter(Capabilities::TICK, false);
        let mut sys = SystemApi::new();

        c.foreground(&mut sys);
        assert_eq!(c.step(&mut sys, 1000), TickStep::Delay(DEFAULT_TICK_MS));
        assert_eq!(c.step(&mut sys, 2000), TickStep::Delay(DEFAULT_TICK_MS));
        assert_eq!(ticks.load(Ordering::Relaxed), 2);

        c.set_period(250);
        assert_eq!(c.step(&mut sys, 3000), TickStep::Delay(250));
    }

    #[test]
    fn test_step_background_parks_without_background_ticking() {
        let (mut c, _, _, ticks) = counter(Capabilities::TICK, false);
        let mut sys = SystemApi::new();

        assert_eq!(c.step(&mut sys, 1000), TickStep::WaitForeground);
        assert_eq!(ticks.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_tick_fault_is_contained() {
        let (mut c, _, _, ticks) = counter(Capabilities::TICK, true);
        let mut sys = SystemApi::new();

        c.foreground(&mut sys);
        // A failing tick is logged and swallowed; scheduling continues.
        assert_eq!(c.step(&mut sys, 1000), TickStep::Delay(DEFAULT_TICK_MS));
        assert_eq!(c.step(&mut sys, 2000), TickStep::Delay(DEFAULT_TICK_MS));
        assert_eq!(ticks.load(Ordering::Relaxed), 2);
    }
}
