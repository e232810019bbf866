//! System manager
//!
//! The central coordinator: app registry and rings, navigation state
//! machine, event-mask gating, notification presence, brightness cache
//! and sleep/wake orchestration. One instance exists per device; the
//! firmware constructs it explicitly and shares it between cooperative
//! tasks - there is no global singleton.

use heapless::{FnvIndexMap, String, Vec};

use crate::app::Application;
use crate::container::{AppContainer, TickStep};
use crate::event::{Event, EventKind, EventMask};
use crate::power::{PowerManager, PowerState, BACKGROUND_IDLE_MS};
use crate::traits::backlight::BACKLIGHT_MAX;
use crate::traits::Board;

/// Maximum registered containers, built-in views included.
pub const MAX_APPS: usize = 12;

/// Maximum quick ring members.
pub const MAX_QUICK_RING: usize = 8;

/// Notification map capacity (power of two, per `FnvIndexMap`).
pub const MAX_NOTIFICATIONS: usize = 8;

/// Bounded notification message length.
pub const MAX_NOTIFICATION_LEN: usize = 64;

/// Identifier of a registered application container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppId(usize);

impl AppId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shell context handed to application hooks.
///
/// Collects subscription and scheduling requests so the manager can
/// apply them after the hook returns; applications never hold a
/// reference back into the manager.
pub struct SystemApi {
    event_mask: EventMask,
    tick_request: Option<u32>,
    launch_request: Option<usize>,
}

impl SystemApi {
    pub fn new() -> Self {
        Self {
            event_mask: EventMask::NONE,
            tick_request: None,
            launch_request: None,
        }
    }

    /// Current subscription mask of the foreground app.
    pub fn event_mask(&self) -> EventMask {
        self.event_mask
    }

    /// Subscribe to event categories. Typically called from
    /// `foreground`, since the mask is cleared on every switch.
    pub fn request_event(&mut self, mask: EventMask) {
        self.event_mask |= mask;
    }

    /// Request a new tick period for the calling application.
    pub fn request_tick(&mut self, period_ms: u32) {
        self.tick_request = Some(period_ms);
    }

    /// Request a switch to the launcher ring entry at `index`.
    pub fn launch(&mut self, index: usize) {
        self.launch_request = Some(index);
    }

    fn clear_mask(&mut self) {
        self.event_mask.clear();
    }

    fn take_tick_request(&mut self) -> Option<u32> {
        self.tick_request.take()
    }

    fn take_launch_request(&mut self) -> Option<usize> {
        self.launch_request.take()
    }

    #[cfg(test)]
    pub(crate) fn pending_launch(&self) -> Option<usize> {
        self.launch_request
    }
}

impl Default for SystemApi {
    fn default() -> Self {
        Self::new()
    }
}

/// The system-wide coordinator.
pub struct Manager<B: Board> {
    board: B,
    power: PowerManager,
    api: SystemApi,
    containers: Vec<AppContainer, MAX_APPS>,
    quick_ring: Vec<AppId, MAX_QUICK_RING>,
    launcher_ring: Vec<AppId, MAX_APPS>,
    launcher: AppId,
    notifier: AppId,
    current: Option<AppId>,
    notifications: FnvIndexMap<u32, String<MAX_NOTIFICATION_LEN>, MAX_NOTIFICATIONS>,
    brightness: u8,
    /// Set when a press performed the wake, so its release does not
    /// also navigate Home.
    swallow_release: bool,
}

impl<B: Board> Manager<B> {
    /// Build the manager around a board adapter and the two built-in
    /// views. `idle_window_ms` and the initial brightness come from
    /// the system configuration.
    pub fn new(
        board: B,
        launcher_view: &'static mut dyn Application,
        notifier_view: &'static mut dyn Application,
        idle_window_ms: u32,
        brightness: u8,
    ) -> Self {
        let mut containers: Vec<AppContainer, MAX_APPS> = Vec::new();
        let _ = containers.push(AppContainer::new(launcher_view));
        let _ = containers.push(AppContainer::new(notifier_view));

        Self {
            board,
            power: PowerManager::new(idle_window_ms),
            api: SystemApi::new(),
            containers,
            quick_ring: Vec::new(),
            launcher_ring: Vec::new(),
            launcher: AppId(0),
            notifier: AppId(1),
            current: None,
            notifications: FnvIndexMap::new(),
            brightness: brightness.min(BACKLIGHT_MAX),
            swallow_release: false,
        }
    }

    /// Register an application with the system.
    ///
    /// Quick ring entries keep registration order; the launcher ring is
    /// re-sorted by name after every insertion.
    pub fn register(&mut self, app: &'static mut dyn Application, quick_ring: bool) -> Option<AppId> {
        if self.containers.is_full() {
            warn!("app registry full, dropping {}", app.name());
            return None;
        }
        let id = AppId(self.containers.len());
        let _ = self.containers.push(AppContainer::new(app));

        if quick_ring {
            if self.quick_ring.push(id).is_err() {
                warn!("quick ring full");
            }
        } else {
            let _ = self.launcher_ring.push(id);
            let containers = &self.containers;
            self.launcher_ring
                .sort_unstable_by(|a, b| containers[a.0].name().cmp(containers[b.0].name()));
        }
        Some(id)
    }

    pub fn current_app(&self) -> Option<AppId> {
        self.current
    }

    pub fn container(&self, id: AppId) -> Option<&AppContainer> {
        self.containers.get(id.0)
    }

    pub fn launcher_id(&self) -> AppId {
        self.launcher
    }

    pub fn notifier_id(&self) -> AppId {
        self.notifier
    }

    pub fn quick_ring(&self) -> &[AppId] {
        &self.quick_ring
    }

    pub fn launcher_ring(&self) -> &[AppId] {
        &self.launcher_ring
    }

    pub fn power(&self) -> &PowerManager {
        &self.power
    }

    pub fn power_mut(&mut self) -> &mut PowerManager {
        &mut self.power
    }

    /// Cached brightness; never touches hardware.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set brightness, writing through to the backlight immediately.
    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = level.min(BACKLIGHT_MAX);
        let level = self.brightness;
        self.board.set(level);
    }

    /// Select the initial foreground app and arm the idle timer.
    pub fn start(&mut self, now_ms: u64) {
        if self.current.is_none() {
            if let Some(&first) = self.quick_ring.first() {
                self.switch(first);
            }
        }
        self.power.keep_awake(now_ms);
    }

    /// Switch to the requested application.
    ///
    /// The old app is backgrounded before the new one is foregrounded,
    /// and the whole transition runs with the display muted so a
    /// partially drawn frame is never exposed.
    pub fn switch(&mut self, id: AppId) {
        if self.containers.get(id.0).is_none() {
            warn!("switch to unknown app {}", id.0);
            return;
        }

        match self.current {
            Some(current) => self.containers[current.0].background(),
            None => {
                // One-time device power-on sequencing.
                self.board.poweron();
                self.board.mute(true);
                let level = self.brightness;
                self.board.set(level);
            }
        }

        // Clear out any configuration from the old application.
        self.api.clear_mask();

        self.current = Some(id);
        self.board.mute(true);
        self.board.reset();
        {
            let Self {
                containers, api, ..
            } = self;
            let container = &mut containers[id.0];
            container.foreground(api);
            if let Some(period) = api.take_tick_request() {
                container.set_period(period);
            }
        }
        self.board.mute(false);
    }

    /// Navigate to a new application.
    ///
    /// Left/right cycle the quick ring (index 0 when the current app is
    /// not a ring member), up opens the launcher, down returns to the
    /// default app or opens the notifier, home/back return to the
    /// default app or release the idle gate.
    pub fn navigate(&mut self, direction: EventKind) {
        let Some(&default_id) = self.quick_ring.first() else {
            warn!("navigate with an empty quick ring");
            return;
        };

        match direction {
            EventKind::Left => {
                let i = match self.quick_position() {
                    Some(i) => (i + 1) % self.quick_ring.len(),
                    None => 0,
                };
                self.switch(self.quick_ring[i]);
            }
            EventKind::Right => {
                let i = match self.quick_position() {
                    Some(i) => (i + self.quick_ring.len() - 1) % self.quick_ring.len(),
                    None => 0,
                };
                self.switch(self.quick_ring[i]);
            }
            EventKind::Up => self.switch(self.launcher),
            EventKind::Down => {
                if self.current != Some(default_id) {
                    self.switch(default_id);
                } else if !self.notifications.is_empty() {
                    self.switch(self.notifier);
                } else {
                    // Nothing to notify; a pulse avoids the display
                    // flicker a redundant switch would cause.
                    self.board.pulse();
                }
            }
            EventKind::Home | EventKind::Back => {
                if self.current != Some(default_id) {
                    self.switch(default_id);
                } else {
                    self.power.release();
                }
            }
            EventKind::Touch => {}
        }
    }

    fn quick_position(&self) -> Option<usize> {
        let current = self.current?;
        self.quick_ring.iter().position(|&id| id == current)
    }

    /// Record a notification; only presence is observed by navigation.
    pub fn notify(&mut self, id: u32, msg: &str) {
        let mut bounded: String<MAX_NOTIFICATION_LEN> = String::new();
        let mut end = msg.len().min(MAX_NOTIFICATION_LEN);
        while !msg.is_char_boundary(end) {
            end -= 1;
        }
        let _ = bounded.push_str(&msg[..end]);
        if self.notifications.insert(id, bounded).is_err() {
            warn!("notification map full, dropping {}", id);
        }
    }

    pub fn unnotify(&mut self, id: u32) {
        self.notifications.remove(&id);
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Route a classified touch event.
    ///
    /// Refreshes the idle timer first. Swipes go to the app only when
    /// the mask claims that axis and the handler consumes them;
    /// otherwise they drive navigation. Taps are delivered only under
    /// a TOUCH subscription.
    pub fn dispatch_touch(&mut self, event: Event, now_ms: u64) {
        self.power.keep_awake(now_ms);

        match event.kind {
            kind if kind.is_swipe() => {
                let consumed = self.api.event_mask().claims_swipe(kind)
                    && match self.current {
                        Some(current) => {
                            let Self {
                                containers, api, ..
                            } = self;
                            containers[current.0].swipe(api, event)
                        }
                        None => false,
                    };
                if !consumed {
                    self.navigate(kind);
                }
            }
            EventKind::Touch => {
                if self.api.event_mask().contains(EventMask::TOUCH) {
                    if let Some(current) = self.current {
                        let Self {
                            containers, api, ..
                        } = self;
                        containers[current.0].touch(api, event);
                    }
                }
            }
            _ => {}
        }

        self.apply_launch_request();
    }

    /// Route a button edge.
    ///
    /// A press that finds the device asleep performs the user wake and
    /// nothing else - neither that press nor its release navigates.
    /// Otherwise BUTTON subscribers get first refusal and an unconsumed
    /// release triggers Home navigation.
    pub fn dispatch_button(&mut self, pressed: bool, now_ms: u64) {
        self.power.keep_awake(now_ms);

        if self.power.state() == PowerState::Sleeping {
            self.swallow_release = pressed;
            self.wake_user(now_ms);
            return;
        }

        if !pressed && self.swallow_release {
            self.swallow_release = false;
            return;
        }

        let consumed = self.api.event_mask().contains(EventMask::BUTTON)
            && match self.current {
                Some(current) => {
                    let Self {
                        containers, api, ..
                    } = self;
                    containers[current.0].press(api, EventKind::Home, pressed)
                }
                None => false,
            };

        if !consumed && !pressed {
            self.navigate(EventKind::Home);
        }
    }

    /// Enter the sleep state: backlight off, current app backgrounded,
    /// panel powered down, charging flag cached. Idempotent.
    pub fn enter_sleep(&mut self) {
        if self.power.state() == PowerState::Sleeping {
            return;
        }
        debug!("sleep");
        self.board.set(0);
        if let Some(current) = self.current {
            self.containers[current.0].background();
        }
        self.board.poweroff();
        let charging = self.board.charging();
        self.power.note_sleep(charging);
    }

    /// User-initiated wake: restore the panel and backlight, foreground
    /// the current app and re-arm the full idle window. Idempotent.
    pub fn wake_user(&mut self, now_ms: u64) {
        if self.power.state() == PowerState::Awake {
            return;
        }
        debug!("wake by user");
        self.power.note_wake();
        self.board.poweron();
        let level = self.brightness;
        self.board.set(level);
        if let Some(current) = self.current {
            let Self {
                containers, api, ..
            } = self;
            let container = &mut containers[current.0];
            container.foreground(api);
            if let Some(period) = api.take_tick_request() {
                container.set_period(period);
            }
        }
        self.power.keep_awake(now_ms);
    }

    /// Background (periodic) wake: the display stays off and the state
    /// stays Sleeping so a later user press still performs the full
    /// wake; the short re-arm window only holds sleep off long enough
    /// for scheduled background work.
    pub fn wake_background(&mut self, now_ms: u64) {
        debug!("wake for background work");
        self.power.keep_awake_for(now_ms, BACKGROUND_IDLE_MS);
    }

    /// One step of an app's scheduling loop; applies any tick-period
    /// request the hook made.
    pub fn tick_step(&mut self, id: AppId, now_ms: u64) -> TickStep {
        let Self {
            containers, api, ..
        } = self;
        match containers.get_mut(id.0) {
            Some(container) => {
                let step = container.step(api, now_ms);
                if let Some(period) = api.take_tick_request() {
                    container.set_period(period);
                }
                step
            }
            None => TickStep::WaitForeground,
        }
    }

    fn apply_launch_request(&mut self) {
        if let Some(index) = self.api.take_launch_request() {
            match self.launcher_ring.get(index).copied() {
                Some(id) => self.switch(id),
                None => debug!("launch index {} out of range", index),
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn board(&self) -> &B {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppError, Capabilities};
    use crate::apps::{LauncherView, NotifierView};
    use crate::power::{DEFAULT_IDLE_MS, WakeKind, WAKE_REASON_USER};
    use crate::traits::{Backlight, Battery, Display, Vibrator};
    use std::cell::RefCell;
    use std::sync::Mutex as StdMutex;
    use std::vec::Vec as StdVec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        PowerOn,
        PowerOff,
        Mute(bool),
        Reset,
        Backlight(u8),
        Pulse,
    }

    #[derive(Default)]
    struct MockBoard {
        ops: RefCell<StdVec<Op>>,
        charging: bool,
    }

    impl MockBoard {
        fn push(&self, op: Op) {
            self.ops.borrow_mut().push(op);
        }

        fn ops(&self) -> StdVec<Op> {
            self.ops.borrow().clone()
        }
    }

    impl Display for MockBoard {
        fn poweron(&mut self) {
            self.push(Op::PowerOn);
        }
        fn poweroff(&mut self) {
            self.push(Op::PowerOff);
        }
        fn mute(&mut self, muted: bool) {
            self.push(Op::Mute(muted));
        }
        fn reset(&mut self) {
            self.push(Op::Reset);
        }
    }

    impl Backlight for MockBoard {
        fn set(&mut self, level: u8) {
            self.push(Op::Backlight(level));
        }
    }

    impl Vibrator for MockBoard {
        fn pulse(&mut self) {
            self.push(Op::Pulse);
        }
    }

    impl Battery for MockBoard {
        fn charging(&self) -> bool {
            self.charging
        }
    }

    /// Scripted application fixture recording lifecycle edges.
    struct Fixture {
        name: &'static str,
        caps: Capabilities,
        subscribe: EventMask,
        consume_swipe: bool,
        consume_press: bool,
        log: &'static StdMutex<StdVec<std::string::String>>,
    }

    impl Application for Fixture {
        fn name(&self) -> &'static str {
            self.name
        }

        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn foreground(&mut self, sys: &mut SystemApi) -> Result<(), AppError> {
            sys.request_event(self.subscribe);
            self.log.lock().unwrap().push(format!("fg:{}", self.name));
            Ok(())
        }

        fn background(&mut self) -> Result<(), AppError> {
            self.log.lock().unwrap().push(format!("bg:{}", self.name));
            Ok(())
        }

        fn touch(&mut self, _sys: &mut SystemApi, event: Event) -> Result<(), AppError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("touch:{}:{},{}", self.name, event.x, event.y));
            Ok(())
        }

        fn swipe(&mut self, _sys: &mut SystemApi, event: Event) -> bool {
            self.log
                .lock()
                .unwrap()
                .push(format!("swipe:{}:{:?}", self.name, event.kind));
            self.consume_swipe
        }

        fn press(&mut self, _sys: &mut SystemApi, _button: EventKind, pressed: bool) -> bool {
            self.log
                .lock()
                .unwrap()
                .push(format!("press:{}:{}", self.name, pressed));
            self.consume_press
        }
    }

    struct Rig {
        manager: Manager<MockBoard>,
        log: &'static StdMutex<StdVec<std::string::String>>,
    }

    impl Rig {
        fn new() -> Self {
            let log = Box::leak(Box::new(StdMutex::new(StdVec::new())));
            let launcher = Box::leak(Box::new(LauncherView::new()));
            let notifier = Box::leak(Box::new(NotifierView::new()));
            Self {
                manager: Manager::new(MockBoard::default(), launcher, notifier, DEFAULT_IDLE_MS, 2),
                log,
            }
        }

        fn add(&mut self, name: &'static str, quick: bool) -> AppId {
            self.add_app(name, quick, Capabilities::NONE, EventMask::NONE, false, false)
        }

        fn add_app(
            &mut self,
            name: &'static str,
            quick: bool,
            caps: Capabilities,
            subscribe: EventMask,
            consume_swipe: bool,
            consume_press: bool,
        ) -> AppId {
            let app = Box::leak(Box::new(Fixture {
                name,
                caps,
                subscribe,
                consume_swipe,
                consume_press,
                log: self.log,
            }));
            self.manager.register(app, quick).unwrap()
        }

        fn log(&self) -> StdVec<std::string::String> {
            self.log.lock().unwrap().clone()
        }

        fn clear_log(&self) {
            self.log.lock().unwrap().clear();
        }

        fn current_name(&self) -> &'static str {
            let id = self.manager.current_app().unwrap();
            self.manager.container(id).unwrap().name()
        }
    }

    #[test]
    fn test_manager_is_send() {
        // Firmware parks the manager in a static behind a blocking mutex,
        // which requires the whole tree of registered apps to be Send.
        fn assert_send<T: Send>() {}
        assert_send::<Manager<MockBoard>>();
    }

    #[test]
    fn test_launcher_ring_sorted_after_every_insertion() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        for name in ["Torch", "Alarm", "Settings", "Compass"] {
            rig.add(name, false);
            let names: StdVec<_> = rig
                .manager
                .launcher_ring()
                .iter()
                .map(|&id| rig.manager.container(id).unwrap().name())
                .collect();
            let mut sorted = names.clone();
            sorted.sort();
            assert_eq!(names, sorted);
        }
    }

    #[test]
    fn test_quick_ring_keeps_registration_order() {
        let mut rig = Rig::new();
        let a = rig.add("Clock", true);
        let b = rig.add("Stopwatch", true);
        assert_eq!(rig.manager.quick_ring(), &[a, b]);
    }

    #[test]
    fn test_switch_clears_event_mask() {
        let mut rig = Rig::new();
        let subscriber = rig.add_app(
            "Clock",
            true,
            Capabilities::TOUCH,
            EventMask::TOUCH | EventMask::BUTTON,
            false,
            false,
        );
        let plain = rig.add("Stopwatch", true);

        rig.manager.switch(subscriber);
        assert!(rig.manager.api.event_mask().contains(EventMask::TOUCH));

        // The next app starts unsubscribed no matter what the old one
        // had requested.
        rig.manager.switch(plain);
        assert!(rig.manager.api.event_mask().is_empty());
    }

    #[test]
    fn test_switch_backgrounds_old_before_foregrounding_new() {
        let mut rig = Rig::new();
        let a = rig.add("Clock", true);
        let b = rig.add("Stopwatch", true);

        rig.manager.switch(a);
        rig.clear_log();
        rig.manager.switch(b);

        assert_eq!(rig.log(), vec!["bg:Clock", "fg:Stopwatch"]);
        assert!(!rig.manager.container(a).unwrap().is_foreground());
        assert!(rig.manager.container(b).unwrap().is_foreground());
    }

    #[test]
    fn test_first_switch_runs_power_on_sequence() {
        let mut rig = Rig::new();
        let a = rig.add("Clock", true);
        rig.manager.switch(a);

        let ops = rig.manager.board().ops();
        assert_eq!(
            ops,
            vec![
                Op::PowerOn,
                Op::Mute(true),
                Op::Backlight(2),
                Op::Mute(true),
                Op::Reset,
                Op::Mute(false),
            ]
        );
    }

    #[test]
    fn test_quick_ring_navigation_wraps_both_ways() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.add("Stopwatch", true);
        rig.add("Timer", true);
        rig.manager.start(0);
        assert_eq!(rig.current_name(), "Clock");

        rig.manager.navigate(EventKind::Left);
        assert_eq!(rig.current_name(), "Stopwatch");
        rig.manager.navigate(EventKind::Right);
        assert_eq!(rig.current_name(), "Clock");
        rig.manager.navigate(EventKind::Right);
        assert_eq!(rig.current_name(), "Timer");
    }

    #[test]
    fn test_navigation_from_off_ring_defaults_to_index_zero() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.add("Stopwatch", true);
        rig.manager.start(0);

        rig.manager.navigate(EventKind::Up);
        assert_eq!(rig.current_name(), "Launcher");

        rig.manager.navigate(EventKind::Left);
        assert_eq!(rig.current_name(), "Clock");
    }

    #[test]
    fn test_down_returns_to_default_then_notifier_then_pulse() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.add("Stopwatch", true);
        rig.manager.start(0);

        rig.manager.navigate(EventKind::Left);
        assert_eq!(rig.current_name(), "Stopwatch");
        rig.manager.navigate(EventKind::Down);
        assert_eq!(rig.current_name(), "Clock");

        rig.manager.notify(1, "message");
        rig.manager.navigate(EventKind::Down);
        assert_eq!(rig.current_name(), "Notifier");

        rig.manager.navigate(EventKind::Down);
        assert_eq!(rig.current_name(), "Clock");
        rig.manager.unnotify(1);

        let before = rig.manager.board().ops().len();
        rig.manager.navigate(EventKind::Down);
        // No switch; just the haptic pulse.
        assert_eq!(rig.current_name(), "Clock");
        let ops = rig.manager.board().ops();
        assert_eq!(ops.len(), before + 1);
        assert_eq!(ops[before], Op::Pulse);
    }

    #[test]
    fn test_swipe_first_refusal() {
        let mut rig = Rig::new();
        rig.add_app(
            "Reader",
            true,
            Capabilities::SWIPE,
            EventMask::SWIPE_LEFTRIGHT,
            true,
            false,
        );
        rig.add("Stopwatch", true);
        rig.manager.start(0);
        rig.clear_log();

        // Claimed axis, handler consumes: no navigation.
        rig.manager.dispatch_touch(Event::new(EventKind::Left, 0, 0), 0);
        assert_eq!(rig.current_name(), "Reader");
        assert_eq!(rig.log(), vec!["swipe:Reader:Left"]);

        // Unclaimed axis navigates regardless of the handler.
        rig.manager.dispatch_touch(Event::new(EventKind::Down, 0, 0), 0);
        assert_eq!(rig.current_name(), "Reader"); // already default
    }

    #[test]
    fn test_swipe_passthrough_navigates() {
        let mut rig = Rig::new();
        rig.add_app(
            "Reader",
            true,
            Capabilities::SWIPE,
            EventMask::SWIPE_LEFTRIGHT,
            false,
            false,
        );
        rig.add("Stopwatch", true);
        rig.manager.start(0);

        rig.manager.dispatch_touch(Event::new(EventKind::Left, 0, 0), 0);
        assert_eq!(rig.current_name(), "Stopwatch");
    }

    #[test]
    fn test_tap_requires_touch_subscription() {
        let mut rig = Rig::new();
        rig.add_app("Clock", true, Capabilities::TOUCH, EventMask::NONE, false, false);
        rig.manager.start(0);
        rig.clear_log();

        rig.manager.dispatch_touch(Event::new(EventKind::Touch, 12, 34), 0);
        assert!(rig.log().is_empty());
    }

    #[test]
    fn test_dispatch_refreshes_idle_timer_first() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.manager.start(0);
        rig.manager.power_mut().release();

        rig.manager.dispatch_touch(Event::new(EventKind::Touch, 0, 0), 5_000);
        assert_eq!(
            rig.manager.power().deadline_ms(),
            Some(5_000 + u64::from(DEFAULT_IDLE_MS))
        );
        assert!(!rig.manager.power().may_sleep());
    }

    #[test]
    fn test_launcher_tap_launches_ring_entry() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.add("Torch", false);
        rig.manager.start(0);

        rig.manager.navigate(EventKind::Up);
        assert_eq!(rig.current_name(), "Launcher");

        // Top-left grid cell maps to launcher ring index 0.
        rig.manager.dispatch_touch(Event::new(EventKind::Touch, 10, 10), 0);
        assert_eq!(rig.current_name(), "Torch");
    }

    #[test]
    fn test_brightness_setter_writes_through_getter_does_not() {
        let mut rig = Rig::new();
        rig.manager.set_brightness(3);
        assert_eq!(rig.manager.board().ops(), vec![Op::Backlight(3)]);

        let before = rig.manager.board().ops().len();
        assert_eq!(rig.manager.brightness(), 3);
        assert_eq!(rig.manager.board().ops().len(), before);
    }

    #[test]
    fn test_e2e_boot_and_quick_ring_wrap() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.add("Stopwatch", true);

        rig.manager.start(0);
        assert_eq!(rig.current_name(), "Clock");

        rig.manager.navigate(EventKind::Left);
        assert_eq!(rig.current_name(), "Stopwatch");
        rig.manager.navigate(EventKind::Left);
        assert_eq!(rig.current_name(), "Clock");
    }

    #[test]
    fn test_e2e_unclaimed_button_release_navigates_home_and_releases_gate() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.add("Stopwatch", true);
        rig.manager.start(0);
        assert_eq!(rig.current_name(), "Clock");

        rig.manager.dispatch_button(true, 100);
        assert!(!rig.manager.power().may_sleep());

        // Release on the default app with no notifications pending
        // permits sleep.
        rig.manager.dispatch_button(false, 150);
        assert_eq!(rig.current_name(), "Clock");
        assert!(rig.manager.power().may_sleep());
        assert_eq!(rig.manager.power().deadline_ms(), None);
    }

    #[test]
    fn test_e2e_press_while_sleeping_wakes_and_rearms_full_window() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.manager.start(0);

        rig.manager.enter_sleep();
        assert_eq!(rig.manager.power().state(), PowerState::Sleeping);
        assert!(!rig.manager.container(rig.manager.quick_ring()[0]).unwrap().is_foreground());

        // The interrupt bridge recognized a short press; firmware
        // classifies the wake and dispatches the button.
        assert_eq!(WakeKind::from_code(WAKE_REASON_USER), WakeKind::UserInput);
        rig.manager.dispatch_button(true, 60_000);

        assert_eq!(rig.manager.power().state(), PowerState::Awake);
        assert_eq!(
            rig.manager.power().deadline_ms(),
            Some(60_000 + u64::from(DEFAULT_IDLE_MS))
        );
        assert!(rig.manager.container(rig.manager.quick_ring()[0]).unwrap().is_foreground());
        let ops = rig.manager.board().ops();
        assert!(ops.contains(&Op::PowerOn));

        // The waking press never also performs Home navigation.
        rig.manager.dispatch_button(false, 60_050);
        assert!(!rig.manager.power().may_sleep());
        assert_eq!(rig.current_name(), "Clock");
    }

    #[test]
    fn test_enter_sleep_caches_charging_and_is_idempotent() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.manager.start(0);
        rig.manager.board.charging = true;

        rig.manager.enter_sleep();
        assert!(rig.manager.power().charging_at_sleep());

        let ops_before = rig.manager.board().ops().len();
        rig.manager.enter_sleep();
        assert_eq!(rig.manager.board().ops().len(), ops_before);
    }

    #[test]
    fn test_button_first_refusal_when_subscribed() {
        let mut rig = Rig::new();
        rig.add("Clock", true);
        rig.add_app(
            "Game",
            true,
            Capabilities::PRESS,
            EventMask::BUTTON,
            false,
            true,
        );
        rig.manager.start(0);
        rig.manager.navigate(EventKind::Left);
        assert_eq!(rig.current_name(), "Game");

        // Consumed by the subscriber; no Home navigation back to Clock.
        rig.manager.dispatch_button(true, 0);
        rig.manager.dispatch_button(false, 10);
        assert_eq!(rig.current_name(), "Game");
        assert!(!rig.manager.power().may_sleep());
    }

    proptest::proptest! {
        #[test]
        fn prop_left_then_right_returns_to_start(ring_size in 2usize..6, start in 0usize..6) {
            let mut rig = Rig::new();
            let names: &[&'static str] = &["A0", "A1", "A2", "A3", "A4", "A5"];
            for name in names.iter().take(ring_size) {
                rig.add(name, true);
            }
            rig.manager.start(0);
            let start = start % ring_size;
            let id = rig.manager.quick_ring()[start];
            rig.manager.switch(id);
            let origin = rig.current_name();

            rig.manager.navigate(EventKind::Left);
            rig.manager.navigate(EventKind::Right);
            proptest::prop_assert_eq!(rig.current_name(), origin);
        }
    }
}
