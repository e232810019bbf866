//! Armilla - wearable runtime shell
//!
//! Main firmware binary for an RP2040 (Pico-W-class) watch board.
//! The shell logic lives in armilla-core; this binary wires it to the
//! panel, touch controller, PMIC, RTC chip and radio through Embassy
//! tasks.
//!
//! Named after the Latin "armilla" - the arm-ring, the oldest
//! wearable.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, PIO0};
use embassy_rp::pio::Pio;
use embassy_rp::spi::{self, Spi};
use embassy_sync::blocking_mutex::Mutex;
use embedded_alloc::LlffHeap as Heap;
use panic_persist as _;
use static_cell::StaticCell;
use {cyw43_pio::PioSpi, defmt_rtt as _};

use armilla_core::manager::Manager;

use crate::apps::{ClockApp, StopwatchApp};
use crate::board::cst816s::Cst816s;
use crate::board::pcf8563::{Pcf8563, SntpRtc};
use crate::board::pmic::Pmic;
use crate::board::st7789::St7789;
use crate::board::wifi::WifiLink;
use crate::board::{SharedI2c, WatchBoard};
use crate::crash::FLASH_SIZE;
use crate::system::{now_ms, publish_state, with_manager, SharedManager};

use armilla_core::apps::{LauncherView, NotifierView};

mod apps;
mod board;
mod channels;
mod crash;
mod system;
mod tasks;

/// Shell tunables generated from armilla.toml by build.rs.
mod config_gen {
    include!(concat!(env!("OUT_DIR"), "/config_gen.rs"));
}

bind_interrupts!(struct Irqs {
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Heap allocator (small; only transient formatting and driver scratch)
#[global_allocator]
static HEAP: Heap = Heap::empty();

const HEAP_SIZE: usize = 16 * 1024;

static I2C_BUS: StaticCell<SharedI2c> = StaticCell::new();
static MANAGER: StaticCell<SharedManager> = StaticCell::new();
static LAUNCHER: StaticCell<LauncherView> = StaticCell::new();
static NOTIFIER: StaticCell<NotifierView> = StaticCell::new();
static CLOCK: StaticCell<ClockApp> = StaticCell::new();
static STOPWATCH: StaticCell<StopwatchApp> = StaticCell::new();
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("armilla firmware starting");

    init_heap();

    let p = embassy_rp::init(Default::default());

    // Persist a crash record from the previous boot, if any, before
    // anything else can panic over it.
    let mut flash = Flash::<_, _, FLASH_SIZE>::new_blocking(p.FLASH);
    crash::store_pending(&mut flash);

    // Shared blocking I2C bus: PMIC and RTC chip
    let i2c0 = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let i2c_bus = I2C_BUS.init(Mutex::new(RefCell::new(i2c0)));
    let pmic = Pmic::new(i2c_bus);
    let rtc_chip = Pcf8563::new(i2c_bus);

    // Display on its own SPI bus
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 32_000_000;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let mut display = St7789::new(
        spi,
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_20, Level::Low),
        Output::new(p.PIN_21, Level::High),
    );
    display.init();

    // The manager and its board adapter
    let board = WatchBoard::new(display, pmic);
    let launcher = LAUNCHER.init(LauncherView::new());
    let notifier = NOTIFIER.init(NotifierView::new());
    let mut manager = Manager::new(
        board,
        launcher,
        notifier,
        config_gen::IDLE_WINDOW_MS,
        config_gen::BRIGHTNESS,
    );

    let clock_id = manager
        .register(CLOCK.init(ClockApp::new()), true)
        .unwrap();
    let stopwatch_id = manager
        .register(STOPWATCH.init(StopwatchApp::new()), true)
        .unwrap();

    let shared: &'static SharedManager = MANAGER.init(Mutex::new(RefCell::new(manager)));
    with_manager(shared, |m| m.start(now_ms()));
    publish_state(shared);
    info!("manager started");

    // CYW43 radio bring-up. The firmware blobs are flashed separately
    // (probe-rs download, see cyw43-firmware upstream) at fixed
    // offsets near the end of flash.
    let fw = unsafe { core::slice::from_raw_parts(0x1014_0000 as *const u8, 230321) };
    let clm = unsafe { core::slice::from_raw_parts(0x1018_0000 as *const u8, 4752) };

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let radio_spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        cyw43_pio::DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, radio_spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();
    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let net_config = embassy_net::Config::dhcpv4(Default::default());
    // Fixed seed; no entropy source is wired up yet.
    let seed = 0x8a3c_f0d1_9e42_77b5;
    let (stack, net_runner) = embassy_net::new(
        net_device,
        net_config,
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(net_runner)).unwrap();
    info!("radio initialized");

    // Touch controller on the async I2C bus
    let i2c1 = I2c::new_async(p.I2C1, p.PIN_7, p.PIN_6, Irqs, i2c::Config::default());
    let touch = Cst816s::new(i2c1);

    let link = WifiLink::new(control, stack, config_gen::WIFI_CREDENTIALS);
    let sntp = SntpRtc::new(stack, rtc_chip);

    // Input bridges
    spawner
        .spawn(tasks::touch_task(touch, Input::new(p.PIN_10, Pull::Up)))
        .unwrap();
    spawner
        .spawn(tasks::button_task(pmic, Input::new(p.PIN_11, Pull::Up)))
        .unwrap();
    spawner
        .spawn(tasks::rtc_tick_task(Input::new(p.PIN_12, Pull::Up)))
        .unwrap();
    spawner
        .spawn(tasks::motion_task(Input::new(p.PIN_13, Pull::Up)))
        .unwrap();
    spawner
        .spawn(tasks::vibrator_task(Output::new(p.PIN_14, Level::Low)))
        .unwrap();

    // Shell tasks
    spawner.spawn(tasks::dispatch_task(shared)).unwrap();
    spawner.spawn(tasks::idle_timer_task(shared)).unwrap();
    spawner.spawn(tasks::sleep_task(shared)).unwrap();
    spawner.spawn(tasks::connectivity_task(link, sntp)).unwrap();
    spawner.spawn(tasks::app_task(shared, clock_id)).unwrap();
    spawner.spawn(tasks::app_task(shared, stopwatch_id)).unwrap();

    info!("all tasks spawned, shell running");

    // Housekeeping: periodic allocator watermark. A panic escaping any
    // task lands in panic-persist and comes back as a crash record.
    loop {
        embassy_time::Timer::after_secs(30).await;
        trace!("heap used {} free {}", HEAP.used(), HEAP.free());
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
