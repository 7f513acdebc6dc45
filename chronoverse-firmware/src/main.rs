//! Chronoverse - minute-by-minute e-paper verse clock
//!
//! Firmware for ESP32 boards with an SSD1680 tri-color panel. Shows the
//! time and a verse keyed to the current minute, refreshes on each minute
//! boundary and resynchronizes over SNTP once per hour.

#![no_std]
#![no_main]

extern crate alloc;

use embassy_net::{Runner, StackResources};
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig};
use esp_hal::rng::Rng;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode as SpiMode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::wifi::WifiDevice;
use esp_storage::FlashStorage;
use log::{error, info};
use static_cell::StaticCell;

use esp_backtrace as _;

use chronoverse_core::config::{parse_config, DeviceConfig};
use chronoverse_core::ErrorKind;
use chronoverse_display::EpaperSurface;

mod clock;
mod report;
mod sntp;
mod ssd1680;
mod store;
mod tasks;
mod wifi;

use crate::clock::EmbassyClock;
use crate::sntp::SntpTimeSource;
use crate::ssd1680::Ssd1680;
use crate::store::FlashContentStore;
use crate::tasks::refresh::{refresh_task, RefreshContext};
use crate::wifi::WifiLink;

/// Embedded configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

// Heap for content buckets, frame planes and the Wi-Fi driver
const HEAP_SIZE: usize = 96 * 1024;

static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();
static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);
    info!("Chronoverse firmware starting...");

    let config = load_config();

    // Wi-Fi station and network stack
    let Ok(radio_ctrl) = esp_radio::init() else {
        error!("wifi: radio init failed");
        halt();
    };
    let radio_ctrl = RADIO_CTRL.init(radio_ctrl);
    let Ok((controller, ifaces)) =
        esp_radio::wifi::new(radio_ctrl, peripherals.WIFI, wifi::runtime_config())
    else {
        error!("wifi: driver init failed");
        halt();
    };

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let (stack, runner) = embassy_net::new(
        ifaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    // SSD1680 panel on SPI2
    let spi_cfg = SpiConfig::default()
        .with_frequency(Rate::from_mhz(4))
        .with_mode(SpiMode::_0);
    let Ok(spi) = Spi::new(peripherals.SPI2, spi_cfg) else {
        error!("panel: SPI init failed");
        halt();
    };
    let spi = spi
        .with_sck(peripherals.GPIO18)
        .with_mosi(peripherals.GPIO23);
    let panel = Ssd1680::new(
        spi,
        Output::new(peripherals.GPIO5, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO17, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO16, Level::High, OutputConfig::default()),
        Input::new(peripherals.GPIO4, InputConfig::default()),
    );

    // Frame planes are the one allocation the device cannot run without
    let surface = match EpaperSurface::new(panel) {
        Ok(surface) => surface,
        Err(e) => {
            error!("panel: frame buffer unavailable ({:?}), halting", ErrorKind::from(e));
            halt();
        }
    };

    let flash = FlashStorage::new(peripherals.FLASH).multicore_auto_park();
    let store = FlashContentStore::new(flash);

    let context = RefreshContext {
        clock: EmbassyClock,
        link: WifiLink::new(controller, stack),
        time: SntpTimeSource::new(stack, &config.time),
        store,
        surface,
        config,
    };

    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(move |spawner| {
        spawner.must_spawn(net_task(runner));
        spawner.must_spawn(refresh_task(context));
    })
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config loaded: ssid={}, server={}, offset={}s",
                config.wifi.ssid,
                config.time.server,
                config.time.total_offset_s()
            );
            config
        }
        Err(e) => {
            error!("Config parse failed: {:?}, using defaults", e);
            DeviceConfig::default()
        }
    }
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

/// Park the core forever
fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
