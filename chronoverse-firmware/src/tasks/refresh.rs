//! Refresh task
//!
//! Owns every collaborator and hands them to the refresh scheduler, which
//! never returns.

use chronoverse_core::config::DeviceConfig;
use chronoverse_core::scheduler::RefreshScheduler;
use chronoverse_display::EpaperSurface;
use esp_hal::gpio::{Input, Output};
use esp_hal::spi::master::Spi;
use esp_hal::Blocking;
use log::info;

use crate::clock::EmbassyClock;
use crate::report::LogSink;
use crate::sntp::SntpTimeSource;
use crate::ssd1680::Ssd1680;
use crate::store::FlashContentStore;
use crate::wifi::WifiLink;

/// The board's panel: SPI2 plus CS, DC, RST and BUSY lines
pub type PanelDriver = Ssd1680<
    Spi<'static, Blocking>,
    Output<'static>,
    Output<'static>,
    Output<'static>,
    Input<'static>,
>;

/// Everything the scheduler needs, built in `main`
pub struct RefreshContext {
    pub clock: EmbassyClock,
    pub link: WifiLink,
    pub time: SntpTimeSource,
    pub store: FlashContentStore<'static>,
    pub surface: EpaperSurface<PanelDriver>,
    pub config: DeviceConfig,
}

#[embassy_executor::task]
pub async fn refresh_task(context: RefreshContext) {
    let RefreshContext {
        clock,
        link,
        time,
        store,
        surface,
        config,
    } = context;

    info!(
        "refresh: cadence {}ms, settle margin {}ms",
        config.schedule.cadence_ms, config.schedule.settle_margin_ms
    );

    let mut scheduler = RefreshScheduler::new(clock, link, time, store, surface, &config);
    let mut sink = LogSink::default();
    scheduler.run(&mut sink).await
}
