//! SSD1680 tri-color e-paper driver
//!
//! Driver for 296x128 black/white/red panels over 4-wire SPI. The
//! controller is reset and initialized before every update and put into
//! deep sleep afterwards, so it draws no current between minutes.

use chronoverse_core::traits::SurfaceError;
use chronoverse_display::{Panel, PANEL_HEIGHT, PANEL_WIDTH};
use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use log::{debug, warn};

/// Source lines (panel short side)
const SOURCES: u16 = PANEL_HEIGHT as u16;
/// Gate lines (panel long side)
const GATES: u16 = PANEL_WIDTH as u16;
const ROW_BYTES: usize = SOURCES as usize / 8;
const PLANE_LEN: usize = ROW_BYTES * GATES as usize;

const RESET_PULSE_MS: u64 = 10;
const BUSY_POLL_MS: u64 = 10;
const BUSY_TIMEOUT_MS: u64 = 2_000;
const REFRESH_TIMEOUT_MS: u64 = 30_000;

/// SSD1680 commands
#[allow(dead_code)]
mod cmd {
    pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const TEMP_SENSOR: u8 = 0x18;
    pub const MASTER_ACTIVATION: u8 = 0x20;
    pub const DISPLAY_UPDATE_CONTROL_1: u8 = 0x21;
    pub const DISPLAY_UPDATE_CONTROL_2: u8 = 0x22;
    pub const WRITE_BW_RAM: u8 = 0x24;
    pub const WRITE_RED_RAM: u8 = 0x26;
    pub const BORDER_WAVEFORM: u8 = 0x3C;
    pub const RAM_X_RANGE: u8 = 0x44;
    pub const RAM_Y_RANGE: u8 = 0x45;
    pub const RAM_X_COUNTER: u8 = 0x4E;
    pub const RAM_Y_COUNTER: u8 = 0x4F;
}

/// SSD1680 panel driver
pub struct Ssd1680<SPI, CS, DC, RST, BUSY> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    /// High while the controller is busy
    busy: BUSY,
}

impl<SPI, CS, DC, RST, BUSY> Ssd1680<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            busy,
        }
    }

    /// Hardware reset, software reset and panel geometry setup
    async fn init(&mut self) -> Result<(), SurfaceError> {
        self.rst.set_low().map_err(|_| SurfaceError::Bus)?;
        Timer::after_millis(RESET_PULSE_MS).await;
        self.rst.set_high().map_err(|_| SurfaceError::Bus)?;
        Timer::after_millis(RESET_PULSE_MS).await;

        self.command(cmd::SW_RESET, &[])?;
        self.wait_idle(BUSY_TIMEOUT_MS).await?;

        let last_gate = GATES - 1;
        self.command(
            cmd::DRIVER_OUTPUT_CONTROL,
            &[(last_gate & 0xFF) as u8, (last_gate >> 8) as u8, 0x00],
        )?;
        // X then Y increment
        self.command(cmd::DATA_ENTRY_MODE, &[0x03])?;
        self.command(cmd::RAM_X_RANGE, &[0x00, (ROW_BYTES - 1) as u8])?;
        self.command(
            cmd::RAM_Y_RANGE,
            &[0x00, 0x00, (last_gate & 0xFF) as u8, (last_gate >> 8) as u8],
        )?;
        self.command(cmd::BORDER_WAVEFORM, &[0x05])?;
        self.command(cmd::DISPLAY_UPDATE_CONTROL_1, &[0x00, 0x80])?;
        // Internal temperature sensor
        self.command(cmd::TEMP_SENSOR, &[0x80])?;
        self.wait_idle(BUSY_TIMEOUT_MS).await
    }

    fn reset_counters(&mut self) -> Result<(), SurfaceError> {
        self.command(cmd::RAM_X_COUNTER, &[0x00])?;
        self.command(cmd::RAM_Y_COUNTER, &[0x00, 0x00])
    }

    /// Stream one plane into controller RAM
    ///
    /// BW RAM uses 1 for white, so black ink is inverted on the way out.
    fn write_plane(&mut self, command: u8, plane: &[u8], invert: bool) -> Result<(), SurfaceError> {
        self.reset_counters()?;
        self.select(true)?;
        let result = self.send_command(command).and_then(|()| {
            let mut chunk = [0u8; 64];
            for block in plane.chunks(chunk.len()) {
                for (out, &byte) in chunk.iter_mut().zip(block) {
                    *out = if invert { !byte } else { byte };
                }
                self.send_data(&chunk[..block.len()])?;
            }
            Ok(())
        });
        self.select(false)?;
        result
    }

    async fn refresh(&mut self) -> Result<(), SurfaceError> {
        self.command(cmd::DISPLAY_UPDATE_CONTROL_2, &[0xF7])?;
        self.command(cmd::MASTER_ACTIVATION, &[])?;
        self.wait_idle(REFRESH_TIMEOUT_MS).await
    }

    fn deep_sleep(&mut self) -> Result<(), SurfaceError> {
        self.command(cmd::DEEP_SLEEP, &[0x01])
    }

    /// Send a command and its parameters in one chip-select window
    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), SurfaceError> {
        self.select(true)?;
        let result = self.send_command(command).and_then(|()| {
            if data.is_empty() {
                Ok(())
            } else {
                self.send_data(data)
            }
        });
        self.select(false)?;
        result
    }

    fn send_command(&mut self, command: u8) -> Result<(), SurfaceError> {
        self.dc.set_low().map_err(|_| SurfaceError::Bus)?;
        self.spi.write(&[command]).map_err(|_| SurfaceError::Bus)?;
        self.spi.flush().map_err(|_| SurfaceError::Bus)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), SurfaceError> {
        self.dc.set_high().map_err(|_| SurfaceError::Bus)?;
        self.spi.write(data).map_err(|_| SurfaceError::Bus)?;
        self.spi.flush().map_err(|_| SurfaceError::Bus)
    }

    fn select(&mut self, selected: bool) -> Result<(), SurfaceError> {
        let result = if selected {
            self.cs.set_low()
        } else {
            self.cs.set_high()
        };
        result.map_err(|_| SurfaceError::Bus)
    }

    async fn wait_idle(&mut self, timeout_ms: u64) -> Result<(), SurfaceError> {
        let start = Instant::now();
        while self.busy.is_high().map_err(|_| SurfaceError::Bus)? {
            if start.elapsed() > Duration::from_millis(timeout_ms) {
                warn!("panel: busy for more than {}ms", timeout_ms);
                return Err(SurfaceError::Busy);
            }
            Timer::after_millis(BUSY_POLL_MS).await;
        }
        Ok(())
    }
}

impl<SPI, CS, DC, RST, BUSY> Panel for Ssd1680<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    async fn show(&mut self, black: &[u8], red: &[u8]) -> Result<(), SurfaceError> {
        if black.len() != PLANE_LEN || red.len() != PLANE_LEN {
            return Err(SurfaceError::Bus);
        }

        let start = Instant::now();
        self.init().await?;
        self.write_plane(cmd::WRITE_BW_RAM, black, true)?;
        self.write_plane(cmd::WRITE_RED_RAM, red, false)?;
        self.refresh().await?;
        self.deep_sleep()?;
        debug!("panel: refreshed in {}ms", start.elapsed().as_millis());
        Ok(())
    }
}
