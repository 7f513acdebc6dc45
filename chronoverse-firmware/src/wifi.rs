//! Wi-Fi station link
//!
//! Wraps the `esp-radio` station controller and the `embassy-net` stack.
//! The link counts as up once the station is associated and DHCP has
//! handed out an address.

use chronoverse_core::config::WifiConfig;
use chronoverse_core::traits::{LinkError, NetworkLink};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use esp_radio::wifi::{ClientConfig, Config as WifiRuntimeConfig, ModeConfig, WifiController};
use log::{info, warn};

const WIFI_RX_QUEUE_SIZE: usize = 3;
const WIFI_TX_QUEUE_SIZE: usize = 2;
const WIFI_STATIC_RX_BUF_NUM: u8 = 4;
const WIFI_DYNAMIC_RX_BUF_NUM: u16 = 8;
const WIFI_DYNAMIC_TX_BUF_NUM: u16 = 8;

/// How long to wait for a DHCP lease after association
const DHCP_TIMEOUT_MS: u64 = 10_000;

/// Small driver buffers; the device only exchanges a few SNTP datagrams
pub fn runtime_config() -> WifiRuntimeConfig {
    WifiRuntimeConfig::default()
        .with_rx_queue_size(WIFI_RX_QUEUE_SIZE)
        .with_tx_queue_size(WIFI_TX_QUEUE_SIZE)
        .with_static_rx_buf_num(WIFI_STATIC_RX_BUF_NUM)
        .with_dynamic_rx_buf_num(WIFI_DYNAMIC_RX_BUF_NUM)
        .with_dynamic_tx_buf_num(WIFI_DYNAMIC_TX_BUF_NUM)
        .with_ampdu_rx_enable(false)
        .with_ampdu_tx_enable(false)
}

pub struct WifiLink {
    controller: WifiController<'static>,
    stack: Stack<'static>,
}

impl WifiLink {
    pub fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self { controller, stack }
    }

    async fn ensure_started(&mut self) -> Result<(), LinkError> {
        match self.controller.is_started() {
            Ok(true) => Ok(()),
            Ok(false) => self.controller.start_async().await.map_err(|err| {
                warn!("wifi: start err={:?}", err);
                LinkError::Driver
            }),
            Err(err) => {
                warn!("wifi: status err={:?}", err);
                Err(LinkError::Driver)
            }
        }
    }
}

impl NetworkLink for WifiLink {
    async fn connect(&mut self, wifi: &WifiConfig) -> Result<(), LinkError> {
        info!("wifi: connecting to {}", wifi.ssid);

        let mode = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(wifi.ssid.as_str().into())
                .with_password(wifi.password.as_str().into()),
        );
        if let Err(err) = self.controller.set_config(&mode) {
            warn!("wifi: station config err={:?}", err);
            return Err(LinkError::Driver);
        }

        self.ensure_started().await?;

        if let Err(err) = self.controller.connect_async().await {
            warn!("wifi: connect err={:?}", err);
            let _ = self.controller.disconnect_async().await;
            return Err(LinkError::Rejected);
        }

        if with_timeout(
            Duration::from_millis(DHCP_TIMEOUT_MS),
            self.stack.wait_config_up(),
        )
        .await
        .is_err()
        {
            warn!("wifi: no DHCP lease after {}ms", DHCP_TIMEOUT_MS);
            return Err(LinkError::Timeout);
        }

        if let Some(cfg) = self.stack.config_v4() {
            info!("wifi: connected, address {}", cfg.address);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        matches!(self.controller.is_connected(), Ok(true)) && self.stack.is_config_up()
    }
}
