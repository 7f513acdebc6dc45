//! Configuration type definitions
//!
//! The firmware embeds `device.toml` and parses it into these types at
//! boot. String fields use fixed capacities so the whole configuration can
//! live outside the heap.

use heapless::String;

pub use crate::retry::RetryPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum time server host name length
pub const MAX_SERVER_LEN: usize = 64;

/// Default display cadence
pub const DEFAULT_CADENCE_MS: u32 = 60_000;

/// Default margin added after the minute boundary at boot
pub const DEFAULT_SETTLE_MARGIN_MS: u32 = 1_000;

/// Default time server
pub const DEFAULT_TIME_SERVER: &str = "pool.ntp.org";

/// Wi-Fi station credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WifiConfig {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

/// Time service settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeConfig {
    /// Host name or dotted IPv4 address of the SNTP server
    pub server: String<MAX_SERVER_LEN>,
    /// Zone offset from UTC in seconds
    pub utc_offset_s: i32,
    /// Additional daylight-saving offset in seconds
    pub dst_offset_s: i32,
}

impl TimeConfig {
    /// Total offset applied to UTC to get local time
    pub fn total_offset_s(&self) -> i32 {
        self.utc_offset_s.saturating_add(self.dst_offset_s)
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        let mut server = String::new();
        let _ = server.push_str(DEFAULT_TIME_SERVER);
        Self {
            server,
            utc_offset_s: 3600,
            dst_offset_s: 3600,
        }
    }
}

/// What a sync check does when the link is down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkDownPolicy {
    /// Leave the hour unmarked so the next cycle checks again
    #[default]
    RetryNextCycle,
    /// Mark the hour as attempted; the next check is next hour
    ConsumeHour,
}

/// Refresh cadence settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleConfig {
    /// Target interval between refresh cycles
    pub cadence_ms: u32,
    /// Extra wait after the minute boundary during boot alignment
    pub settle_margin_ms: u32,
    pub link_down_policy: LinkDownPolicy,
    /// Attempt a sync in cycles where the time is unavailable
    pub recover_when_unsynced: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cadence_ms: DEFAULT_CADENCE_MS,
            settle_margin_ms: DEFAULT_SETTLE_MARGIN_MS,
            link_down_policy: LinkDownPolicy::RetryNextCycle,
            recover_when_unsynced: true,
        }
    }
}

/// Budgets for the bounded operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RetryConfig {
    pub connect: RetryPolicy,
    pub sync: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            connect: RetryPolicy::CONNECT,
            sync: RetryPolicy::SYNC,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub wifi: WifiConfig,
    pub time: TimeConfig,
    pub schedule: ScheduleConfig,
    pub retry: RetryConfig,
}
