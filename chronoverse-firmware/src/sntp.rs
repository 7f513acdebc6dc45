//! SNTP time source
//!
//! One request/response exchange per sync. The reply's transmit timestamp
//! becomes a time base anchored to the monotonic clock; `now()` extends it
//! with elapsed ticks, so reads never touch the network.

use chronoverse_core::config::{TimeConfig, MAX_SERVER_LEN};
use chronoverse_core::ntp::{parse_response, request_packet, NtpTime, NTP_PORT, PACKET_LEN};
use chronoverse_core::time::Timestamp;
use chronoverse_core::traits::{TimeError, TimeSource};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Ipv4Address, Stack};
use embassy_time::{with_timeout, Duration, Instant};
use heapless::String;
use log::{info, warn};

/// Bound on one exchange, DNS lookup included
const EXCHANGE_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy)]
struct TimeBase {
    unix_ms: u64,
    at: Instant,
}

/// [`TimeSource`] that queries one SNTP server over UDP
pub struct SntpTimeSource {
    stack: Stack<'static>,
    server: String<MAX_SERVER_LEN>,
    offset_s: i32,
    base: Option<TimeBase>,
}

impl SntpTimeSource {
    pub fn new(stack: Stack<'static>, config: &TimeConfig) -> Self {
        Self {
            stack,
            server: config.server.clone(),
            offset_s: config.total_offset_s(),
            base: None,
        }
    }

    async fn resolve(&self) -> Result<IpAddress, TimeError> {
        if let Ok(addr) = self.server.parse::<Ipv4Address>() {
            return Ok(IpAddress::Ipv4(addr));
        }
        let addrs = self
            .stack
            .dns_query(&self.server, DnsQueryType::A)
            .await
            .map_err(|err| {
                warn!("sntp: dns lookup of {} failed: {:?}", self.server, err);
                TimeError::Network
            })?;
        addrs.first().copied().ok_or(TimeError::Network)
    }

    async fn exchange(&self) -> Result<(IpAddress, NtpTime, Instant), TimeError> {
        let addr = self.resolve().await?;

        let mut rx_meta = [PacketMetadata::EMPTY; 2];
        let mut rx_buf = [0u8; 128];
        let mut tx_meta = [PacketMetadata::EMPTY; 2];
        let mut tx_buf = [0u8; 128];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buf,
            &mut tx_meta,
            &mut tx_buf,
        );
        socket.bind(0).map_err(|_| TimeError::Network)?;

        socket
            .send_to(&request_packet(), IpEndpoint::new(addr, NTP_PORT))
            .await
            .map_err(|_| TimeError::Network)?;

        let mut reply = [0u8; PACKET_LEN];
        let (len, _) = socket
            .recv_from(&mut reply)
            .await
            .map_err(|_| TimeError::Network)?;
        let at = Instant::now();
        Ok((addr, parse_response(&reply[..len])?, at))
    }
}

impl TimeSource for SntpTimeSource {
    async fn sync(&mut self) -> Result<(), TimeError> {
        if !self.stack.is_config_up() {
            return Err(TimeError::Network);
        }
        let (addr, time, at) = with_timeout(
            Duration::from_millis(EXCHANGE_TIMEOUT_MS),
            self.exchange(),
        )
        .await
        .map_err(|_| TimeError::Timeout)??;

        self.base = Some(TimeBase {
            unix_ms: time.unix_ms(),
            at,
        });
        info!("sntp: synced to {} (unix {})", addr, time.unix_s);
        Ok(())
    }

    fn now(&self) -> Result<Timestamp, TimeError> {
        let base = self.base.ok_or(TimeError::Unavailable)?;
        let unix_ms = base.unix_ms + base.at.elapsed().as_millis();
        Ok(Timestamp::from_unix_seconds(
            unix_ms / 1000,
            (unix_ms % 1000) as u16,
            self.offset_s,
        ))
    }
}
