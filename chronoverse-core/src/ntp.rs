//! SNTP packet codec
//!
//! Builds the 48-byte client request and decodes the transmit timestamp of
//! a server reply. The socket side lives with the network stack.

use crate::traits::TimeError;

pub const NTP_PORT: u16 = 123;

/// Size of an SNTP packet without extensions
pub const PACKET_LEN: usize = 48;

/// Seconds from the NTP epoch (1900) to the Unix epoch (1970)
pub const NTP_UNIX_OFFSET_S: u64 = 2_208_988_800;

/// LI = 0, VN = 3, mode = 3 (client)
const CLIENT_HEADER: u8 = 0x1B;

const MODE_SERVER: u8 = 4;

/// Server time decoded from a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtpTime {
    pub unix_s: u64,
    pub millis: u16,
}

impl NtpTime {
    pub fn unix_ms(&self) -> u64 {
        self.unix_s * 1000 + u64::from(self.millis)
    }
}

/// Build a client request
pub fn request_packet() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = CLIENT_HEADER;
    packet
}

/// Decode the transmit timestamp of a server reply
pub fn parse_response(packet: &[u8]) -> Result<NtpTime, TimeError> {
    if packet.len() < PACKET_LEN {
        return Err(TimeError::Protocol);
    }
    if packet[0] & 0x07 != MODE_SERVER {
        return Err(TimeError::Protocol);
    }
    // Stratum 0 is a kiss-of-death reply
    if packet[1] == 0 {
        return Err(TimeError::Protocol);
    }

    let seconds = u32::from_be_bytes([packet[40], packet[41], packet[42], packet[43]]);
    let fraction = u32::from_be_bytes([packet[44], packet[45], packet[46], packet[47]]);
    if seconds == 0 && fraction == 0 {
        return Err(TimeError::Protocol);
    }

    // Values below the Unix offset belong to NTP era 1 (from 2036)
    let seconds = u64::from(seconds);
    let unix_s = if seconds >= NTP_UNIX_OFFSET_S {
        seconds - NTP_UNIX_OFFSET_S
    } else {
        seconds + (1 << 32) - NTP_UNIX_OFFSET_S
    };
    let millis = ((u64::from(fraction) * 1000) >> 32) as u16;
    Ok(NtpTime { unix_s, millis })
}
