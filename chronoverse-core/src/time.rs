//! Wall-clock snapshots and the hour/minute keys content is indexed by

use core::fmt::{self, Write};

use heapless::String;

/// Milliseconds in one minute
pub const MILLIS_PER_MINUTE: u32 = 60_000;

const SECONDS_PER_DAY: i64 = 86_400;

/// Formatted `HH:MM` text
pub type TimeText = String<5>;

/// Bucket identifier for one hour of content
///
/// Keys run 1..=24. Hour-of-day 0 maps to 24 so bucket names stay
/// one-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HourKey(u8);

impl HourKey {
    /// Create a key from its raw 1..=24 value
    pub fn new(key: u8) -> Option<Self> {
        (1..=24).contains(&key).then_some(Self(key))
    }

    /// Normalize an hour of day (0..=23) into a bucket key
    pub fn from_hour(hour: u8) -> Option<Self> {
        match hour {
            0 => Some(Self(24)),
            1..=23 => Some(Self(hour)),
            _ => None,
        }
    }

    /// Raw key value (1..=24)
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot index (key 1 is slot 0)
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All 24 keys in ascending order
    pub fn all() -> impl Iterator<Item = HourKey> {
        (1..=24).map(HourKey)
    }
}

impl fmt::Display for HourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Minute within the hour, used to look up an entry in a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinuteKey(u8);

impl MinuteKey {
    pub fn from_minute(minute: u8) -> Option<Self> {
        (minute < 60).then_some(Self(minute))
    }

    /// Parse the two-digit form used in bucket files ("00".."59")
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Self::from_minute((bytes[0] - b'0') * 10 + (bytes[1] - b'0'))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for MinuteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Local wall-clock time of day
///
/// Produced by the time source and frozen for the duration of a refresh
/// cycle, so the hour used for the sync check is the hour used for
/// content resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    hour: u8,
    minute: u8,
    second: u8,
    millis: u16,
}

impl Timestamp {
    pub fn new(hour: u8, minute: u8, second: u8, millis: u16) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 || millis > 999 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
            millis,
        })
    }

    /// Convert UTC unix seconds into local time of day
    ///
    /// `offset_s` is the total local offset (zone plus daylight saving)
    /// and may be negative.
    pub fn from_unix_seconds(unix_s: u64, millis: u16, offset_s: i32) -> Self {
        let local = unix_s as i64 + i64::from(offset_s);
        let of_day = local.rem_euclid(SECONDS_PER_DAY) as u32;
        Self {
            hour: (of_day / 3600) as u8,
            minute: (of_day / 60 % 60) as u8,
            second: (of_day % 60) as u8,
            millis: millis.min(999),
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn millis(&self) -> u16 {
        self.millis
    }

    /// Bucket key for this timestamp's hour
    pub fn hour_key(&self) -> HourKey {
        HourKey::from_hour(self.hour).unwrap_or(HourKey(24))
    }

    pub fn minute_key(&self) -> MinuteKey {
        MinuteKey(self.minute)
    }

    /// Zero-padded `HH:MM`
    pub fn time_text(&self) -> TimeText {
        let mut text = TimeText::new();
        // Two two-digit fields and a colon always fit
        let _ = write!(text, "{:02}:{:02}", self.hour, self.minute);
        text
    }

    /// Milliseconds until the next `:00` second boundary (1..=60_000)
    pub fn millis_until_next_minute(&self) -> u32 {
        (59 - u32::from(self.second)) * 1000 + (1000 - u32::from(self.millis))
    }
}
