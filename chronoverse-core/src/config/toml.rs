//! Simple TOML parser for device configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `device.toml`. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - [section.subsection] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays and inline tables
//! - Dotted keys outside section headers
//!
//! Unknown keys are ignored so older firmware accepts newer files.
//! Unknown sections are rejected.

use heapless::String;

use super::types::{DeviceConfig, LinkDownPolicy, RetryPolicy};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String value exceeds its fixed capacity
    ValueTooLong,
    /// Required key is absent
    MissingKey(&'static str),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Time,
    Schedule,
    RetryConnect,
    RetrySync,
}

/// Parse TOML configuration into DeviceConfig
///
/// Keys absent from the file keep their defaults, except `wifi.ssid`,
/// which is required.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let Some((key, value)) = parse_key_value(line) else {
            continue;
        };

        match section {
            Section::Root => {}
            Section::Wifi => match key {
                "ssid" => config.wifi.ssid = parse_bounded(value)?,
                "password" => config.wifi.password = parse_bounded(value)?,
                _ => {}
            },
            Section::Time => match key {
                "server" => config.time.server = parse_bounded(value)?,
                "utc_offset_s" => config.time.utc_offset_s = parse_int(value)?,
                "dst_offset_s" => config.time.dst_offset_s = parse_int(value)?,
                _ => {}
            },
            Section::Schedule => match key {
                "cadence_ms" => config.schedule.cadence_ms = parse_nonzero(value)?,
                "settle_margin_ms" => config.schedule.settle_margin_ms = parse_int(value)?,
                "link_down_policy" => {
                    config.schedule.link_down_policy = parse_link_down_policy(value)?
                }
                "recover_when_unsynced" => {
                    config.schedule.recover_when_unsynced = parse_bool(value)?
                }
                _ => {}
            },
            Section::RetryConnect => apply_retry_key(&mut config.retry.connect, key, value)?,
            Section::RetrySync => apply_retry_key(&mut config.retry.sync, key, value)?,
        }
    }

    if config.wifi.ssid.is_empty() {
        return Err(ParseError::MissingKey("wifi.ssid"));
    }
    if config.time.server.is_empty() {
        return Err(ParseError::MissingKey("time.server"));
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "wifi" => Ok(Section::Wifi),
        "time" => Ok(Section::Time),
        "schedule" => Ok(Section::Schedule),
        "retry.connect" => Ok(Section::RetryConnect),
        "retry.sync" => Ok(Section::RetrySync),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_retry_key(policy: &mut RetryPolicy, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "budget_ms" => policy.budget_ms = parse_int(value)?,
        "initial_backoff_ms" => policy.initial_backoff_ms = parse_nonzero(value)?,
        "max_backoff_ms" => policy.max_backoff_ms = parse_nonzero(value)?,
        _ => {}
    }
    Ok(())
}

/// Parse a key = value line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse a string into a fixed-capacity buffer
fn parse_bounded<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let mut out = String::new();
    out.push_str(parse_string(value))
        .map_err(|_| ParseError::ValueTooLong)?;
    Ok(out)
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse an integer that must be greater than zero
fn parse_nonzero(value: &str) -> Result<u32, ParseError> {
    match parse_int::<u32>(value)? {
        0 => Err(ParseError::InvalidValue),
        n => Ok(n),
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_link_down_policy(value: &str) -> Result<LinkDownPolicy, ParseError> {
    match parse_string(value) {
        "retry_next_cycle" => Ok(LinkDownPolicy::RetryNextCycle),
        "consume_hour" => Ok(LinkDownPolicy::ConsumeHour),
        _ => Err(ParseError::InvalidValue),
    }
}
