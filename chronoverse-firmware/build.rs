//! Build script for chronoverse-firmware
//!
//! - Passes the esp-hal linker script to the binary
//! - Validates device.toml at compile time

use std::fs;
use std::path::Path;

fn main() {
    setup_linker();
    validate_config();
}

/// Link against the scripts esp-hal and esp-rtos ship
fn setup_linker() {
    println!("cargo:rustc-link-arg=-Tlinkall.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml at build time.                  ║\n\
            ║  Create one in the chronoverse-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_wifi(&config, &mut errors);
    validate_time(&config, &mut errors);
    validate_schedule(&config, &mut errors);
    validate_retry(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_wifi(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(wifi) = config.get("wifi").and_then(|w| w.as_table()) else {
        errors.push("Missing [wifi] section".to_string());
        return;
    };

    match wifi.get("ssid") {
        Some(toml::Value::String(ssid)) if ssid.is_empty() => {
            errors.push("[wifi] ssid cannot be empty".to_string())
        }
        Some(toml::Value::String(ssid)) if ssid.len() > 32 => {
            errors.push("[wifi] ssid must be at most 32 bytes".to_string())
        }
        Some(toml::Value::String(_)) => {}
        Some(_) => errors.push("[wifi] ssid must be a string".to_string()),
        None => errors.push("[wifi] missing 'ssid'".to_string()),
    }

    if let Some(password) = wifi.get("password") {
        match password.as_str() {
            Some(p) if p.len() > 64 => {
                errors.push("[wifi] password must be at most 64 bytes".to_string())
            }
            Some(_) => {}
            None => errors.push("[wifi] password must be a string".to_string()),
        }
    }
}

fn validate_time(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(time) = config.get("time").and_then(|t| t.as_table()) else {
        return;
    };

    if let Some(server) = time.get("server") {
        match server.as_str() {
            Some("") => errors.push("[time] server cannot be empty".to_string()),
            Some(s) if s.len() > 64 => {
                errors.push("[time] server must be at most 64 bytes".to_string())
            }
            Some(_) => {}
            None => errors.push("[time] server must be a string".to_string()),
        }
    }

    for key in ["utc_offset_s", "dst_offset_s"] {
        if let Some(value) = time.get(key) {
            match value.as_integer() {
                Some(offset) if offset.abs() > 14 * 3600 => {
                    errors.push(format!("[time] {} must be within ±14 hours", key))
                }
                Some(_) => {}
                None => errors.push(format!("[time] {} must be an integer", key)),
            }
        }
    }
}

fn validate_schedule(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(schedule) = config.get("schedule").and_then(|s| s.as_table()) else {
        return;
    };

    if let Some(value) = schedule.get("cadence_ms") {
        match value.as_integer() {
            Some(ms) if ms < 1_000 => {
                errors.push("[schedule] cadence_ms must be at least 1000".to_string())
            }
            Some(_) => {}
            None => errors.push("[schedule] cadence_ms must be an integer".to_string()),
        }
    }

    if let Some(policy) = schedule.get("link_down_policy") {
        if !matches!(
            policy.as_str(),
            Some("retry_next_cycle") | Some("consume_hour")
        ) {
            errors.push(
                "[schedule] link_down_policy must be 'retry_next_cycle' or 'consume_hour'"
                    .to_string(),
            );
        }
    }
}

fn validate_retry(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(retry) = config.get("retry").and_then(|r| r.as_table()) else {
        return;
    };

    for (name, policy) in retry {
        if !["connect", "sync"].contains(&name.as_str()) {
            errors.push(format!("[retry.{}] is not a known retry policy", name));
            continue;
        }
        let Some(policy) = policy.as_table() else {
            errors.push(format!("[retry.{}] must be a table", name));
            continue;
        };
        for key in ["budget_ms", "initial_backoff_ms", "max_backoff_ms"] {
            if let Some(value) = policy.get(key) {
                if !value.as_integer().is_some_and(|v| v > 0) {
                    errors.push(format!("[retry.{}] {} must be a positive integer", name, key));
                }
            }
        }
    }
}
