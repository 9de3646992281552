//! Configuration module for the AeroMed backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default delivery placeholder delay, matching the dashboard's flight timer.
pub const DEFAULT_DELIVERY_SECS: u64 = 10;

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var} value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (disabled when unset)
    pub api_psk: Option<String>,
    /// Path to SQLite database file holding the operator directory
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Delay before a dispatched mission is marked delivered; `None` disables the timer
    pub delivery_delay: Option<Duration>,
    /// Seed the dispatch board with the demo requests and medicine stock
    pub seed_demo: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("AEROMED_API_PSK")
            .ok()
            .filter(|psk| !psk.is_empty());

        let db_path = env::var("AEROMED_DB_PATH")
            .unwrap_or_else(|_| "./data/aeromed.sqlite".to_string())
            .into();

        let raw_addr =
            env::var("AEROMED_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5001".to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "AEROMED_BIND_ADDR",
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let log_level = env::var("AEROMED_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let delivery_secs = match env::var("AEROMED_DELIVERY_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::Invalid {
                    var: "AEROMED_DELIVERY_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            Err(_) => DEFAULT_DELIVERY_SECS,
        };
        let delivery_delay = (delivery_secs > 0).then(|| Duration::from_secs(delivery_secs));

        let seed_demo = match env::var("AEROMED_SEED_DEMO") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "AEROMED_SEED_DEMO",
                value: raw.clone(),
                reason: "expected true/false".to_string(),
            })?,
            Err(_) => true,
        };

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            delivery_delay,
            seed_demo,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
