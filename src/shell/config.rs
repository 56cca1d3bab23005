// Runtime configuration, read from the environment (a `.env` file is loaded first by main).

use crate::modules::cards::adapters::outbound::persistence_queue::RetryPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const BIND_ADDR: &str = "KANBAN_BIND_ADDR";
pub const DATA_FILE: &str = "KANBAN_DATA_FILE";
pub const PERSIST_MAX_ATTEMPTS: &str = "KANBAN_PERSIST_MAX_ATTEMPTS";
pub const PERSIST_BACKOFF_MS: &str = "KANBAN_PERSIST_BACKOFF_MS";

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Unset keeps cards in memory only.
    pub data_file: Option<PathBuf>,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse::<SocketAddr>(&lookup, BIND_ADDR)?
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR));
        let data_file = lookup(DATA_FILE)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let defaults = RetryPolicy::default();
        let max_attempts = parse::<u32>(&lookup, PERSIST_MAX_ATTEMPTS)?
            .unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: PERSIST_MAX_ATTEMPTS,
                value: max_attempts.to_string(),
            });
        }
        let backoff = parse::<u64>(&lookup, PERSIST_BACKOFF_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.backoff);

        Ok(Self {
            bind_addr,
            data_file,
            retry: RetryPolicy {
                max_attempts,
                backoff,
            },
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
