use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::api::PRIVATBANK_URL;
use crate::error::ConfigError;

/// What an `exchange` command does when a lookup fails below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FaultPolicy {
    /// Replace the failed day with an `{"error": ...}` slot and answer anyway.
    #[default]
    Placeholder,
    /// Drop the whole command: no response, no audit entry.
    Abort,
}

/// WebSocket server answering `exchange [days]` with PrivatBank archive rates.
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct Config {
    #[arg(long, env = "EXCHANGE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long, env = "EXCHANGE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Append-only audit log of every processed command.
    #[arg(long, env = "EXCHANGE_LOG_FILE", default_value = "chat_log.txt")]
    pub log_file: String,

    #[arg(long, env = "EXCHANGE_UPSTREAM_URL", default_value = PRIVATBANK_URL)]
    pub upstream_url: String,

    /// Per-request timeout; unset keeps the HTTP client's defaults.
    #[arg(long, env = "EXCHANGE_UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    #[arg(long, env = "EXCHANGE_ON_TRANSPORT_FAULT", value_enum, default_value_t = FaultPolicy::Placeholder)]
    pub on_transport_fault: FaultPolicy,
}

impl Config {
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.upstream_url.is_empty() {
            return Err(ConfigError::EmptyUpstreamUrl);
        }
        if self.upstream_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["privat-exchange"]).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_file, "chat_log.txt");
        assert_eq!(config.upstream_url, PRIVATBANK_URL);
        assert_eq!(config.upstream_timeout(), None);
        assert_eq!(config.on_transport_fault, FaultPolicy::Placeholder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "privat-exchange",
            "--port",
            "9001",
            "--upstream-timeout-secs",
            "5",
            "--on-transport-fault",
            "abort",
        ])
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.upstream_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.on_transport_fault, FaultPolicy::Abort);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = Config::try_parse_from(["privat-exchange"]).unwrap();
        config.upstream_timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));

        config.upstream_timeout_secs = None;
        config.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPort)));
    }
}
