//! Configuration for queryline
//!
//! Centralized configuration with sensible defaults.

use crate::error::{QueryError, Result};

/// Main configuration for a query connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// Server query port
    pub port: u16,

    /// Disable Nagle's algorithm (lower latency for short command lines)
    pub nodelay: bool,

    /// Connect timeout (milliseconds); 0 means the OS default
    pub connect_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 10011,
            nodelay: true,
            connect_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a `host:port` address string into a config
    pub fn from_addr(addr: &str) -> Result<Self> {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| QueryError::Config(format!("missing port in address: {addr}")))?;
        if host.is_empty() {
            return Err(QueryError::Config(format!("missing host in address: {addr}")));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| QueryError::Config(format!("invalid port in address: {addr}")))?;
        Ok(Self {
            host: host.to_string(),
            port,
            ..Self::default()
        })
    }

    /// The `host:port` form used for connecting
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server hostname or IP address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server query port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the connect timeout (in milliseconds); 0 uses the OS default
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
