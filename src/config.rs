//! Configuration for the bridge client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{LightifyError, Result};

/// Default TCP port the bridge listens on
pub const DEFAULT_BRIDGE_PORT: u16 = 4000;

/// Main configuration for a bridge connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Bridge address (host:port)
    pub bridge_addr: String,

    /// Connect timeout (milliseconds), 0 = OS default
    pub connect_timeout_ms: u64,

    /// Socket write timeout (milliseconds), 0 = none
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Request Configuration
    // -------------------------------------------------------------------------
    /// How long `send` waits for its reply (milliseconds), 0 = forever
    pub response_timeout_ms: u64,

    /// Max in-flight requests per connection
    pub max_pending: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bridge_addr: format!("127.0.0.1:{}", DEFAULT_BRIDGE_PORT),
            connect_timeout_ms: 5000,
            write_timeout_ms: 5000,
            nodelay: true,
            response_timeout_ms: 5000,
            max_pending: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config can be used to open a connection
    pub fn validate(&self) -> Result<()> {
        if self.bridge_addr.trim().is_empty() {
            return Err(LightifyError::Config("bridge address is empty".to_string()));
        }
        if self.max_pending == 0 {
            return Err(LightifyError::Config(
                "max_pending must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn connect_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.connect_timeout_ms)
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.write_timeout_ms)
    }

    pub(crate) fn response_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.response_timeout_ms)
    }
}

fn non_zero_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the bridge address (host:port)
    pub fn bridge_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.bridge_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the reply deadline for `send` (in milliseconds, 0 = wait forever)
    pub fn response_timeout_ms(mut self, ms: u64) -> Self {
        self.config.response_timeout_ms = ms;
        self
    }

    /// Set the maximum number of in-flight requests
    pub fn max_pending(mut self, count: usize) -> Self {
        self.config.max_pending = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
