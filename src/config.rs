//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold (always > 0)
    pub capacity: usize,
    /// TCP port of the text protocol
    pub server_port: u16,
    /// HTTP port of the admin surface, 0 = disabled
    pub admin_port: u16,
    /// Pause between expiry reaper sweeps
    pub reaper_interval: Duration,
    /// Maximum simultaneously connected clients
    pub max_connections: usize,
    /// Longest accepted command line in bytes
    pub max_line_length: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CAPACITY` - Maximum cache entries (default: 10)
    /// - `SERVER_PORT` - Text protocol port (default: 6379)
    /// - `ADMIN_PORT` - Admin HTTP port, 0 disables it (default: 8080)
    /// - `REAPER_INTERVAL_MS` - Expiry sweep period in milliseconds (default: 1000)
    /// - `MAX_CONNECTIONS` - Concurrent client limit (default: 1024)
    /// - `MAX_LINE_LENGTH` - Command line limit in bytes (default: 65536)
    ///
    /// Unparseable or zero values fall back to the default, except for
    /// `ADMIN_PORT` where 0 is meaningful.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: positive_var("CAPACITY").unwrap_or(defaults.capacity),
            server_port: positive_var("SERVER_PORT").unwrap_or(defaults.server_port),
            admin_port: var("ADMIN_PORT").unwrap_or(defaults.admin_port),
            reaper_interval: positive_var("REAPER_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.reaper_interval),
            max_connections: positive_var("MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
            max_line_length: positive_var("MAX_LINE_LENGTH").unwrap_or(defaults.max_line_length),
        }
    }

    pub fn admin_enabled(&self) -> bool {
        self.admin_port != 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 10,
            server_port: 6379,
            admin_port: 8080,
            reaper_interval: Duration::from_secs(1),
            max_connections: 1024,
            max_line_length: 64 * 1024,
        }
    }
}

fn var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn positive_var<T: FromStr + Default + PartialEq>(name: &str) -> Option<T> {
    var(name).filter(|v: &T| *v != T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.server_port, 6379);
        assert_eq!(config.admin_port, 8080);
        assert_eq!(config.reaper_interval, Duration::from_secs(1));
        assert_eq!(config.max_connections, 1024);
        assert!(config.admin_enabled());
    }

    // One test touches the environment so parallel tests never race on it
    #[test]
    fn test_config_from_env() {
        env::remove_var("SERVER_PORT");
        env::remove_var("MAX_CONNECTIONS");
        env::remove_var("MAX_LINE_LENGTH");
        env::set_var("CAPACITY", "0");
        env::set_var("ADMIN_PORT", "0");
        env::set_var("REAPER_INTERVAL_MS", "250");

        let config = Config::from_env();
        assert_eq!(config.capacity, 10, "zero capacity falls back to default");
        assert_eq!(config.server_port, 6379);
        assert!(!config.admin_enabled());
        assert_eq!(config.reaper_interval, Duration::from_millis(250));

        env::set_var("CAPACITY", "not-a-number");
        assert_eq!(Config::from_env().capacity, 10);

        env::set_var("CAPACITY", " 500 ");
        assert_eq!(Config::from_env().capacity, 500);

        env::remove_var("CAPACITY");
        env::remove_var("ADMIN_PORT");
        env::remove_var("REAPER_INTERVAL_MS");
        assert_eq!(Config::from_env(), Config::default());
    }
}
