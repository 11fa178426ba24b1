//! Server configuration, read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// HTTP server settings.
///
/// `HOST` (default 127.0.0.1), `PORT` (default 3000), and
/// `METRICS_ENABLED` ("1" enables `/metrics`). Unparseable values fall
/// back to the defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            metrics_enabled: false,
        }
    }
}

impl ServerConfig {
    /// Build the config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.port);
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .map(|value| value == "1")
            .unwrap_or(defaults.metrics_enabled);
        Self {
            host,
            port,
            metrics_enabled,
        }
    }

    /// The socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr().to_string(), "127.0.0.1:3000");
        assert!(!config.metrics_enabled);
    }
}
