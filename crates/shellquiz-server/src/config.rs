//! Server configuration.

use std::{path::PathBuf, time::Duration};

use shellquiz_app::QuizConfig;

/// Default listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 23234;

/// How long sessions get to wind down after a stop is requested.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// How long a connection may stay silent before its `Hello`.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default host private key location (PEM).
pub const DEFAULT_HOST_KEY_PATH: &str = ".ssh/shellquiz_host_key.pem";

/// Default host certificate location (PEM).
pub const DEFAULT_HOST_CERT_PATH: &str = ".ssh/shellquiz_host_cert.pem";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host or IP address to listen on.
    pub host: String,
    /// TCP port to listen on. `0` picks an ephemeral port.
    pub port: u16,
    /// Host private key (PEM).
    pub host_key_path: PathBuf,
    /// Host certificate (PEM).
    pub host_cert_path: PathBuf,
    /// Shutdown grace period.
    pub grace_period: Duration,
    /// Limit on TLS handshake plus `Hello`.
    pub handshake_timeout: Duration,
    /// Per-session quiz tunables.
    pub quiz: QuizConfig,
}

impl ServerConfig {
    /// `host:port`, bracketing IPv6 literals.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            host_key_path: PathBuf::from(DEFAULT_HOST_KEY_PATH),
            host_cert_path: PathBuf::from(DEFAULT_HOST_CERT_PATH),
            grace_period: DEFAULT_GRACE_PERIOD,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            quiz: QuizConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_address() {
        assert_eq!(ServerConfig::default().bind_address(), "0.0.0.0:23234");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let config = ServerConfig { host: "::1".into(), port: 2222, ..ServerConfig::default() };
        assert_eq!(config.bind_address(), "[::1]:2222");

        let config = ServerConfig { host: "[::1]".into(), port: 2222, ..ServerConfig::default() };
        assert_eq!(config.bind_address(), "[::1]:2222");
    }
}
