//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Megano JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "megano-json", about = "Megano storefront JSON API", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Trace export and request diagnostics settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Storefront database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // A missing .env file is fine
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::config::observability::LogFormat;

    use super::*;

    #[test]
    fn defaults_apply_when_only_database_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "megano-json",
            "--database-url",
            "postgresql://localhost/megano",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8000");
        assert_eq!(
            config.server.shutdown_grace(),
            Some(std::time::Duration::from_secs(30))
        );
        assert!(matches!(config.logging.log_format, LogFormat::Compact));
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);

        Ok(())
    }

    #[test]
    fn zero_grace_stops_immediately() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "megano-json",
            "--database-url",
            "postgresql://localhost/megano",
            "--shutdown-grace-seconds",
            "0",
        ])?;

        assert_eq!(config.server.shutdown_grace(), None);

        Ok(())
    }
}
