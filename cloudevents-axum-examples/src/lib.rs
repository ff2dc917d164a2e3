//! Shared setup for the example receivers: configuration and logging.

use std::net::SocketAddr;

use cloudevents_axum::BodyLimits;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Receiver configuration, read from `CE_RECEIVER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiverConfig {
    /// Listen address (`CE_RECEIVER_ADDR`)
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,

    /// Log level used when `RUST_LOG` is unset (`CE_RECEIVER_LOG_LEVEL`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum request body size in bytes (`CE_RECEIVER_MAX_BODY_BYTES`)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    cloudevents_axum::limits::DEFAULT_MAX_BODY_SIZE
}

impl ReceiverConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix("CE_RECEIVER"))
    }

    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn body_limits(&self) -> BodyLimits {
        BodyLimits::new(self.max_body_bytes)
    }
}

/// Install the fmt subscriber, honoring `RUST_LOG` first.
pub fn init_tracing(config: &ReceiverConfig) {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();
}
