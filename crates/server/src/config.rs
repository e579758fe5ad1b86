use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Variables are read as `DATACAT_ADDR`, `DATACAT_TIMEOUT_SECS` and `DATACAT_OUTPUT_DIR`.
pub const ENV_PREFIX: &str = "DATACAT";

const DEFAULT_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Extra time a request may take beyond the page fetch itself.
const REQUEST_SLACK_SECS: u64 = 15;

/// Server settings read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Listen address.
    pub addr: SocketAddr,
    /// Page fetch timeout in seconds.
    #[serde(rename = "timeout_secs")]
    pub fetch_timeout: u64,
    /// Where raw scrapes are written, if anywhere.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            fetch_timeout: DEFAULT_TIMEOUT_SECS,
            output_dir: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Layer `environment` over the defaults; empty values count as unset.
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("addr", DEFAULT_ADDR)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .add_source(environment.ignore_empty(true))
            .build()?
            .try_deserialize()
    }

    /// Upper bound for a whole request, fetch included.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout + REQUEST_SLACK_SECS)
    }
}
