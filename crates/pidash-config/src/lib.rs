//! Configuration for the pidash dashboard.
//!
//! Built-in defaults, then an optional TOML file, then `PIDASH_*`
//! environment variables, translated into `pidash_core::DashboardConfig`.
//! The binary applies its CLI flags on top before translating.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use pidash_core::{DashboardConfig, EndpointPolicy, FallbackPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Host running the Netdata agent.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_netdata_port")]
    pub netdata_port: u16,

    /// Origin serving `/netdata` and `/api`. Defaults to `http://<host>`.
    #[serde(default)]
    pub origin: Option<String>,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub endpoint_policy: EndpointPolicy,

    #[serde(default)]
    pub fallback_policy: FallbackPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            netdata_port: default_netdata_port(),
            origin: None,
            refresh_interval_secs: default_refresh_interval(),
            timeout_secs: default_timeout(),
            endpoint_policy: EndpointPolicy::default(),
            fallback_policy: FallbackPolicy::default(),
        }
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_netdata_port() -> u16 {
    pidash_core::DEFAULT_NETDATA_PORT
}
fn default_refresh_interval() -> u64 {
    5
}
fn default_timeout() -> u64 {
    10
}

impl Config {
    /// Validate and build the runtime configuration.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(invalid("host", "must not be empty"));
        }
        if self.refresh_interval_secs == 0 {
            return Err(invalid("refresh_interval_secs", "must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be at least 1"));
        }

        let mut config = DashboardConfig::for_host(host)
            .map_err(|e| invalid("host", &format!("{host}: {e}")))?;
        if let Some(origin) = &self.origin {
            config.origin = origin
                .parse::<Url>()
                .map_err(|e| invalid("origin", &format!("{origin}: {e}")))?;
        }
        config.netdata_port = self.netdata_port;
        config.refresh_interval = Duration::from_secs(self.refresh_interval_secs);
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.endpoint_policy = self.endpoint_policy;
        config.fallback_policy = self.fallback_policy;
        Ok(config)
    }

    /// Render as TOML, e.g. for `--print-config`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "pidash", "pidash").map_or_else(
        || PathBuf::from(".pidash.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the default path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (skipped when missing) and the environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PIDASH_"));

    Ok(figment.extract()?)
}
