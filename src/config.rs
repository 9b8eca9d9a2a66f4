/*============================================================
  Bundlescope
  Module: bundlescope::config
  ------------------------------------------------------------
  Purpose:
    Load operator configuration from TOML, fill defaults for
    anything omitted, and expose derived paths and addresses.

  Security / Safety Notes:
    Reads a single operator-owned file; no secrets are stored.

  Dependencies:
    serde + toml for parsing, dirs for platform directories.

  Revision History:
    2026-10-16  Authored configuration layer.
============================================================*/

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BundlescopeError, Result};

const APP_DIR: &str = "bundlescope";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BundlescopeConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub links: LinksConfig,
    pub logging: LoggingConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Settings for the bundle-size service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout in seconds; `None` keeps the transport default.
    pub timeout: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://bundlephobia.com".to_string(),
            user_agent: concat!("bundlescope/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

/// Outbound link targets shown on the results card.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub registry_base: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            registry_base: "https://npmjs.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub verbose: bool,
}

impl BundlescopeConfig {
    /// Load from an explicit path, or from the default location when none
    /// is given. A missing default file yields defaults; a missing explicit
    /// file is an error.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(explicit) => Self::load_file(explicit)?,
            None => match default_config_path() {
                Some(default) if default.is_file() => Self::load_file(&default)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            BundlescopeError::Config(format!(
                "Failed to read config {}: {err}",
                path.display()
            ))
        })?;
        Self::from_toml(&raw).map_err(|err| match err {
            BundlescopeError::Config(msg) => {
                BundlescopeError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a configuration document from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| BundlescopeError::Config(err.to_string()))
    }

    fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if self.upstream.base_url.trim().is_empty() {
            return Err(BundlescopeError::Config(
                "upstream.base_url must not be empty".into(),
            ));
        }
        if self.links.registry_base.trim().is_empty() {
            return Err(BundlescopeError::Config(
                "links.registry_base must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|err| {
            BundlescopeError::Config(format!(
                "Invalid server.bind `{}`: {err}",
                self.server.bind
            ))
        })
    }

    /// Directory session logs are written to.
    pub fn log_dir(&self) -> PathBuf {
        self.logging.dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("logs")
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
