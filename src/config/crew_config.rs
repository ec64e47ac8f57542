//! Crew Configuration - contract constants and server settings as
//! operator-tunable TOML values
//!
//! Every struct implements `Default` with values matching the contract
//! table this engine was built against, ensuring zero-change behavior when
//! no config file is present.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::report::{RollupOptions, TerrainCoefficients};

/// Root configuration for a crew deployment.
///
/// Load with `CrewConfig::load()` which searches:
/// 1. `$SEISREPORT_CONFIG` env var
/// 2. `./crew_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewConfig {
    /// Crew identification
    pub crew: CrewInfo,

    /// Rollup behavior (window lengths, scaling/rate methods)
    pub rollup: RollupOptions,

    /// Terrain correction coefficients from the contract
    pub terrain: TerrainCoefficients,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Record store configuration
    pub storage: StorageConfig,
}

/// Crew identification shown in report headers and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewInfo {
    pub name: String,
}

impl Default for CrewInfo {
    fn default() -> Self {
        Self {
            name: "unnamed-crew".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::from([0, 0, 0, 0]),
            port: 8090,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the sled record store.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/seisreport"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl CrewConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SEISREPORT_CONFIG` environment variable
    /// 2. `./crew_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SEISREPORT_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), crew = %config.crew.name, "Loaded crew config from SEISREPORT_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SEISREPORT_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SEISREPORT_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("crew_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(crew = %config.crew.name, "Loaded crew config from ./crew_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./crew_config.toml, using defaults");
                }
            }
        }

        info!("No crew_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(toml::from_str(&contents)?)
    }
}
