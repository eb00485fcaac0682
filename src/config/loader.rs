//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the upstream origin URL.
pub const ENV_ORIGIN: &str = "ORIGIN_URL";

/// Environment variable naming the mount path prefix.
pub const ENV_MOUNT_PATH: &str = "MOUNT_PATH";

/// Environment variable enabling root proxying (preview mode).
pub const ENV_PROXY_TARGET_ROOT: &str = "PROXY_TARGET_ROOT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// Reads the TOML file when a path is given, starts from defaults
/// otherwise, then applies environment overrides and validates.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides on top of the file configuration.
fn apply_env_overrides(config: &mut ProxyConfig) {
    if let Ok(origin) = std::env::var(ENV_ORIGIN) {
        if !origin.is_empty() {
            config.upstream.origin = origin;
        }
    }
    if let Ok(mount_path) = std::env::var(ENV_MOUNT_PATH) {
        config.upstream.mount_path = mount_path;
    }
    if let Ok(value) = std::env::var(ENV_PROXY_TARGET_ROOT) {
        config.upstream.proxy_target_root = value == "true";
    }
}
