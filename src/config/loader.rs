//! Configuration loading from disk and the command line.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("parse error in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line overrides applied on top of the file configuration.
///
/// Mirrors the flag set of the binary; empty vectors and `None` mean "not
/// given on the command line".
#[derive(Debug, Default)]
pub struct Overrides {
    pub endpoint: Vec<String>,
    pub tls_endpoint: Vec<String>,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: ServerConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the effective configuration: file (if any), then flag overrides,
/// then validation.
///
/// A missing file at the default location is not an error; an explicitly
/// given `--config` path must exist.
pub fn resolve(
    path: Option<&Path>,
    explicit: bool,
    overrides: Overrides,
) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(p) if p.exists() || explicit => {
            let content = fs::read_to_string(p).map_err(|source| ConfigError::Io {
                path: p.display().to_string(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: p.display().to_string(),
                source,
            })?
        }
        _ => ServerConfig::default(),
    };

    if !overrides.endpoint.is_empty() {
        config.listener.endpoint = overrides.endpoint;
    }
    if !overrides.tls_endpoint.is_empty() {
        config.listener.tls_endpoint = overrides.tls_endpoint;
    }
    if let Some(cert) = overrides.tls_cert {
        config.listener.tls_cert = Some(cert);
    }
    if let Some(key) = overrides.tls_key {
        config.listener.tls_key = Some(key);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
