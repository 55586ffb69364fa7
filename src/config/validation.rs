//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce the TLS pairing invariant (cert and key together or not at all)
//! - Validate bind address syntax before any socket is touched
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no listen addresses configured")]
    NoListeners,

    #[error("invalid listen address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("TLS endpoints configured but {missing} is not set")]
    MissingTlsMaterial { missing: &'static str },

    #[error("{set} is set but {missing} is not; both are required")]
    UnpairedTlsMaterial {
        set: &'static str,
        missing: &'static str,
    },
}

/// Validate the configuration, collecting every error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = &config.listener;

    if listener.endpoint.is_empty() && listener.tls_endpoint.is_empty() {
        errors.push(ValidationError::NoListeners);
    }

    for address in listener.endpoint.iter().chain(&listener.tls_endpoint) {
        if let Err(e) = address.parse::<SocketAddr>() {
            errors.push(ValidationError::InvalidAddress {
                address: address.clone(),
                reason: e.to_string(),
            });
        }
    }

    let cert_set = listener
        .tls_cert
        .as_deref()
        .is_some_and(|c| !c.is_empty());
    let key_set = listener.tls_key.as_deref().is_some_and(|k| !k.is_empty());

    // Cert and key must always come as a pair, even without TLS endpoints.
    match (cert_set, key_set) {
        (true, false) => errors.push(ValidationError::UnpairedTlsMaterial {
            set: "tls_cert",
            missing: "tls_key",
        }),
        (false, true) => errors.push(ValidationError::UnpairedTlsMaterial {
            set: "tls_key",
            missing: "tls_cert",
        }),
        _ => {}
    }

    if !listener.tls_endpoint.is_empty() {
        if !cert_set {
            errors.push(ValidationError::MissingTlsMaterial { missing: "tls_cert" });
        }
        if !key_set {
            errors.push(ValidationError::MissingTlsMaterial { missing: "tls_key" });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
