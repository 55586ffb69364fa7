//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Branch the binary was built from, injected at build time via
/// `IPCONF_BRANCH`.
pub const BUILD_BRANCH: &str = match option_env!("IPCONF_BRANCH") {
    Some(b) => b,
    None => "unknown",
};

/// Build date, injected at build time via `IPCONF_BUILD_DATE`.
pub const BUILD_DATE: &str = match option_env!("IPCONF_BUILD_DATE") {
    Some(d) => d,
    None => "unknown",
};

/// Root configuration for the introspection service.
///
/// Immutable once the server starts; shared by reference (`Arc`) across all
/// serving tasks.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind addresses, TLS).
    pub listener: ListenerConfig,

    /// Template and static asset settings.
    pub templates: TemplateConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Server metadata rendered on the index page and version banner.
    pub meta: MetaConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Plain HTTP bind addresses (e.g., "127.0.0.1:3000").
    pub endpoint: Vec<String>,

    /// TLS bind addresses. Requires `tls_cert` and `tls_key`.
    pub tls_endpoint: Vec<String>,

    /// Path to the TLS certificate file (PEM).
    pub tls_cert: Option<String>,

    /// Path to the TLS private key file (PEM).
    pub tls_key: Option<String>,

    /// Honor `X-Forwarded-For` when resolving the client IP.
    ///
    /// Only enable behind a trusted proxy: the header is client-controlled
    /// and overrides the transport peer address on `/ip` and the index page.
    pub trust_forwarded_for: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            endpoint: vec!["127.0.0.1:3000".to_string()],
            tls_endpoint: Vec::new(),
            tls_cert: None,
            tls_key: None,
            trust_forwarded_for: false,
        }
    }
}

/// A single resolved listener: one bind address, optionally with TLS material.
///
/// Invariant (enforced by validation before any socket is bound): a TLS
/// listener carries both a certificate and a key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSpec {
    /// Address to bind (host:port).
    pub address: String,

    /// TLS material, `None` for plain listeners.
    pub tls: Option<TlsPaths>,
}

/// Certificate and key paths for a TLS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Template and static asset settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding `index.html`, `error.html` and static assets.
    pub dir: String,

    /// Compress rendered pages when the client accepts gzip.
    pub enable_gzip: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: "html".to_string(),
            enable_gzip: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Graceful shutdown deadline in seconds. Connections still running
    /// after the deadline are force-closed.
    pub shutdown_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Server metadata rendered into the index page footer and `--version`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetaConfig {
    pub version: String,
    pub branch: String,
    pub build_date: String,
    pub author: String,
    pub email: String,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            branch: BUILD_BRANCH.to_string(),
            build_date: BUILD_DATE.to_string(),
            author: String::new(),
            email: String::new(),
        }
    }
}

impl ServerConfig {
    /// Expand the listener section into one [`ListenerSpec`] per address.
    ///
    /// Plain listeners come first, TLS listeners after, matching the order
    /// they are reported at startup.
    pub fn listener_specs(&self) -> Vec<ListenerSpec> {
        let tls = match (&self.listener.tls_cert, &self.listener.tls_key) {
            (Some(cert), Some(key)) if !cert.is_empty() && !key.is_empty() => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            _ => None,
        };

        let mut specs: Vec<ListenerSpec> = self
            .listener
            .endpoint
            .iter()
            .map(|address| ListenerSpec {
                address: address.clone(),
                tls: None,
            })
            .collect();

        specs.extend(self.listener.tls_endpoint.iter().map(|address| ListenerSpec {
            address: address.clone(),
            tls: tls.clone(),
        }));

        specs
    }
}
