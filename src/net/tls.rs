//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use crate::config::TlsPaths;

/// Error type for TLS material loading.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("no certificates found in {path}")]
    EmptyCertChain { path: String },

    #[error("no private key found in {path}")]
    MissingKey { path: String },

    #[error("failed to build TLS config: {0}")]
    Build(std::io::Error),
}

/// Load TLS configuration from certificate and key files.
///
/// The PEM files are parsed up front so bad material is a startup error,
/// reported before any socket is bound.
pub async fn load_tls_config(paths: &TlsPaths) -> Result<RustlsConfig, TlsError> {
    preflight(paths)?;

    RustlsConfig::from_pem_file(&paths.cert_path, &paths.key_path)
        .await
        .map_err(TlsError::Build)
}

/// Parse the PEM files without installing them, failing on empty or
/// unreadable material.
fn preflight(paths: &TlsPaths) -> Result<(), TlsError> {
    let certs = read_pem(&paths.cert_path, |reader| {
        rustls_pemfile::certs(reader).collect::<Result<Vec<_>, _>>()
    })?;
    if certs.is_empty() {
        return Err(TlsError::EmptyCertChain {
            path: paths.cert_path.display().to_string(),
        });
    }

    let key = read_pem(&paths.key_path, |reader| rustls_pemfile::private_key(reader))?;
    if key.is_none() {
        return Err(TlsError::MissingKey {
            path: paths.key_path.display().to_string(),
        });
    }

    Ok(())
}

fn read_pem<T>(
    path: &Path,
    parse: impl FnOnce(&mut BufReader<File>) -> Result<T, std::io::Error>,
) -> Result<T, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    parse(&mut reader).map_err(|source| TlsError::Io {
        path: path.display().to_string(),
        source,
    })
}
