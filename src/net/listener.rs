//! Listener binding.
//!
//! # Responsibilities
//! - Bind every configured address before any connection is accepted
//! - Fail fast: one bad bind aborts startup, no partial availability
//!
//! # Design Decisions
//! - Binding is synchronous (`std::net::TcpListener`); sockets are handed
//!   to the async server afterwards
//! - Sockets are switched to non-blocking mode at bind time, ready for the
//!   tokio reactor

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::ListenerSpec;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("invalid listen address '{address}': {source}")]
    Addr {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

/// A successfully bound listener, not yet serving.
#[derive(Debug)]
pub struct BoundListener {
    pub spec: ListenerSpec,
    pub socket: std::net::TcpListener,
    pub local_addr: SocketAddr,
}

/// Bind one listener.
pub fn bind(spec: &ListenerSpec) -> Result<BoundListener, ListenerError> {
    let addr: SocketAddr = spec.address.parse().map_err(|source| ListenerError::Addr {
        address: spec.address.clone(),
        source,
    })?;

    let socket = std::net::TcpListener::bind(addr).map_err(|source| ListenerError::Bind {
        address: spec.address.clone(),
        source,
    })?;
    socket
        .set_nonblocking(true)
        .map_err(|source| ListenerError::Bind {
            address: spec.address.clone(),
            source,
        })?;

    let local_addr = socket.local_addr().map_err(|source| ListenerError::Bind {
        address: spec.address.clone(),
        source,
    })?;

    tracing::info!(
        address = %local_addr,
        tls = spec.tls.is_some(),
        "listener bound"
    );

    Ok(BoundListener {
        spec: spec.clone(),
        socket,
        local_addr,
    })
}

/// Bind every listener, stopping at the first failure.
pub fn bind_all(specs: &[ListenerSpec]) -> Result<Vec<BoundListener>, ListenerError> {
    specs.iter().map(bind).collect()
}
