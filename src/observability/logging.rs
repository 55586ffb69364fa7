//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Provide the structured access-log event
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - Access events carry a dedicated `access` target so sinks can split
//!   them from diagnostic output

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise the configured level. Safe to call
/// once per process; later calls are ignored.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}

/// Structured access event for one completed dispatch.
pub fn access(remote: SocketAddr, path: &str, status: u16) {
    tracing::info!(target: "access", remote = %remote, path, status, "request");
}
