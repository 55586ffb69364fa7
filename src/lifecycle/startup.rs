//! Startup orchestration.
//!
//! # Responsibilities
//! - Load TLS material, then bind every listener, in that order
//! - Start one serving task per listener against the shared router
//! - Block until every serving task has deregistered
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no partial availability
//! - Serving starts only after every socket is bound
//! - A serving task failing for any reason other than shutdown takes the
//!   whole process down, like a failed bind would

use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{validate_config, ServerConfig};
use crate::http::build_router;
use crate::lifecycle::shutdown::RunState;
use crate::lifecycle::signals::spawn_interrupt_watcher;
use crate::net::listener::{bind_all, BoundListener, ListenerError};
use crate::net::tls::{load_tls_config, TlsError};

/// Error type for server startup and serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("serving failed: {0}")]
    Serve(String),
}

/// A fully bound server, not yet accepting connections.
///
/// Splitting bind from serve keeps the all-or-nothing startup contract
/// observable: every socket exists (or startup has failed) before the first
/// connection is accepted.
pub struct BoundServer {
    config: Arc<ServerConfig>,
    listeners: Vec<BoundListener>,
    tls: Option<RustlsConfig>,
    run_state: RunState,
}

/// Load TLS material (if configured) and bind every listener.
///
/// The configuration is re-validated here so a caller bypassing the loader
/// still cannot reach a socket with, say, a TLS endpoint missing its key.
pub async fn bind(config: ServerConfig) -> Result<BoundServer, StartupError> {
    if let Err(errors) = validate_config(&config) {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(StartupError::Invalid(joined));
    }

    let specs = config.listener_specs();

    // TLS material loads first so bad files abort before any socket opens.
    let tls = match specs.iter().find_map(|spec| spec.tls.clone()) {
        Some(paths) => Some(load_tls_config(&paths).await?),
        None => None,
    };

    let listeners = bind_all(&specs)?;

    Ok(BoundServer {
        config: Arc::new(config),
        listeners,
        tls,
        run_state: RunState::new(),
    })
}

impl BoundServer {
    /// Addresses actually bound, in listener order. Useful when binding
    /// port 0.
    pub fn local_addrs(&self) -> Vec<SocketAddr> {
        self.listeners.iter().map(|l| l.local_addr).collect()
    }

    /// Handle on the shared run state, e.g. to trigger shutdown externally.
    pub fn run_state(&self) -> RunState {
        self.run_state.clone()
    }

    /// Serve every bound listener until graceful shutdown completes.
    ///
    /// Installs the interrupt watcher, spawns one serving task per
    /// listener, and returns once every task has deregistered.
    pub async fn serve(self) -> Result<(), StartupError> {
        let Self {
            config,
            listeners,
            tls,
            run_state,
        } = self;

        let router = build_router(config.clone());
        let deadline = Duration::from_secs(config.timeouts.shutdown_secs);
        let failure: Arc<OnceLock<String>> = Arc::new(OnceLock::new());

        spawn_interrupt_watcher(run_state.clone(), deadline);

        for bound in listeners {
            let guard = run_state.register(bound.local_addr);
            let handle = run_state.handle();
            let app = router
                .clone()
                .into_make_service_with_connect_info::<SocketAddr>();
            let tls = bound.spec.tls.as_ref().and_then(|_| tls.clone());
            let failure = failure.clone();
            let run_state = run_state.clone();

            tokio::spawn(async move {
                let _guard = guard;
                let address = bound.local_addr;
                let result = match tls {
                    Some(tls_config) => {
                        info!(address = %address, "starting HTTPS listener");
                        axum_server::from_tcp_rustls(bound.socket, tls_config)
                            .handle(handle)
                            .serve(app)
                            .await
                    }
                    None => {
                        info!(address = %address, "starting HTTP listener");
                        axum_server::from_tcp(bound.socket)
                            .handle(handle)
                            .serve(app)
                            .await
                    }
                };
                match result {
                    // Normal termination: the serve loop returned because
                    // shutdown was requested.
                    Ok(()) => info!(address = %address, "listener stopped"),
                    Err(e) => {
                        error!(address = %address, error = %e, "listener failed");
                        let _ = failure.set(format!("{address}: {e}"));
                        // One dead listener means no partial availability.
                        run_state.shutdown(Duration::ZERO);
                    }
                }
            });
        }

        info!(listeners = run_state.active(), "serving");
        run_state.wait().await;
        info!("all listeners stopped");

        match failure.get() {
            Some(message) => Err(StartupError::Serve(message.clone())),
            None => Ok(()),
        }
    }
}
