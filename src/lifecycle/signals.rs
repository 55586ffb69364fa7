//! OS signal handling.
//!
//! # Responsibilities
//! - Watch for the interrupt signal (Ctrl+C / SIGINT)
//! - Translate it into a graceful-shutdown request with a bounded deadline
//!
//! # Design Decisions
//! - Uses tokio's signal handling (async-safe)
//! - Only the interrupt signal is handled; nothing else

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::lifecycle::shutdown::RunState;

/// Spawn the task that waits for an interrupt and triggers shutdown.
pub fn spawn_interrupt_watcher(run: RunState, deadline: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(
                    deadline_secs = deadline.as_secs(),
                    "interrupt received, shutting down"
                );
                run.shutdown(deadline);
            }
            Err(e) => {
                error!(error = %e, "failed to install interrupt handler");
            }
        }
    })
}
