//! Shutdown coordination.
//!
//! # Responsibilities
//! - Track the set of active serving tasks (counted completion)
//! - Fan the graceful-shutdown request out to every listener
//!
//! # Design Decisions
//! - Registration/deregistration is the only shared mutable state; it rides
//!   on a watch channel over a task count, no locks
//! - Deregistration is RAII: dropping the guard decrements, even if the
//!   serving task unwinds
//! - The axum-server `Handle` carries the actual stop-accepting/drain
//!   semantics; `RunState` only adds the completion counter on top

use axum_server::Handle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::trace;

/// The set of currently active listener tasks plus the shared shutdown
/// handle.
///
/// Created at startup, torn down when the task count reaches zero after
/// shutdown is signaled.
#[derive(Clone)]
pub struct RunState {
    tasks: Arc<watch::Sender<usize>>,
    handle: Handle,
}

impl RunState {
    pub fn new() -> Self {
        let (tasks, _) = watch::channel(0);
        Self {
            tasks: Arc::new(tasks),
            handle: Handle::new(),
        }
    }

    /// The shutdown handle shared by every listener.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Register one serving task. The returned guard deregisters on drop.
    pub fn register(&self, address: SocketAddr) -> TaskGuard {
        self.tasks.send_modify(|n| *n += 1);
        trace!(address = %address, active = self.active(), "serving task registered");
        TaskGuard {
            tasks: self.tasks.clone(),
            address,
        }
    }

    /// Number of currently registered serving tasks.
    pub fn active(&self) -> usize {
        *self.tasks.borrow()
    }

    /// Request graceful shutdown: stop accepting immediately, let in-flight
    /// requests finish within the deadline, then force-close the rest.
    pub fn shutdown(&self, deadline: Duration) {
        self.handle.graceful_shutdown(Some(deadline));
    }

    /// Block until every serving task has deregistered.
    pub async fn wait(&self) {
        let mut rx = self.tasks.subscribe();
        // Cannot fail: self keeps the sender alive.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII registration of one serving task.
#[derive(Debug)]
pub struct TaskGuard {
    tasks: Arc<watch::Sender<usize>>,
    address: SocketAddr,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tasks.send_modify(|n| *n -= 1);
        trace!(address = %self.address, "serving task deregistered");
    }
}
