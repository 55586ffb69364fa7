//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → load TLS material → bind all sockets
//!     → spawn one serving task per listener → wait for completion
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop accepting → drain in-flight (bounded)
//!     → force-close stragglers → task count reaches zero → exit
//!
//! Signals (signals.rs):
//!     SIGINT → graceful shutdown with the configured deadline
//! ```
//!
//! # Design Decisions
//! - Ordered startup: TLS material, then sockets, then serving tasks
//! - Shutdown has a deadline: connections still running after it are
//!   force-closed, never silently left open

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{RunState, TaskGuard};
pub use signals::spawn_interrupt_watcher;
pub use startup::{bind, BoundServer, StartupError};
