//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → tls.rs (load and preflight TLS material, fatal on bad files)
//!     → listener.rs (bind every address, fatal on first failure)
//!     → Hand sockets to the lifecycle manager for serving
//! ```
//!
//! # Design Decisions
//! - All sockets bind before any serving task starts
//! - TLS material loads before binding, so no socket is held on a doomed
//!   startup

pub mod listener;
pub mod tls;

pub use listener::{bind_all, BoundListener, ListenerError};
pub use tls::{load_tls_config, TlsError};
