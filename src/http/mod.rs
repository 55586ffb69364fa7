//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (axum router, middleware, dispatch)
//!     → facts.rs (extract request metadata)
//!     → [routing table decides action]
//!     → render.rs (template render, gzip negotiation)
//!     → Send to client
//! ```

pub mod facts;
pub mod render;
pub mod server;

pub use facts::RequestFacts;
pub use render::{PageData, Renderer};
pub use server::{build_router, AppState};
