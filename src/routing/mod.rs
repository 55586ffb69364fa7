//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → normalize (lowercase)
//!     → table.rs (fixed (path, action) table)
//!     → Action::Field | Action::Index, or no match → 404
//! ```
//!
//! # Design Decisions
//! - The table is static data, immutable at runtime
//! - Deterministic: same path always dispatches the same way
//! - Echo and static-file endpoints are registered directly on the axum
//!   router; only the introspection paths live in this table

pub mod table;

pub use table::{lookup, Action, Route, TABLE};
