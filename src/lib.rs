//! ipconf — network introspection service.
//!
//! Accepts HTTP connections and reports connection/request metadata back to
//! the caller, either as a rendered page or as raw field values on
//! dedicated paths.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────┐
//!                   │                   IPCONF                      │
//!                   │                                               │
//!   Client Request  │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ────────────────┼─▶│   net   │──▶│  http   │──▶│  routing   │  │
//!                   │  │listener │   │ server  │   │   table    │  │
//!                   │  └─────────┘   └─────────┘   └─────┬──────┘  │
//!                   │                                     │         │
//!                   │                                     ▼         │
//!   Client Response │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ◀───────────────┼──│  gzip   │◀──│ render  │◀──│   facts    │  │
//!                   │  └─────────┘   └─────────┘   └────────────┘  │
//!                   │                                               │
//!                   │  ┌─────────────────────────────────────────┐ │
//!                   │  │          Cross-Cutting Concerns          │ │
//!                   │  │  ┌────────┐ ┌───────────┐ ┌───────────┐ │ │
//!                   │  │  │ config │ │ lifecycle │ │observa-   │ │ │
//!                   │  │  │        │ │ startup/  │ │bility     │ │ │
//!                   │  │  │        │ │ shutdown  │ │           │ │ │
//!                   │  │  └────────┘ └───────────┘ └───────────┘ │ │
//!                   │  └─────────────────────────────────────────┘ │
//!                   └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use http::build_router;
pub use lifecycle::RunState;
