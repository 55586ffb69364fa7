//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, CLI-flag overrides)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to all serving tasks
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts; no hot reload
//! - All fields have defaults to allow running with no config file at all
//! - Validation separates syntactic (serde) from semantic checks; the TLS
//!   pairing invariant is checked here, before any socket is bound

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve, ConfigError, Overrides};
pub use schema::{ListenerSpec, MetaConfig, ServerConfig, TlsPaths};
pub use validation::{validate_config, ValidationError};
