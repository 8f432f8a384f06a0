//! Layered service configuration.
//!
//! A service config is resolved from three layers, lowest precedence first:
//! the bundled default schema documents, a user JSON5 document, and the
//! process environment. The documents are unified (conflicting concrete
//! values are an error), decoded into [`ServiceConfig`], and bound fields are
//! finally overwritten from environment variables.

mod env;
mod error;
mod loader;
mod model;
mod schema;
mod writer;

/// Environment overlay building blocks.
pub use env::{
    EnvBindings, EnvLeaf, EnvSource, LeafKind, LeafValue, OverlayVisitor, ProcessEnv,
    apply_env_overlay, coerce, env_var_name, load_env_file,
};
/// Public error type returned by every resolution API.
pub use error::ConfigError;
/// Resolution entry points.
pub use loader::{ResolveOptions, SERVICE_FIELD, resolve};
/// Configuration schema models.
pub use model::*;
/// Default schema sources.
pub use schema::{DefaultSource, SchemaOverlay};
pub use writer::write_json;
