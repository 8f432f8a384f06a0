//! Error types for config resolution.

use crate::env::LeafKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while resolving, decoding or writing config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config document failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A document is not valid JSON5.
    #[error("failed to parse {document}: {source}")]
    ParseFailed {
        document: String,
        #[source]
        source: json5::Error,
    },
    /// A document violates the schema or conflicts with another document.
    #[error("schema error at {path}: {message}")]
    Schema { path: String, message: String },
    /// A required field has no concrete value after unification.
    #[error("missing required field: {path}")]
    MissingField { path: String },
    /// The unified document does not match the typed config shape.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// The env file exists but could not be loaded.
    #[error("failed to load env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    /// An environment value could not be converted to the field type.
    #[error("error converting env var {var} to {kind}: {value:?}")]
    Coercion {
        var: String,
        value: String,
        kind: LeafKind,
    },
    /// Writing the resolved config failed.
    #[error("failed to write config to {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
