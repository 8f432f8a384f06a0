//! String to primitive conversion for environment values.

use crate::ConfigError;
use std::fmt;

/// Primitive kinds an environment value can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    String,
    Int,
    Bool,
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeafKind::String => "string",
            LeafKind::Int => "int",
            LeafKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A converted environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafValue {
    String(String),
    Int(i64),
    Bool(bool),
}

/// Convert `raw`, read from the variable `var`, into a value of `kind`.
pub fn coerce(var: &str, raw: &str, kind: LeafKind) -> Result<LeafValue, ConfigError> {
    match kind {
        LeafKind::String => Ok(LeafValue::String(raw.to_string())),
        LeafKind::Int => raw
            .parse::<i64>()
            .map(LeafValue::Int)
            .map_err(|_| coercion_error(var, raw, kind)),
        LeafKind::Bool => parse_bool(raw)
            .map(LeafValue::Bool)
            .ok_or_else(|| coercion_error(var, raw, kind)),
    }
}

/// Accepts the literal set of a conventional boolean parser.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn coercion_error(var: &str, raw: &str, kind: LeafKind) -> ConfigError {
    ConfigError::Coercion {
        var: var.to_string(),
        value: raw.to_string(),
        kind,
    }
}

/// A config field type that an environment variable may overwrite.
pub trait EnvLeaf: Sized {
    /// Kind used when converting the raw value.
    const KIND: LeafKind;

    /// Convert a raw environment value into this type.
    fn from_env(var: &str, raw: &str) -> Result<Self, ConfigError>;
}

impl EnvLeaf for String {
    const KIND: LeafKind = LeafKind::String;

    fn from_env(_var: &str, raw: &str) -> Result<Self, ConfigError> {
        Ok(raw.to_string())
    }
}

impl EnvLeaf for i64 {
    const KIND: LeafKind = LeafKind::Int;

    fn from_env(var: &str, raw: &str) -> Result<Self, ConfigError> {
        match coerce(var, raw, Self::KIND)? {
            LeafValue::Int(value) => Ok(value),
            _ => Err(coercion_error(var, raw, Self::KIND)),
        }
    }
}

impl EnvLeaf for bool {
    const KIND: LeafKind = LeafKind::Bool;

    fn from_env(var: &str, raw: &str) -> Result<Self, ConfigError> {
        match coerce(var, raw, Self::KIND)? {
            LeafValue::Bool(value) => Ok(value),
            _ => Err(coercion_error(var, raw, Self::KIND)),
        }
    }
}
