//! Constraint documents and their unification.
//!
//! Schema documents are JSON5. Plain scalars are concrete values, while a
//! handful of `$` directives describe values a later document may refine:
//!
//! ```json5
//! {
//!   service: {
//!     name: { $type: "string" },                      // required, no default
//!     mode: { $type: "string", $enum: ["debug", "release"], $default: "debug" },
//!     hosts: { $list: { $type: "string" } },
//!     "mongodb?": { uri: { $type: "string" } },      // optional section
//!     servers: { $each: { port: { $type: "int", $default: 8080 } } },
//!   },
//! }
//! ```
//!
//! Two documents unify when every concrete value agrees; refining an open
//! constraint with a matching value is accepted.

mod export;
mod parse;
mod sources;
mod unify;

pub use sources::{DefaultSource, SchemaOverlay};

pub(crate) use export::export;
pub(crate) use unify::unify;

use crate::ConfigError;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// A parsed or unified constraint value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    /// A concrete scalar (string, number, bool or null).
    Concrete(Value),
    /// A typed placeholder, optionally with a default and allowed values.
    Leaf(Leaf),
    /// A section of named fields.
    Section(Section),
    /// A list with a fixed number of elements.
    List(Vec<Node>),
    /// A list of any length whose elements share one constraint.
    ListOf(Box<Node>),
}

impl Node {
    fn describe(&self) -> String {
        match self {
            Node::Concrete(value) => format!("value {value}"),
            Node::Leaf(leaf) => format!("type {}", leaf.kind.name()),
            Node::Section(_) => "section".to_string(),
            Node::List(_) | Node::ListOf(_) => "list".to_string(),
        }
    }

    /// Look up a regular (non-optional) field of a section.
    pub(crate) fn field(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Section(section) => section
                .fields
                .get(name)
                .filter(|field| !field.optional)
                .map(|field| &field.node),
            _ => None,
        }
    }

    /// Close every section below the root against unknown fields.
    fn close_below_root(&mut self) {
        if let Node::Section(section) = self {
            for field in section.fields.values_mut() {
                field.node.close();
            }
            if let Some(each) = section.each.as_mut() {
                each.close();
            }
        }
    }

    fn close(&mut self) {
        match self {
            Node::Section(section) => {
                section.closed = true;
                for field in section.fields.values_mut() {
                    field.node.close();
                }
                if let Some(each) = section.each.as_mut() {
                    each.close();
                }
            }
            Node::List(items) => items.iter_mut().for_each(Node::close),
            Node::ListOf(elem) => elem.close(),
            Node::Concrete(_) | Node::Leaf(_) => {}
        }
    }
}

/// Primitive kinds a leaf constraint can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    String,
    Int,
    Bool,
    Number,
}

impl Kind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Kind::String),
            "int" => Some(Kind::Int),
            "bool" => Some(Kind::Bool),
            "number" => Some(Kind::Number),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Bool => "bool",
            Kind::Number => "number",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Int => value.is_i64() || value.is_u64(),
            Kind::Bool => value.is_boolean(),
            Kind::Number => value.is_number(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Leaf {
    pub(crate) kind: Kind,
    pub(crate) default: Option<Value>,
    pub(crate) allowed: Option<Vec<Value>>,
}

impl Leaf {
    fn accepts(&self, value: &Value) -> bool {
        self.kind.matches(value)
            && self
                .allowed
                .as_ref()
                .is_none_or(|allowed| allowed.contains(value))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Section {
    pub(crate) fields: BTreeMap<String, Field>,
    /// Constraint applied to every entry, declared with `$each`.
    pub(crate) each: Option<Box<Node>>,
    /// Closed sections reject fields they do not declare.
    pub(crate) closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub(crate) node: Node,
    pub(crate) optional: bool,
}

/// Parse and unify every default document into one closed schema.
pub(crate) fn load_defaults(overlay: &SchemaOverlay) -> Result<Node, ConfigError> {
    let mut unified: Option<Node> = None;
    for (path, contents) in overlay.files() {
        let node = parse_bytes(path, contents)?;
        debug!("parsed default document (path={path})");
        unified = Some(match unified {
            Some(current) => unify(current, node, "")?,
            None => node,
        });
    }
    let mut unified = unified.ok_or_else(|| ConfigError::Schema {
        path: "defaults".to_string(),
        message: "no schema documents found".to_string(),
    })?;
    unified.close_below_root();
    Ok(unified)
}

/// Parse a user document; user sections stay open.
pub(crate) fn load_document(label: &str, contents: &str) -> Result<Node, ConfigError> {
    let value = parse_json5(label, contents)?;
    parse::parse_document(&value, label)
}

fn parse_bytes(label: &str, contents: &[u8]) -> Result<Node, ConfigError> {
    let text = std::str::from_utf8(contents).map_err(|err| ConfigError::Schema {
        path: label.to_string(),
        message: format!("document is not valid UTF-8: {err}"),
    })?;
    load_document(label, text)
}

fn parse_json5(label: &str, contents: &str) -> Result<Value, ConfigError> {
    json5::from_str(contents).map_err(|source| ConfigError::ParseFailed {
        document: label.to_string(),
        source,
    })
}

/// Join nested paths for error messages.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn schema_error(path: &str, message: impl Into<String>) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::Schema {
        path: path.to_string(),
        message: message.into(),
    }
}
