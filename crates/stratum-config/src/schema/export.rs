//! Conversion of a unified node into a concrete JSON value.

use super::{Node, join_path};
use crate::ConfigError;
use serde_json::{Map, Value};

/// Export `node` as concrete JSON.
///
/// Leaves fall back to their default, optional fields are dropped and open
/// lists become empty. A required leaf without a value is a
/// [`ConfigError::MissingField`].
pub(crate) fn export(node: &Node, path: &str) -> Result<Value, ConfigError> {
    match node {
        Node::Concrete(value) => Ok(value.clone()),
        Node::Leaf(leaf) => leaf.default.clone().ok_or_else(|| ConfigError::MissingField {
            path: path.to_string(),
        }),
        Node::Section(section) => {
            let mut map = Map::new();
            for (name, field) in &section.fields {
                if field.optional {
                    continue;
                }
                map.insert(name.clone(), export(&field.node, &join_path(path, name))?);
            }
            Ok(Value::Object(map))
        }
        Node::List(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| export(item, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Node::ListOf(_) => Ok(Value::Array(Vec::new())),
    }
}
