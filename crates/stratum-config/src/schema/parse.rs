//! Conversion of JSON5 values into constraint nodes.

use super::unify::{apply_each, unify_fields};
use super::{Field, Kind, Leaf, Node, Section, join_path, schema_error};
use crate::ConfigError;
use serde_json::{Map, Value};

const TYPE_KEY: &str = "$type";
const DEFAULT_KEY: &str = "$default";
const ENUM_KEY: &str = "$enum";
const LIST_KEY: &str = "$list";
const EACH_KEY: &str = "$each";

/// Parse a whole document; `label` names it in error messages.
pub(super) fn parse_document(value: &Value, label: &str) -> Result<Node, ConfigError> {
    if !value.is_object() {
        return Err(schema_error(label, "document root must be an object"));
    }
    parse_node(value, label, "")
}

fn parse_node(value: &Value, label: &str, path: &str) -> Result<Node, ConfigError> {
    match value {
        Value::Object(map) if map.contains_key(TYPE_KEY) => {
            parse_leaf(map, label, path).map(Node::Leaf)
        }
        Value::Object(map) if map.contains_key(LIST_KEY) => {
            ensure_allowed_keys(map, &[LIST_KEY], label, path)?;
            let elem = parse_node(&map[LIST_KEY], label, &join_path(path, LIST_KEY))?;
            Ok(Node::ListOf(Box::new(elem)))
        }
        Value::Object(map) => parse_section(map, label, path).map(Node::Section),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| parse_node(item, label, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::List),
        scalar => Ok(Node::Concrete(scalar.clone())),
    }
}

fn parse_leaf(map: &Map<String, Value>, label: &str, path: &str) -> Result<Leaf, ConfigError> {
    ensure_allowed_keys(map, &[TYPE_KEY, DEFAULT_KEY, ENUM_KEY], label, path)?;

    let type_path = join_path(path, TYPE_KEY);
    let kind = map[TYPE_KEY]
        .as_str()
        .ok_or_else(|| located(label, &type_path, "expected string"))?;
    let kind = Kind::from_name(kind)
        .ok_or_else(|| located(label, &type_path, format!("unknown type {kind:?}")))?;

    let allowed = match map.get(ENUM_KEY) {
        Some(Value::Array(items)) => {
            let enum_path = join_path(path, ENUM_KEY);
            if items.is_empty() {
                return Err(located(label, &enum_path, "expected at least one value"));
            }
            for (idx, item) in items.iter().enumerate() {
                if !kind.matches(item) {
                    return Err(located(
                        label,
                        &format!("{enum_path}[{idx}]"),
                        format!("expected {}", kind.name()),
                    ));
                }
            }
            Some(items.clone())
        }
        Some(_) => {
            return Err(located(label, &join_path(path, ENUM_KEY), "expected array"));
        }
        None => None,
    };

    let mut leaf = Leaf {
        kind,
        default: None,
        allowed,
    };
    if let Some(default) = map.get(DEFAULT_KEY) {
        if !leaf.accepts(default) {
            return Err(located(
                label,
                &join_path(path, DEFAULT_KEY),
                format!("default {default} does not satisfy the constraint"),
            ));
        }
        leaf.default = Some(default.clone());
    }
    Ok(leaf)
}

fn parse_section(
    map: &Map<String, Value>,
    label: &str,
    path: &str,
) -> Result<Section, ConfigError> {
    let mut section = Section::default();
    for (key, value) in map {
        if key == EACH_KEY {
            let each = parse_node(value, label, &join_path(path, EACH_KEY))?;
            section.each = Some(Box::new(each));
            continue;
        }
        if key.starts_with('$') {
            return Err(located(label, &join_path(path, key), "unknown directive"));
        }
        let (name, optional) = match key.strip_suffix('?') {
            Some(name) => (name, true),
            None => (key.as_str(), false),
        };
        if name.is_empty() {
            return Err(located(label, &join_path(path, key), "empty field name"));
        }

        let field_path = join_path(path, name);
        let field = Field {
            node: parse_node(value, label, &field_path)?,
            optional,
        };
        let field = match section.fields.remove(name) {
            Some(existing) => unify_fields(existing, field, &field_path)?,
            None => field,
        };
        section.fields.insert(name.to_string(), field);
    }
    apply_each(&mut section, path)?;
    Ok(section)
}

/// Ensure a directive object contains only the keys it understands.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    label: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(located(label, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

fn located(label: &str, path: &str, message: impl Into<String>) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    schema_error(&format!("{label}:{path}"), message)
}
