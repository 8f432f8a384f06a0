//! Unification of two constraint nodes.

use super::{Field, Leaf, Node, Section, join_path, schema_error};
use crate::ConfigError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Unify two nodes, failing on any conflicting concrete value.
pub(crate) fn unify(left: Node, right: Node, path: &str) -> Result<Node, ConfigError> {
    match (left, right) {
        (Node::Concrete(a), Node::Concrete(b)) => {
            if a == b {
                Ok(Node::Concrete(a))
            } else {
                Err(schema_error(path, format!("conflicting values {a} and {b}")))
            }
        }
        (Node::Leaf(leaf), Node::Concrete(value)) | (Node::Concrete(value), Node::Leaf(leaf)) => {
            refine(&leaf, value, path)
        }
        (Node::Leaf(a), Node::Leaf(b)) => unify_leaves(a, b, path).map(Node::Leaf),
        (Node::Section(a), Node::Section(b)) => unify_sections(a, b, path).map(Node::Section),
        (Node::ListOf(elem), Node::List(items)) | (Node::List(items), Node::ListOf(elem)) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| unify((*elem).clone(), item, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::List),
        (Node::ListOf(a), Node::ListOf(b)) => Ok(Node::ListOf(Box::new(unify(*a, *b, path)?))),
        (Node::List(a), Node::List(b)) => {
            if a.len() != b.len() {
                return Err(schema_error(
                    path,
                    format!("incompatible list lengths {} and {}", a.len(), b.len()),
                ));
            }
            a.into_iter()
                .zip(b)
                .enumerate()
                .map(|(idx, (a, b))| unify(a, b, &format!("{path}[{idx}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::List)
        }
        (a, b) => Err(schema_error(
            path,
            format!("mismatched {} and {}", a.describe(), b.describe()),
        )),
    }
}

fn refine(leaf: &Leaf, value: Value, path: &str) -> Result<Node, ConfigError> {
    if !leaf.kind.matches(&value) {
        return Err(schema_error(
            path,
            format!("conflicting values {value} and type {}", leaf.kind.name()),
        ));
    }
    if !leaf.accepts(&value) {
        return Err(schema_error(path, format!("value {value} is not allowed")));
    }
    Ok(Node::Concrete(value))
}

fn unify_leaves(a: Leaf, b: Leaf, path: &str) -> Result<Leaf, ConfigError> {
    if a.kind != b.kind {
        return Err(schema_error(
            path,
            format!("mismatched types {} and {}", a.kind.name(), b.kind.name()),
        ));
    }
    let allowed = match (a.allowed, b.allowed) {
        (Some(a), Some(b)) => {
            let both: Vec<Value> = a.into_iter().filter(|value| b.contains(value)).collect();
            if both.is_empty() {
                return Err(schema_error(path, "no value satisfies both constraints"));
            }
            Some(both)
        }
        (a, b) => a.or(b),
    };
    // Differing defaults cancel each other out.
    let default = match (a.default, b.default) {
        (Some(a), Some(b)) => (a == b).then_some(a),
        (a, b) => a.or(b),
    };
    let mut leaf = Leaf {
        kind: a.kind,
        default: None,
        allowed,
    };
    leaf.default = default.filter(|value| leaf.accepts(value));
    Ok(leaf)
}

fn unify_sections(left: Section, right: Section, path: &str) -> Result<Section, ConfigError> {
    let Section {
        fields: mut left_fields,
        each: left_each,
        closed: left_closed,
    } = left;
    let Section {
        fields: right_fields,
        each: right_each,
        closed: right_closed,
    } = right;

    let mut fields = BTreeMap::new();
    for (name, field) in right_fields {
        let field_path = join_path(path, &name);
        let field = match left_fields.remove(&name) {
            Some(existing) => unify_fields(existing, field, &field_path)?,
            None => {
                ensure_allowed(left_closed, left_each.is_some(), &field_path)?;
                field
            }
        };
        fields.insert(name, field);
    }
    for (name, field) in left_fields {
        ensure_allowed(right_closed, right_each.is_some(), &join_path(path, &name))?;
        fields.insert(name, field);
    }

    let each = match (left_each, right_each) {
        (Some(a), Some(b)) => Some(Box::new(unify(*a, *b, &join_path(path, "$each"))?)),
        (a, b) => a.or(b),
    };
    let mut section = Section {
        fields,
        each,
        closed: left_closed || right_closed,
    };
    apply_each(&mut section, path)?;
    Ok(section)
}

/// A field missing from one side is only accepted when that side is open.
fn ensure_allowed(closed: bool, has_each: bool, path: &str) -> Result<(), ConfigError> {
    if !closed || has_each {
        Ok(())
    } else {
        Err(schema_error(path, "field not allowed"))
    }
}

/// Unify two declarations of the same field.
pub(super) fn unify_fields(a: Field, b: Field, path: &str) -> Result<Field, ConfigError> {
    Ok(Field {
        node: unify(a.node, b.node, path)?,
        optional: a.optional && b.optional,
    })
}

/// Constrain every field of `section` with its `$each` pattern.
pub(super) fn apply_each(section: &mut Section, path: &str) -> Result<(), ConfigError> {
    let Some(each) = section.each.as_deref() else {
        return Ok(());
    };
    let each = each.clone();
    for (name, field) in section.fields.iter_mut() {
        let node = std::mem::replace(&mut field.node, Node::Concrete(Value::Null));
        field.node = unify(each.clone(), node, &join_path(path, name))?;
    }
    Ok(())
}
