//! Reference scanner: finds entity-identifier occurrences in any parsed tree.
//!
//! Built from one generic primitive, [`walk`], and two independent passes
//! applied to every visited node:
//!
//! 1. [`entity_id_field`]: the value of any `entity_id` key is a reference,
//!    whether it holds one string or a sequence of strings.
//! 2. [`identifier_shaped`]: any other string scalar whose *whole* text
//!    looks like `domain.object_id`.
//!
//! Scanning is lazy and never interprets the tree (no template evaluation,
//! no knowledge of service-call schemas).

use std::collections::BTreeSet;
use std::path::Path;

use refcheck_domain::entity_id::looks_like_entity_id;
use refcheck_domain::reference::{Location, Reference};
use serde_json::Value;

/// The mapping key whose value is always treated as a reference.
pub const ENTITY_ID_KEY: &str = "entity_id";

/// Scanning policy.
///
/// The default policy is the baseline rule: every identifier-shaped scalar
/// is a reference. `ignore_keys` opts specific mapping keys out of shape
/// matching (e.g. `service`), never out of the `entity_id` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPolicy {
    ignore_keys: BTreeSet<String>,
}

impl ScanPolicy {
    #[must_use]
    pub fn ignoring<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn ignore_keys(&self) -> &BTreeSet<String> {
        &self.ignore_keys
    }

    fn ignores(&self, location: &Location) -> bool {
        self.ignore_keys
            .iter()
            .any(|key| location.is_under_field(key))
    }
}

/// A visited node and where it sits.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub location: Location,
    pub value: &'a Value,
}

/// Depth-first, document-order traversal of every node in a tree.
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<Node<'a>>,
}

/// Walk every mapping value and sequence element under `root`, root included.
#[must_use]
pub fn walk(root: &Value) -> Walk<'_> {
    Walk {
        stack: vec![Node {
            location: Location::root(),
            value: root,
        }],
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match node.value {
            Value::Object(mapping) => {
                for (key, value) in mapping.iter().rev() {
                    self.stack.push(Node {
                        location: node.location.key(key),
                        value,
                    });
                }
            }
            Value::Array(items) => {
                for (index, value) in items.iter().enumerate().rev() {
                    self.stack.push(Node {
                        location: node.location.index(index),
                        value,
                    });
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
        Some(node)
    }
}

fn is_templated(text: &str) -> bool {
    text.contains("{{") || text.contains("{%")
}

/// Pass 1: references held by an `entity_id` field.
///
/// Template expressions are not identifiers and are skipped; non-string
/// values are ignored.
#[must_use]
pub fn entity_id_field<'a>(node: &Node<'a>) -> Vec<(Location, &'a str)> {
    if node.location.last_key() != Some(ENTITY_ID_KEY) {
        return Vec::new();
    }
    match node.value {
        Value::String(text) if !is_templated(text) => {
            vec![(node.location.clone(), text.as_str())]
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::String(text) if !is_templated(text) => {
                    Some((node.location.index(index), text.as_str()))
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Pass 2: identifier-shaped scalars outside `entity_id` fields.
#[must_use]
pub fn identifier_shaped<'a>(
    node: &Node<'a>,
    policy: &ScanPolicy,
) -> Option<(Location, &'a str)> {
    let Value::String(text) = node.value else {
        return None;
    };
    if node.location.is_under_field(ENTITY_ID_KEY) || policy.ignores(&node.location) {
        return None;
    }
    looks_like_entity_id(text).then(|| (node.location.clone(), text.as_str()))
}

/// Every reference in `tree`, in document order, attributed to `file`.
pub fn scan<'a>(
    tree: &'a Value,
    file: &'a Path,
    policy: &'a ScanPolicy,
) -> impl Iterator<Item = Reference> + 'a {
    walk(tree).flat_map(move |node| {
        entity_id_field(&node)
            .into_iter()
            .chain(identifier_shaped(&node, policy))
            .map(|(location, entity_id)| Reference {
                entity_id: entity_id.to_string(),
                file: file.to_path_buf(),
                location,
            })
            .collect::<Vec<_>>()
    })
}
