//! References: identifier occurrences found while scanning a tree.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One step from a tree root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Path from a tree root to a node, rendered as `automation[0].trigger.entity_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Location(Vec<Segment>);

impl Location {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// A new location one mapping key deeper.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_string()));
        Self(segments)
    }

    /// A new location one sequence index deeper.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// The last segment if it is a mapping key.
    #[must_use]
    pub fn last_key(&self) -> Option<&str> {
        match self.0.last() {
            Some(Segment::Key(key)) => Some(key.as_str()),
            _ => None,
        }
    }

    /// Whether this node is a value of `key` or a direct element of a sequence under `key`.
    #[must_use]
    pub fn is_under_field(&self, key: &str) -> bool {
        match self.0.as_slice() {
            [.., Segment::Key(last)] => last == key,
            [.., Segment::Key(parent), Segment::Index(_)] => parent == key,
            _ => false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (pos, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if pos == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// An identifier-shaped occurrence inside a scanned file.
///
/// The identifier is kept as found; it may not satisfy any grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub entity_id: String,
    pub file: PathBuf,
    pub location: Location,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.file.display(),
            self.location,
            self.entity_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_nested_location() {
        let loc = Location::root()
            .key("automation")
            .index(0)
            .key("trigger")
            .key("entity_id");
        assert_eq!(loc.to_string(), "automation[0].trigger.entity_id");
    }

    #[test]
    fn should_render_root_placeholder() {
        assert_eq!(Location::root().to_string(), "<root>");
    }

    #[test]
    fn should_render_top_level_sequence() {
        let loc = Location::root().index(3).key("alias");
        assert_eq!(loc.to_string(), "[3].alias");
    }

    #[test]
    fn should_detect_field_membership_through_one_index() {
        let direct = Location::root().key("target").key("entity_id");
        let listed = direct.index(1);
        let nested = listed.key("other");
        assert!(direct.is_under_field("entity_id"));
        assert!(listed.is_under_field("entity_id"));
        assert!(!nested.is_under_field("entity_id"));
        assert_eq!(listed.last_key(), None);
    }

    #[test]
    fn should_display_reference_with_file_and_location() {
        let reference = Reference {
            entity_id: "light.kitchen".to_string(),
            file: PathBuf::from("automations.yaml"),
            location: Location::root().index(0).key("entity_id"),
        };
        assert_eq!(
            reference.to_string(),
            "automations.yaml: [0].entity_id: light.kitchen"
        );
    }
}
