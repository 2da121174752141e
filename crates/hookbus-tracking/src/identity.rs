//! Structural, display-friendly identity serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Serialized form of one identity node: `{type, id, parent?}`.
///
/// The `parent` chain embeds the full serialization of every ancestor, so a
/// sink can attribute an event to its position in the identity forest without
/// holding references to live nodes. Callers must treat returned values as
/// immutable; nodes hand out a shared memoized copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedIdentity {
    /// Runtime category label of the node (e.g. `"Owner"`, `"Target"`).
    #[serde(rename = "type")]
    pub node_type: String,
    /// The identifier assigned via `identify`.
    pub id: String,
    /// The parent's serialization, omitted for roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<SerializedIdentity>>,
}

impl SerializedIdentity {
    /// The empty structure returned while tracking is disabled.
    pub fn empty() -> Self {
        Self {
            node_type: String::new(),
            id: String::new(),
            parent: None,
        }
    }

    /// Returns whether this is the empty (disabled-mode) structure.
    pub fn is_empty(&self) -> bool {
        self.node_type.is_empty() && self.id.is_empty() && self.parent.is_none()
    }
}

impl fmt::Display for SerializedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.node_type, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let id = SerializedIdentity {
            node_type: "Target".to_string(),
            id: "transformModules[AsyncSeriesHook]".to_string(),
            parent: None,
        };
        assert_eq!(id.to_string(), "Target<transformModules[AsyncSeriesHook]>");
    }

    #[test]
    fn test_serde_renames_type_and_skips_absent_parent() {
        let id = SerializedIdentity {
            node_type: "Owner".to_string(),
            id: "Foo".to_string(),
            parent: None,
        };
        let json = serde_json::to_value(&id).expect("serialize");
        assert_eq!(json, serde_json::json!({"type": "Owner", "id": "Foo"}));
    }

    #[test]
    fn test_empty() {
        assert!(SerializedIdentity::empty().is_empty());
    }
}
