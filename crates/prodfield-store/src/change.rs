//! Field change log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single field change recorded in a product's change log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    /// Unique change identifier.
    pub id: String,

    /// When the change happened (ISO 8601 UTC).
    pub timestamp: DateTime<Utc>,

    /// Field that changed.
    pub field: String,

    /// Previous value, absent when the field was new.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,

    /// Value after the change.
    pub new_value: Value,
}

impl ChangeEvent {
    /// Create a change entry with a generated id and current timestamp.
    #[must_use]
    pub fn new(field: impl Into<String>, old_value: Option<Value>, new_value: Value) -> Self {
        Self {
            id: format!("chg_{}", Uuid::new_v4().as_simple()),
            timestamp: Utc::now(),
            field: field.into(),
            old_value,
            new_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization_skips_absent_old_value() {
        let change = ChangeEvent::new("post_title", None, json!("Widget"));
        let line = serde_json::to_string(&change).unwrap();

        assert!(line.contains(r#""field":"post_title""#));
        assert!(!line.contains("old_value"));

        let back: ChangeEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(back, change);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ChangeEvent::new("color", None, json!("red"));
        let b = ChangeEvent::new("color", None, json!("red"));
        assert_ne!(a.id, b.id);
    }
}
