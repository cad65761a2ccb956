//! Data retrieved from a linked account.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ============================================================================
// Retrieved Snapshot
// ============================================================================

/// One-shot retrieval result, held only for display.
///
/// The backend may return any JSON tree; Tether keeps it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetrievedSnapshot(Value);

impl RetrievedSnapshot {
    /// Wraps a JSON tree.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the raw JSON tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns true if the snapshot carries nothing worth displaying.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Renders the snapshot with two-space indentation for display.
    pub fn to_pretty_string(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Views the snapshot as a list of integration items.
    ///
    /// Returns `None` unless the root is an array of objects in the item shape.
    pub fn items(&self) -> Option<Vec<IntegrationItem>> {
        let Value::Array(entries) = &self.0 else {
            return None;
        };
        if !entries.iter().all(Value::is_object) {
            return None;
        }
        serde_json::from_value(self.0.clone()).ok()
    }
}

impl From<Value> for RetrievedSnapshot {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ============================================================================
// Integration Item
// ============================================================================

/// Common shape of the records providers return from retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
    /// Provider-side identifier.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Provider-specific item type (e.g. `hubspot_object`).
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Creation timestamp as reported by the provider.
    #[serde(default)]
    pub creation_time: Option<String>,
    /// Last modification timestamp as reported by the provider.
    #[serde(default)]
    pub last_modified_time: Option<String>,
    /// Identifier of the parent item, if any.
    #[serde(default, deserialize_with = "string_or_number")]
    pub parent_id: Option<String>,
}

impl IntegrationItem {
    /// Returns the name, or the identifier, or a placeholder.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("(unnamed)")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_view() {
        let snapshot = RetrievedSnapshot::new(json!([
            {
                "id": 101,
                "type": "hubspot_object",
                "name": "Ada",
                "creation_time": "2024-01-01T00:00:00Z",
                "last_modified_time": null,
                "parent_id": null
            },
            {"id": "abc", "type": "page", "name": null}
        ]));

        let items = snapshot.items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("101"));
        assert_eq!(items[0].item_type.as_deref(), Some("hubspot_object"));
        assert_eq!(items[0].display_name(), "Ada");
        assert_eq!(items[1].display_name(), "abc");
        assert!(items[1].parent_id.is_none());
    }

    #[test]
    fn test_items_view_rejects_other_shapes() {
        assert!(RetrievedSnapshot::new(json!({"results": []})).items().is_none());
        assert!(RetrievedSnapshot::new(json!([1, 2, 3])).items().is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(RetrievedSnapshot::new(json!(null)).is_empty());
        assert!(RetrievedSnapshot::new(json!([])).is_empty());
        assert!(!RetrievedSnapshot::new(json!([{"id": 1}])).is_empty());
        assert!(!RetrievedSnapshot::new(json!(0)).is_empty());
    }

    #[test]
    fn test_pretty_rendering() {
        let snapshot = RetrievedSnapshot::new(json!({"a": [1]}));
        assert_eq!(snapshot.to_pretty_string().unwrap(), "{\n  \"a\": [\n    1\n  ]\n}");
    }
}
