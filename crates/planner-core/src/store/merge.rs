//! Top-level shallow merge of JSON records.

use serde_json::{Map, Value};

/// Returns `base` with every top-level field of `overlay` written over it.
///
/// Nested values are replaced whole, never merged: an overlay `courses` array
/// replaces the base array entirely. A non-object overlay contributes nothing;
/// a non-object base is treated as empty.
pub fn shallow_merge(base: &Value, overlay: &Value) -> Value {
    let mut merged: Map<String, Value> = base.as_object().cloned().unwrap_or_default();
    if let Some(fields) = overlay.as_object() {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_wins_on_collision_and_union_otherwise() {
        let merged = shallow_merge(&json!({"a": 1, "b": 2}), &json!({"b": 9, "c": 3}));
        assert_eq!(merged, json!({"a": 1, "b": 9, "c": 3}));
    }

    #[test]
    fn nested_collections_are_replaced_not_merged() {
        let base = json!({"tasks": [{"id": 1}, {"id": 2}]});
        let overlay = json!({"tasks": [{"id": 3}]});
        assert_eq!(
            shallow_merge(&base, &overlay),
            json!({"tasks": [{"id": 3}]})
        );
    }

    #[test]
    fn non_object_overlay_is_ignored() {
        let base = json!({"a": 1});
        assert_eq!(shallow_merge(&base, &json!([1, 2])), base);
        assert_eq!(shallow_merge(&base, &Value::Null), base);
    }
}
