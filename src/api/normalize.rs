//! Response shape normalization.
//!
//! Endpoints disagree on how they wrap payloads. Collections arrive as a bare
//! array, as `{ "items": [...] }`, or as `{ "<resource>": [...] }`. Single
//! records arrive bare or as `{ "<entity>": {...} }`.

use serde_json::Value;

use crate::error::{FolioError, Result};

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extract the entity array from a collection response.
pub fn collection(resource: &str, collection_key: &str, body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ["items", collection_key] {
                match map.remove(key) {
                    Some(Value::Array(items)) => return Ok(items),
                    Some(other) => {
                        return Err(FolioError::ShapeMismatch {
                            resource: resource.to_string(),
                            detail: format!("'{key}' is {}, expected an array", describe(&other)),
                        });
                    }
                    None => {}
                }
            }
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            Err(FolioError::ShapeMismatch {
                resource: resource.to_string(),
                detail: format!(
                    "expected an array, 'items' or '{collection_key}', got keys [{}]",
                    keys.join(", ")
                ),
            })
        }
        other => Err(FolioError::ShapeMismatch {
            resource: resource.to_string(),
            detail: format!("expected an array, got {}", describe(&other)),
        }),
    }
}

/// Extract a single record from a create/update response.
///
/// Returns `None` when the body does not carry a full record.
pub fn entity(entity_key: &str, body: Value) -> Option<Value> {
    match body {
        Value::Object(mut map) => {
            if map.contains_key("id") {
                return Some(Value::Object(map));
            }
            match map.remove(entity_key) {
                Some(inner @ Value::Object(_)) if inner.get("id").is_some() => Some(inner),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_bare_array() {
        let items = collection("posts", "posts", json!([{ "id": "1" }])).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_collection_items_wrapper() {
        let body = json!({ "items": [{ "id": "1" }, { "id": "2" }], "total": 2 });
        assert_eq!(collection("posts", "posts", body).unwrap().len(), 2);
    }

    #[test]
    fn test_collection_resource_wrapper() {
        let body = json!({ "courses": [{ "id": "c1" }] });
        assert_eq!(collection("courses", "courses", body).unwrap().len(), 1);
    }

    #[test]
    fn test_collection_unknown_object_is_shape_mismatch() {
        let body = json!({ "data": [], "count": 0 });
        let err = collection("posts", "posts", body).unwrap_err();
        match err {
            FolioError::ShapeMismatch { resource, detail } => {
                assert_eq!(resource, "posts");
                assert!(detail.contains("count, data"), "{detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collection_wrapper_must_hold_array() {
        let body = json!({ "items": { "id": "1" } });
        assert!(matches!(
            collection("posts", "posts", body),
            Err(FolioError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_collection_scalar_is_shape_mismatch() {
        assert!(collection("posts", "posts", json!("oops")).is_err());
        assert!(collection("posts", "posts", Value::Null).is_err());
    }

    #[test]
    fn test_entity_bare_and_wrapped() {
        let bare = entity("post", json!({ "id": "1", "title": "a" })).unwrap();
        assert_eq!(bare["title"], "a");

        let wrapped = entity("post", json!({ "post": { "id": "1", "title": "b" } })).unwrap();
        assert_eq!(wrapped["title"], "b");
    }

    #[test]
    fn test_entity_without_record() {
        assert!(entity("post", json!({ "success": true })).is_none());
        assert!(entity("post", json!({ "post": { "title": "no id" } })).is_none());
        assert!(entity("post", Value::Null).is_none());
    }
}
