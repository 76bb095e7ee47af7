//! Locating the item list inside an API payload.
//!
//! Paths are JSON pointers (RFC 6901), e.g. `/rates` or `/0/rates`.

use crate::error::FetchError;
use serde_json::Value;

/// Expected layout of a response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    /// Top-level JSON array, optionally navigated further by a pointer.
    List { pointer: Option<String> },
    /// Top-level JSON object holding the list at `pointer`.
    Object { pointer: String },
}

impl PayloadShape {
    /// The payload itself is the item list.
    pub fn list() -> Self {
        PayloadShape::List { pointer: None }
    }

    /// Top-level array with the item list at `pointer`.
    pub fn list_at(pointer: impl Into<String>) -> Self {
        PayloadShape::List {
            pointer: Some(pointer.into()),
        }
    }

    /// Top-level object with the item list at `pointer`.
    pub fn object_at(pointer: impl Into<String>) -> Self {
        PayloadShape::Object {
            pointer: pointer.into(),
        }
    }

    fn pointer(&self) -> Option<&str> {
        match self {
            PayloadShape::List { pointer } => pointer.as_deref(),
            PayloadShape::Object { pointer } => Some(pointer),
        }
    }
}

/// Pull the item list out of `payload` according to `shape`.
pub fn extract_list(mut payload: Value, shape: &PayloadShape) -> Result<Vec<Value>, FetchError> {
    let pointer = shape.pointer();
    let shown = pointer.unwrap_or("(root)");

    match (shape, &payload) {
        (PayloadShape::List { .. }, Value::Array(_)) => {}
        (PayloadShape::Object { .. }, Value::Object(_)) => {}
        (PayloadShape::List { .. }, other) => {
            return Err(extract_error(shown, format!("expected array payload, got {}", kind(other))));
        }
        (PayloadShape::Object { .. }, other) => {
            return Err(extract_error(shown, format!("expected object payload, got {}", kind(other))));
        }
    }

    let target = match pointer {
        Some(p) => payload
            .pointer_mut(p)
            .map(Value::take)
            .ok_or_else(|| extract_error(shown, "path not found".to_string()))?,
        None => payload,
    };

    match target {
        Value::Array(items) => Ok(items),
        other => Err(extract_error(shown, format!("expected array, got {}", kind(&other)))),
    }
}

fn extract_error(pointer: &str, reason: String) -> FetchError {
    FetchError::Extract {
        pointer: pointer.to_string(),
        reason,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_list() {
        let payload = json!([{"data": "2020-01-02", "cena": 201.5}, {"data": "2020-01-03", "cena": 203.1}]);
        let items = extract_list(payload, &PayloadShape::list()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["cena"], 203.1);
    }

    #[test]
    fn test_list_with_pointer() {
        let payload = json!([{"table": "C", "rates": [{"code": "USD"}, {"code": "EUR"}]}]);
        let items = extract_list(payload, &PayloadShape::list_at("/0/rates")).unwrap();
        assert_eq!(items, vec![json!({"code": "USD"}), json!({"code": "EUR"})]);
    }

    #[test]
    fn test_object_with_pointer() {
        let payload = json!({"code": "USD", "rates": [{"mid": 3.9}]});
        let items = extract_list(payload, &PayloadShape::object_at("/rates")).unwrap();
        assert_eq!(items, vec![json!({"mid": 3.9})]);
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        let items = extract_list(json!([]), &PayloadShape::list()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_shape_mismatch() {
        let err = extract_list(json!({"rates": []}), &PayloadShape::list()).unwrap_err();
        assert!(matches!(err, FetchError::Extract { .. }));

        let err = extract_list(json!([]), &PayloadShape::object_at("/rates")).unwrap_err();
        assert!(err.to_string().contains("expected object payload"));
    }

    #[test]
    fn test_missing_path() {
        let err = extract_list(json!({"code": "USD"}), &PayloadShape::object_at("/rates")).unwrap_err();
        match err {
            FetchError::Extract { pointer, reason } => {
                assert_eq!(pointer, "/rates");
                assert_eq!(reason, "path not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_path_to_non_array() {
        let err = extract_list(json!({"rates": 5}), &PayloadShape::object_at("/rates")).unwrap_err();
        assert!(err.to_string().contains("expected array, got number"));
    }
}
