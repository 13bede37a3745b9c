//! Normalization of list responses.
//!
//! Endpoints answer a list request in one of three shapes:
//!
//! - a bare array: `[{...}, ...]`
//! - a paginated envelope: `{"results": [...], "count": 45}` (some endpoints
//!   say `total` instead of `count`)
//! - a data envelope: `{"data": [...], "total": 45}`, total optional
//!
//! [`normalize`] turns each of them into a [`Page`]. Nothing past this
//! point ever looks at the raw shape.

use serde_json::{Map, Value};
use tracing::warn;

use shipdesk_list::{Page, Record};

use crate::error::{ApiError, Result};

/// Converts a list response into a page of records.
///
/// When no count is given, the total is the number of items. Items that are
/// not JSON objects are skipped.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] for a body that is none of the known shapes.
pub fn normalize(value: Value) -> Result<Page<Record>> {
    match value {
        Value::Array(items) => Ok(Page::complete(records(items))),
        Value::Object(mut map) => {
            let items = ["results", "data", "items"]
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| {
                    ApiError::Decode(format!(
                        "expected an array, `results` or `data`, got keys {:?}",
                        map.keys().collect::<Vec<_>>()
                    ))
                })?;
            let items = records(items);
            let total = total_of(&map).unwrap_or(items.len()).max(items.len());
            Ok(Page::new(items, total))
        }
        Value::Null => Ok(Page::complete(Vec::new())),
        other => Err(ApiError::Decode(format!(
            "expected a list response, got {}",
            kind_of(&other)
        ))),
    }
}

fn records(items: Vec<Value>) -> Vec<Record> {
    let len = items.len();
    let records: Vec<Record> = items.into_iter().filter_map(Record::from_value).collect();
    if records.len() < len {
        warn!(skipped = len - records.len(), "skipping non-object list items");
    }
    records
}

fn total_of(map: &Map<String, Value>) -> Option<usize> {
    ["count", "total"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_u64))
        .and_then(|n| usize::try_from(n).ok())
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(page: &Page<Record>) -> Vec<String> {
        page.items.iter().map(|r| r.text("id").into_owned()).collect()
    }

    #[test]
    fn test_bare_array() {
        let page = normalize(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(ids(&page), vec!["1", "2"]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_results_count_envelope() {
        let page = normalize(json!({
            "results": [{"id": 1}],
            "count": 45,
            "next": "http://api/x?page=2",
        }))
        .unwrap();
        assert_eq!(ids(&page), vec!["1"]);
        assert_eq!(page.total, 45);

        let page = normalize(json!({"results": [{"id": 1}], "total": 9})).unwrap();
        assert_eq!(page.total, 9);
    }

    #[test]
    fn test_data_envelope_without_total() {
        let page = normalize(json!({"data": [{"_id": "a"}, {"_id": "b"}]})).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_non_objects_are_skipped() {
        let page = normalize(json!([{"id": 1}, 7, "x", null])).unwrap();
        assert_eq!(ids(&page), vec!["1"]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_total_never_below_items() {
        let page = normalize(json!({"results": [{"id": 1}, {"id": 2}], "count": 1})).unwrap();
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_unknown_shapes_are_decode_errors() {
        assert!(matches!(
            normalize(json!({"detail": "nope"})),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(normalize(json!("x")), Err(ApiError::Decode(_))));
        assert_eq!(normalize(Value::Null).unwrap().total, 0);
    }
}
