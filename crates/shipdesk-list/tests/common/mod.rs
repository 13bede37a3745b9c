#![allow(dead_code)]

use serde_json::{json, Value};
use shipdesk_list::{FieldKind, ListConfig, ListController, Record, RecordId};

/// Builds a record from a JSON object literal.
pub fn record(value: Value) -> Record {
    Record::from_value(value).unwrap_or_else(|| panic!("Expected a JSON object"))
}

/// The shipping-marks screen configuration.
pub fn marks_config() -> ListConfig {
    ListConfig::new()
        .list_display(&["markId", "name", "phone", "createdAt"])
        .search_fields(&["markId", "name", "phone", "fullAddress"])
        .sortable("markId", FieldKind::Text)
        .sortable("name", FieldKind::Text)
        .sortable("createdAt", FieldKind::Date)
        .list_per_page(20)
}

/// `n` shipping marks with ids `1..=n` and increasing creation dates.
pub fn marks(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| {
            record(json!({
                "id": i,
                "markId": format!("SM-{i:04}"),
                "name": format!("Customer {i}"),
                "phone": format!("020-{:07}", 1_000_000 + i),
                "fullAddress": format!("{i} Ring Road, Accra"),
                "createdAt": format!("2024-03-{:02}T10:00:00Z", (i % 28) + 1),
            }))
        })
        .collect()
}

/// A controller loaded with `n` shipping marks.
pub fn marks_list(n: usize) -> ListController {
    ListController::with_records(marks_config(), marks(n))
}

/// Ids of the records on the current page.
pub fn visible_ids(list: &ListController) -> Vec<String> {
    list.visible()
        .iter()
        .map(|r| r.text("id").into_owned())
        .collect()
}

/// Ids of every filtered record in display order.
pub fn filtered_ids(list: &ListController) -> Vec<String> {
    list.filtered_ids()
        .iter()
        .map(|id| id.as_str().to_string())
        .collect()
}

pub fn id(value: &str) -> RecordId {
    RecordId::from(value)
}
