mod common;

use common::{filtered_ids, marks, marks_config, marks_list, record, visible_ids};
use serde_json::json;
use shipdesk_list::{
    matches_search, sort_records, ChoicesFilter, FieldKind, ListConfig, ListController, Record,
    SearchTerm, SortDirection,
};

fn contacts() -> Vec<Record> {
    vec![
        record(json!({"id": 1, "name": "Ama Mensah", "phone": "233-0554443322"})),
        record(json!({"id": 2, "name": "Kofi Boateng", "phone": "020-1234567"})),
    ]
}

#[test]
fn test_phone_search_scenario() {
    let mut list = ListController::with_records(marks_config(), contacts());
    list.set_search("233-");
    assert_eq!(filtered_ids(&list), vec!["1"]);
}

#[test]
fn test_empty_search_is_identity() {
    let mut list = marks_list(30);
    let all = filtered_ids(&list);
    list.set_search("customer 1");
    list.set_search("");
    assert_eq!(filtered_ids(&list), all);
}

#[test]
fn test_every_result_contains_term() {
    let config = marks_config();
    for term in ["ring", "SM-001", "accra", "7", "zzz"] {
        let mut list = ListController::with_records(config.clone(), marks(45));
        list.set_search(term);
        let folded = SearchTerm::new(term);
        for r in list.filtered() {
            assert!(matches_search(r, &folded, &config.search_fields));
            assert!(config
                .search_fields
                .iter()
                .any(|f| r.text(f).to_lowercase().contains(&term.to_lowercase())));
        }
    }
}

#[test]
fn test_missing_fields_never_match() {
    let records = vec![
        record(json!({"id": 1, "name": null})),
        record(json!({"id": 2})),
        record(json!({"id": 3, "name": "Esi"})),
    ];
    let mut list = ListController::with_records(marks_config(), records);
    list.set_search("e");
    assert_eq!(filtered_ids(&list), vec!["3"]);
}

#[test]
fn test_null_date_sorts_first() {
    let records = vec![
        record(json!({"id": "a", "createdAt": "2024-05-01T08:00:00Z"})),
        record(json!({"id": "b", "createdAt": null})),
        record(json!({"id": "c", "createdAt": "2023-12-24"})),
    ];
    let mut list = ListController::with_records(marks_config(), records);
    list.sort_by("createdAt").unwrap();
    assert_eq!(visible_ids(&list), vec!["b", "c", "a"]);
}

#[test]
fn test_sort_is_idempotent() {
    let mut records = marks(45);
    sort_records(&mut records, "createdAt", FieldKind::Date, SortDirection::Ascending);
    let once = records.clone();
    sort_records(&mut records, "createdAt", FieldKind::Date, SortDirection::Ascending);
    assert_eq!(records, once);
}

#[test]
fn test_flipped_direction_reverses_distinct_keys() {
    let mut asc = marks(30);
    let mut desc = asc.clone();
    sort_records(&mut asc, "markId", FieldKind::Text, SortDirection::Ascending);
    sort_records(&mut desc, "markId", FieldKind::Text, SortDirection::Descending);
    desc.reverse();
    assert_eq!(asc, desc);
}

#[test]
fn test_text_sort_ignores_case() {
    let records = vec![
        record(json!({"id": 1, "name": "bob"})),
        record(json!({"id": 2, "name": "Alice"})),
        record(json!({"id": 3, "name": "carol"})),
    ];
    let mut list = ListController::with_records(marks_config(), records);
    list.sort_by("name").unwrap();
    assert_eq!(visible_ids(&list), vec!["2", "1", "3"]);
    list.sort_by("name").unwrap();
    assert_eq!(visible_ids(&list), vec!["3", "1", "2"]);
}

#[test]
fn test_numeric_sort() {
    let config = ListConfig::new().sortable("price", FieldKind::Number);
    let records = vec![
        record(json!({"id": 1, "price": 100})),
        record(json!({"id": 2, "price": "9.5"})),
        record(json!({"id": 3, "price": 20})),
    ];
    let mut list = ListController::with_records(config, records);
    list.sort_by("price").unwrap();
    assert_eq!(visible_ids(&list), vec!["2", "3", "1"]);
}

#[test]
fn test_sort_keeps_selection_and_search() {
    let mut list = marks_list(45);
    list.set_search("customer 1");
    list.toggle_selected(&common::id("12"));
    list.sort_by("createdAt").unwrap();
    assert!(list.is_selected(&common::id("12")));
    assert_eq!(list.search(), "customer 1");
}

#[test]
fn test_status_filter_then_search() {
    let config = ListConfig::new()
        .search_fields(&["customer_name"])
        .filter(
            ChoicesFilter::new("status", "Status")
                .choice("pending", "Pending")
                .choice("delivered", "Delivered"),
        );
    let records = vec![
        record(json!({"id": 1, "customer_name": "Ama", "status": "pending"})),
        record(json!({"id": 2, "customer_name": "Abena", "status": "delivered"})),
        record(json!({"id": 3, "customer_name": "Kofi", "status": "pending"})),
    ];
    let mut list = ListController::with_records(config, records);

    list.set_filter("status", "pending").unwrap();
    assert_eq!(filtered_ids(&list), vec!["1", "3"]);

    list.set_search("a");
    assert_eq!(filtered_ids(&list), vec!["1"]);

    list.set_filter("status", "all").unwrap();
    assert_eq!(filtered_ids(&list), vec!["1", "2"]);
}

#[test]
fn test_unregistered_filter_uses_equality() {
    let records = vec![
        record(json!({"id": 1, "shipping_method": "sea"})),
        record(json!({"id": 2, "shipping_method": "air"})),
    ];
    let mut list = ListController::with_records(marks_config(), records);
    list.set_filter("shipping_method", "air").unwrap();
    assert_eq!(filtered_ids(&list), vec!["2"]);
}
