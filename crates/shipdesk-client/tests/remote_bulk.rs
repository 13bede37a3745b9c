mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{client, id, orders, orders_backend, orders_list, selected_ids, visible_ids};
use serde_json::json;
use shipdesk_client::{ApiResponse, Level, Method, MockTransport, RemoteList, Resource};

#[tokio::test]
async fn test_partial_delete_keeps_failed_record_selected() {
    let mut list = orders_list(orders_backend(5, &[2]));
    list.load().await.unwrap();
    assert_eq!(visible_ids(&list), vec!["1", "2", "3", "4", "5"]);

    for i in ["1", "2", "3"] {
        list.controller_mut().toggle_selected(&id(i));
    }
    let report = list.bulk_delete().await.unwrap();

    assert_eq!(report.summary(), "2 of 3 deleted");
    assert!(report.is_partial());
    assert_eq!(report.failed_ids(), vec![id("2")]);

    assert_eq!(visible_ids(&list), vec!["2", "4", "5"]);
    assert_eq!(selected_ids(&list), vec!["2"]);
    assert_eq!(list.controller().total_items(), 3);

    let deletes = list
        .client()
        .transport()
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Delete)
        .count();
    assert_eq!(deletes, 3);

    let notices = list.notifier().active();
    assert!(notices
        .iter()
        .any(|n| n.level == Level::Warning && n.message == "2 of 3 deleted"));
    assert!(notices.iter().any(|n| n.level == Level::Error));
}

#[tokio::test]
async fn test_complete_delete_posts_success() {
    let mut list = orders_list(orders_backend(4, &[]));
    list.load().await.unwrap();
    list.controller_mut().select_all_filtered();

    let report = list.bulk_delete().await.unwrap();

    assert_eq!(report.summary(), "4 of 4 deleted");
    assert!(report.is_complete());
    assert!(visible_ids(&list).is_empty());
    assert!(list.controller().selected_ids().is_empty());
    assert_eq!(list.controller().total_pages(), 1);
    assert_eq!(list.notifier().active()[0].level, Level::Success);
}

#[tokio::test]
async fn test_failed_delete_of_every_record_posts_error() {
    let mut list = orders_list(orders_backend(3, &[1, 2]));
    list.load().await.unwrap();
    list.controller_mut().toggle_selected(&id("1"));
    list.controller_mut().toggle_selected(&id("2"));

    let report = list.bulk_delete().await.unwrap();

    assert_eq!(report.summary(), "0 of 2 deleted");
    assert!(!report.is_partial());
    assert_eq!(visible_ids(&list), vec!["1", "2", "3"]);
    assert_eq!(selected_ids(&list), vec!["1", "2"]);

    // one notice per distinct failure plus the summary
    let notices = list.notifier().active();
    assert_eq!(notices.len(), 2);
    assert!(notices
        .iter()
        .any(|n| n.level == Level::Error && n.message == "0 of 2 deleted"));
}

#[tokio::test]
async fn test_status_update_keeps_records() {
    let mock = MockTransport::new()
        .json(Method::Get, common::ORDERS_PATH, 200, orders(3))
        .route_fn(Method::Put, common::ORDER_DETAIL_PATH, |req| {
            if req.path.ends_with("/3/") {
                Ok(ApiResponse::json(400, &json!({"status": ["Invalid transition."]})))
            } else {
                Ok(ApiResponse::json(200, req.body.as_ref().unwrap_or(&json!({}))))
            }
        });
    let mut list = orders_list(mock);
    list.load().await.unwrap();
    list.controller_mut().select_all_filtered();

    let report = list.bulk_update_status("delivered").await.unwrap();

    assert_eq!(report.summary(), "2 of 3 updated");
    assert_eq!(report.failed[0].reason, "status: Invalid transition.");
    assert_eq!(visible_ids(&list), vec!["1", "2", "3"]);
    assert_eq!(selected_ids(&list), vec!["3"]);

    let puts: Vec<_> = list
        .client()
        .transport()
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Put)
        .collect();
    assert_eq!(puts.len(), 3);
    assert_eq!(puts[0].body, Some(json!({"status": "delivered"})));
}

#[tokio::test]
async fn test_failed_refill_still_returns_report() {
    // the first page loads; every later fetch fails
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mock = MockTransport::new()
        .route_fn(Method::Get, common::MARKS_PATH, move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                let body = json!({"results": [{"_id": 1}, {"_id": 2}], "count": 2});
                Ok(ApiResponse::json(200, &body))
            } else {
                Ok(ApiResponse::json(503, &json!({"detail": "upstream timeout"})))
            }
        })
        .route(Method::Delete, common::MARKS_PATH, ApiResponse::no_content());
    let mut list = RemoteList::new(client(mock), Resource::SHIPPING_MARKS);
    list.load().await.unwrap();
    list.controller_mut().toggle_selected(&id("1"));

    let report = list.bulk_delete().await.unwrap();

    assert_eq!(report.summary(), "1 of 1 deleted");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        list.controller().state().error_message(),
        Some("Something went wrong. Please try again.")
    );
    let notices = list.notifier().active();
    assert!(notices.iter().any(|n| n.level == Level::Success));
    assert!(notices.iter().any(|n| n.level == Level::Error));
}
