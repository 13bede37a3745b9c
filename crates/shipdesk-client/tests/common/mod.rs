#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use shipdesk_client::{
    ApiClient, ApiError, ApiResponse, AuthContext, Method, MockTransport, RemoteList, Resource,
};
use shipdesk_list::RecordId;

pub const ORDERS_PATH: &str = "/buysellapi/admin/orders/";
pub const ORDER_DETAIL_PATH: &str = "/buysellapi/orders/";
pub const MARKS_PATH: &str = "/buysellapi/shipping-marks/";

/// `n` orders with ids `1..=n`, newest first.
pub fn orders(n: u64) -> Value {
    let items: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "id": i,
                "customer_name": format!("Customer {i}"),
                "status": if i % 2 == 0 { "shipped" } else { "pending" },
                "total_amount": 100 * i,
                "created_at": format!("2024-05-{:02}T09:00:00Z", 28 - i),
            })
        })
        .collect();
    Value::Array(items)
}

/// Backend serving `n` orders whose DELETE fails for the given ids.
pub fn orders_backend(n: u64, failing: &'static [u64]) -> MockTransport {
    MockTransport::new()
        .json(Method::Get, ORDERS_PATH, 200, orders(n))
        .route_fn(Method::Delete, ORDER_DETAIL_PATH, move |req| {
            if failing.iter().any(|id| req.path.ends_with(&format!("/{id}/"))) {
                Ok(ApiResponse::json(500, &json!({"detail": "database is locked"})))
            } else {
                Ok(ApiResponse::no_content())
            }
        })
}

/// Backend whose every response takes `delay`.
pub fn slow_orders_backend(n: u64, delay: Duration) -> MockTransport {
    MockTransport::new()
        .json(Method::Get, ORDERS_PATH, 200, orders(n))
        .delay(delay)
}

pub fn client(mock: MockTransport) -> ApiClient<MockTransport> {
    ApiClient::new(mock, AuthContext::with_token("access-1"))
}

pub fn orders_list(mock: MockTransport) -> RemoteList<MockTransport> {
    RemoteList::new(client(mock), Resource::ORDERS)
}

/// Ids of the records on the current page.
pub fn visible_ids(list: &RemoteList<MockTransport>) -> Vec<String> {
    list.controller()
        .visible()
        .iter()
        .map(|r| r.text("id").into_owned())
        .collect()
}

pub fn selected_ids(list: &RemoteList<MockTransport>) -> Vec<String> {
    let mut ids: Vec<String> = list
        .controller()
        .selected_ids()
        .iter()
        .map(|id| id.as_str().to_string())
        .collect();
    ids.sort();
    ids
}

pub fn id(value: &str) -> RecordId {
    RecordId::from(value)
}

pub fn server_error() -> ApiError {
    ApiError::Server {
        status: 500,
        message: "boom".to_string(),
    }
}
