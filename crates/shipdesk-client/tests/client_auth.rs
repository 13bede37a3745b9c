mod common;

use serde_json::json;
use shipdesk_client::{
    ApiClient, ApiError, ApiResponse, AuthContext, Method, MockTransport, Resource,
    DEFAULT_REFRESH_PATH,
};

const USERS_PATH: &str = "/buysellapi/users/";

/// Users endpoint that only accepts the `fresh` token.
fn users_backend() -> MockTransport {
    MockTransport::new().route_fn(Method::Get, USERS_PATH, |req| {
        if req.get_header("Authorization") == Some("Bearer fresh") {
            Ok(ApiResponse::json(200, &json!([{"id": 1, "username": "ama"}])))
        } else {
            Ok(ApiResponse::json(
                401,
                &json!({"detail": "Given token not valid for any token type"}),
            ))
        }
    })
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once() {
    let mock = users_backend().json(Method::Post, DEFAULT_REFRESH_PATH, 200, json!({"access": "fresh"}));
    let auth = AuthContext::with_tokens("stale", "r1");
    let client = ApiClient::new(mock, auth.clone());

    let page = client.list_all(&Resource::USERS).await.unwrap();
    assert_eq!(page.items.len(), 1);

    // the caller's handle sees the new token
    assert_eq!(auth.access_token().as_deref(), Some("fresh"));
    assert_eq!(auth.refresh_token().as_deref(), Some("r1"));

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].body, Some(json!({"refresh": "r1"})));
    assert_eq!(requests[2].get_header("authorization"), Some("Bearer fresh"));
}

#[tokio::test]
async fn test_rejected_refresh_clears_credentials() {
    let mock = users_backend().json(
        Method::Post,
        DEFAULT_REFRESH_PATH,
        401,
        json!({"detail": "Token is invalid or expired"}),
    );
    let auth = AuthContext::with_tokens("stale", "r1");
    let client = ApiClient::new(mock, auth.clone());

    let err = client.list_all(&Resource::USERS).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { status: 401, .. }));
    assert!(err.is_auth());
    assert!(!auth.is_authenticated());
    assert_eq!(auth.refresh_token(), None);
    assert_eq!(client.transport().request_count(), 2);
}

#[tokio::test]
async fn test_no_refresh_without_refresh_token() {
    let client = ApiClient::new(users_backend(), AuthContext::with_token("stale"));

    let err = client.list_all(&Resource::USERS).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(client.transport().request_count(), 1);
    // the access token is kept; only a failed refresh clears it
    assert!(client.auth().is_authenticated());
}

#[tokio::test]
async fn test_retry_is_not_repeated() {
    // refresh succeeds but the new token is rejected as well
    let mock = users_backend().json(Method::Post, DEFAULT_REFRESH_PATH, 200, json!({"access": "newer"}));
    let client = ApiClient::new(mock, AuthContext::with_tokens("stale", "r1"));

    let err = client.list_all(&Resource::USERS).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(client.transport().request_count(), 3);
}

#[tokio::test]
async fn test_forbidden_does_not_refresh() {
    let mock = MockTransport::new().json(
        Method::Get,
        USERS_PATH,
        403,
        json!({"detail": "You do not have permission to perform this action."}),
    );
    let client = ApiClient::new(mock, AuthContext::with_tokens("a", "r"));

    let err = client.list_all(&Resource::USERS).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { status: 403, .. }));
    assert_eq!(err.user_message(), "You do not have permission to do that.");
    assert_eq!(client.transport().request_count(), 1);
}
