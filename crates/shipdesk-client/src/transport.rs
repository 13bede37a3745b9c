//! Transports that carry [`ApiRequest`]s to the backend.
//!
//! [`HyperTransport`] talks HTTP/1 to a real server. [`MockTransport`] is an
//! in-memory stand-in with a route table, used for development and tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::request::{ApiRequest, Method};
use crate::response::ApiResponse;

/// A boxed future for async transport operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends a request and returns the raw response.
///
/// Transports do not interpret status codes; a 500 is still `Ok`. Only
/// failures to exchange a request at all are errors.
pub trait Transport: Send + Sync {
    /// Sends one request.
    fn send<'a>(&'a self, request: ApiRequest) -> BoxFuture<'a, Result<ApiResponse>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send<'a>(&'a self, request: ApiRequest) -> BoxFuture<'a, Result<ApiResponse>> {
        (**self).send(request)
    }
}

/// HTTP/1 transport over hyper.
///
/// TLS is not provided; point it at an `http://` base URL or a local proxy.
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl HyperTransport {
    /// Creates a transport from the client configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Resolves the absolute URL of a request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] for an empty path, or for a relative
    /// path when no base URL is configured.
    pub fn url_for(&self, request: &ApiRequest) -> Result<String> {
        let path = request
            .path_and_query()
            .ok_or_else(|| ApiError::InvalidPath("API path must be a non-empty string".into()))?;
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path);
        }
        if self.base_url.is_empty() {
            return Err(ApiError::InvalidPath(format!(
                "{path} is relative and no base URL is configured"
            )));
        }
        Ok(format!("{}{path}", self.base_url))
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        if url.starts_with("https://") {
            return Err(ApiError::Transport(format!(
                "{url}: https is not supported by the HTTP/1 transport"
            )));
        }
        let uri = url
            .parse::<hyper::Uri>()
            .map_err(|e| ApiError::InvalidPath(e.to_string()))?;

        let mut builder = hyper::Request::builder()
            .method(request.method.as_str())
            .uri(uri)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.user_agent.as_str());
        if request.body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let body = request
            .body
            .as_ref()
            .map_or_else(Bytes::new, |value| Bytes::from(value.to_string()));
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let req = builder
            .body(Full::new(body))
            .map_err(|e| ApiError::InvalidPath(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(req)
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| {
                    v.to_str()
                        .ok()
                        .map(|v| (k.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?
                .to_bytes();
            Ok::<_, ApiError>(ApiResponse {
                status,
                headers,
                body: body.to_vec(),
            })
        };

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ApiError::Timeout(timeout_ms))?
    }
}

impl Transport for HyperTransport {
    fn send<'a>(&'a self, request: ApiRequest) -> BoxFuture<'a, Result<ApiResponse>> {
        Box::pin(self.execute(request))
    }
}

type Handler = Arc<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

struct Route {
    method: Method,
    prefix: String,
    handler: Handler,
}

/// In-memory backend.
///
/// Routes match on method and path prefix; the longest matching prefix
/// wins, and among equal prefixes the last registered. Unknown routes
/// answer `200 {}`. Every request is logged.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    log: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Creates a mock with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `method prefix*` with a fixed response.
    #[must_use]
    pub fn route(self, method: Method, prefix: &str, response: ApiResponse) -> Self {
        self.route_fn(method, prefix, move |_| Ok(response.clone()))
    }

    /// Answers `method prefix*` with a JSON body.
    #[must_use]
    pub fn json(self, method: Method, prefix: &str, status: u16, body: impl Into<Value>) -> Self {
        let body: Value = body.into();
        self.route(method, prefix, ApiResponse::json(status, &body))
    }

    /// Answers `method prefix*` by calling `handler`.
    #[must_use]
    pub fn route_fn<F>(mut self, method: Method, prefix: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            prefix: prefix.to_string(),
            handler: Arc::new(handler),
        });
        self
    }

    /// Delays every response.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn respond(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let path = request
            .normalized_path()
            .ok_or_else(|| ApiError::InvalidPath("API path must be a non-empty string".into()))?;
        let route = self
            .routes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.method == request.method && path.starts_with(&r.prefix))
            .max_by_key(|(i, r)| (r.prefix.len(), *i))
            .map(|(_, r)| r);
        match route {
            Some(route) => (route.handler)(request),
            None => {
                debug!(method = %request.method, path = %path, "no mock route, answering {{}}");
                Ok(ApiResponse::json(200, &json!({})))
            }
        }
    }
}

impl Transport for MockTransport {
    fn send<'a>(&'a self, request: ApiRequest) -> BoxFuture<'a, Result<ApiResponse>> {
        Box::pin(async move {
            self.log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.respond(&request)
        })
    }
}
