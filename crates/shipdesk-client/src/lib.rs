//! # shipdesk-client
//!
//! REST client for the shipdesk admin API.
//!
//! This crate provides:
//! - Request and response messages with a pluggable [`Transport`]
//! - A hyper-based transport and an in-memory mock for tests
//! - Normalization of the list response shapes the API returns
//! - An error taxonomy with user-facing messages
//! - An explicit credential context with one-shot token refresh
//! - Cancellation scopes for work bound to a view
//! - [`RemoteList`], a list view controller fed by a resource
//!
//! ## Quick Start
//!
//! ```ignore
//! use shipdesk_client::{ApiClient, AuthContext, ClientConfig, HyperTransport, RemoteList, Resource};
//!
//! let config = ClientConfig::from_env();
//! let transport = HyperTransport::new(&config);
//! let client = ApiClient::with_config(transport, AuthContext::with_token(token), config);
//!
//! let mut orders = RemoteList::new(client, Resource::ORDERS);
//! orders.load().await?;
//! orders.search("kofi").await?;
//!
//! for id in ["3", "7", "9"] {
//!     orders.controller_mut().toggle_selected(&id.into());
//! }
//! let report = orders.bulk_delete().await?;
//! println!("{}", report.summary()); // "2 of 3 deleted"
//! ```
//!
//! ## Response Shapes
//!
//! List endpoints answer with a bare array, `{"results": [...], "count": n}`
//! or `{"data": [...], "total": n}`. [`normalize`] turns all of them into a
//! [`shipdesk_list::Page`].
//!
//! ## Errors
//!
//! Non-2xx responses become [`ApiError`] variants by status: 400 is
//! `Validation` with field-level messages, 401/403 `Unauthorized`, 404
//! `NotFound`, 5xx `Server`. A 401 triggers one token refresh and one retry.

pub mod auth;
pub mod cancel;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod invoice;
pub mod notify;
pub mod remote;
pub mod request;
pub mod resources;
pub mod response;
pub mod transport;

// Re-export main types
pub use auth::{AuthContext, Credentials};
pub use cancel::CancelScope;
pub use client::{check_status, invoice_path, ApiClient};
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_REFRESH_PATH};
pub use envelope::normalize;
pub use error::{ApiError, ErrorKind, Result, ValidationErrors};
pub use invoice::{InvoiceDraft, InvoiceTotals, ShippingMethod, DEFAULT_SERVICE_FEE_PERCENT};
pub use notify::{Level, Notice, Notifier};
pub use remote::RemoteList;
pub use request::{ApiRequest, Method};
pub use resources::{Resource, StatusRoute};
pub use response::ApiResponse;
pub use transport::{BoxFuture, HyperTransport, MockTransport, Transport};
