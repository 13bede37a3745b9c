//! The API client.
//!
//! [`ApiClient`] sends requests over a [`Transport`], attaches the bearer
//! token from its [`AuthContext`], refreshes the token once on a 401 and
//! turns every non-2xx status into an [`ApiError`].

use serde_json::Value;
use tracing::{debug, info, warn};

use shipdesk_list::{ListQuery, Page, Record, RecordId};

use crate::auth::{AuthContext, RefreshRequest, RefreshResponse};
use crate::config::ClientConfig;
use crate::envelope::normalize;
use crate::error::{ApiError, Result, ValidationErrors};
use crate::invoice::InvoiceDraft;
use crate::request::ApiRequest;
use crate::resources::Resource;
use crate::response::ApiResponse;
use crate::transport::Transport;

/// Path of the Buy4me invoice endpoint for `request_id`.
#[must_use]
pub fn invoice_path(request_id: &RecordId) -> String {
    format!("/buysellapi/admin/buy4me-requests/{request_id}/invoice/")
}

/// Maps a response status onto the error taxonomy.
///
/// # Errors
///
/// Returns the error matching any non-2xx status.
pub fn check_status(response: ApiResponse) -> Result<ApiResponse> {
    let status = response.status;
    if response.is_success() {
        return Ok(response);
    }
    let message = response.error_message();
    Err(match status {
        400 | 422 => {
            let mut errors = response
                .json_value()
                .map(|v| ValidationErrors::from_body(&v))
                .unwrap_or_default();
            if errors.is_empty() {
                errors.add(
                    ValidationErrors::NON_FIELD,
                    message.unwrap_or_else(|| "Bad request".to_string()),
                );
            }
            ApiError::Validation(errors)
        }
        401 | 403 => ApiError::Unauthorized {
            status,
            message: message.unwrap_or_else(|| "Authentication required".to_string()),
        },
        404 => ApiError::NotFound(message.unwrap_or_else(|| "Not found.".to_string())),
        500..=599 => ApiError::Server {
            status,
            message: message.unwrap_or_default(),
        },
        _ => ApiError::UnexpectedStatus {
            status,
            message: message.unwrap_or_default(),
        },
    })
}

/// Client for the shipdesk REST API.
pub struct ApiClient<T> {
    transport: T,
    auth: AuthContext,
    config: ClientConfig,
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client with the default configuration.
    #[must_use]
    pub fn new(transport: T, auth: AuthContext) -> Self {
        Self::with_config(transport, auth, ClientConfig::default())
    }

    /// Creates a client.
    #[must_use]
    pub fn with_config(transport: T, auth: AuthContext, config: ClientConfig) -> Self {
        Self {
            transport,
            auth,
            config,
        }
    }

    /// Returns the credentials this client sends.
    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a request, refreshing the access token once on 401.
    ///
    /// Non-2xx statuses become errors.
    ///
    /// # Errors
    ///
    /// Returns transport failures and status errors.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.send_once(request.clone()).await?;
        if response.status != 401 || !self.refresh_access().await {
            return check_status(response);
        }
        check_status(self.send_once(request).await?)
    }

    async fn send_once(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        if let Some(bearer) = self.auth.bearer() {
            request.set_header("Authorization", bearer);
        }
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "api request");
        let response = self.transport.send(request).await;
        match response {
            Ok(ref res) => debug!(%method, %path, status = res.status, "api response"),
            Err(ref e) => warn!(%method, %path, error = %e, "api request failed"),
        }
        response
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Any failure clears the credentials.
    async fn refresh_access(&self) -> bool {
        let Some(refresh) = self.auth.refresh_token() else {
            return false;
        };
        warn!("access token rejected, refreshing");

        let Ok(body) = serde_json::to_value(RefreshRequest { refresh }) else {
            return false;
        };
        let request = ApiRequest::post(self.config.refresh_path.as_str()).json(body);
        let refreshed = match self.transport.send(request).await {
            Ok(res) if res.is_success() => res.parse::<RefreshResponse>().ok(),
            Ok(res) => {
                warn!(status = res.status, "token refresh rejected");
                None
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                None
            }
        };

        match refreshed {
            Some(RefreshResponse { access }) if !access.is_empty() => {
                info!("access token refreshed");
                self.auth.set_access(access);
                true
            }
            _ => {
                self.auth.clear();
                false
            }
        }
    }

    /// GETs a path and returns the JSON body.
    ///
    /// # Errors
    ///
    /// Fails like [`send`](Self::send), or with [`ApiError::Decode`] on a
    /// body that is not JSON.
    pub async fn get_json(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
        let request = ApiRequest::get(path).query_pairs(query);
        self.send(request).await?.json_value()
    }

    /// Lists a resource with list parameters.
    ///
    /// # Errors
    ///
    /// Fails like [`get_json`](Self::get_json), or when the body is no
    /// known list shape.
    pub async fn list(&self, resource: &Resource, query: &ListQuery) -> Result<Page<Record>> {
        let pairs = query.to_query_pairs(resource.query_style);
        let value = self.get_json(resource.list_path, pairs).await?;
        normalize(value)
    }

    /// Lists a whole resource without parameters.
    ///
    /// # Errors
    ///
    /// Fails like [`list`](Self::list).
    pub async fn list_all(&self, resource: &Resource) -> Result<Page<Record>> {
        let value = self.get_json(resource.list_path, Vec::new()).await?;
        normalize(value)
    }

    /// Retrieves one record.
    ///
    /// # Errors
    ///
    /// Fails like [`get_json`](Self::get_json), or when the body is not
    /// an object.
    pub async fn retrieve(&self, resource: &Resource, id: &RecordId) -> Result<Record> {
        let value = self.get_json(&resource.detail_path(id), Vec::new()).await?;
        Record::from_value(value)
            .ok_or_else(|| ApiError::Decode(format!("{} {id} is not an object", resource.name)))
    }

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with the field errors on 400.
    pub async fn create(&self, resource: &Resource, body: Value) -> Result<Value> {
        let request = ApiRequest::post(resource.list_path).json(body);
        self.send(request).await?.json_value()
    }

    /// Replaces a record.
    ///
    /// # Errors
    ///
    /// Fails like [`create`](Self::create).
    pub async fn update(&self, resource: &Resource, id: &RecordId, body: Value) -> Result<Value> {
        let request = ApiRequest::put(resource.detail_path(id)).json(body);
        self.send(request).await?.json_value()
    }

    /// Partially updates a record.
    ///
    /// # Errors
    ///
    /// Fails like [`create`](Self::create).
    pub async fn patch(&self, resource: &Resource, id: &RecordId, body: Value) -> Result<Value> {
        let request = ApiRequest::patch(resource.detail_path(id)).json(body);
        self.send(request).await?.json_value()
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Fails like [`send`](Self::send).
    pub async fn delete(&self, resource: &Resource, id: &RecordId) -> Result<()> {
        self.send(ApiRequest::delete(resource.detail_path(id)))
            .await
            .map(|_| ())
    }

    /// Sets the status of a record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPath`] when the resource has no status
    /// endpoint.
    pub async fn update_status(
        &self,
        resource: &Resource,
        id: &RecordId,
        status: &str,
    ) -> Result<Value> {
        let request = resource.status_request(id, status).ok_or_else(|| {
            ApiError::InvalidPath(format!("{} has no status endpoint", resource.name))
        })?;
        self.send(request).await?.json_value()
    }

    /// Issues the invoice of a Buy4me request.
    ///
    /// The draft is validated locally first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an invalid draft, before any
    /// request is sent.
    pub async fn create_invoice(&self, request_id: &RecordId, draft: &InvoiceDraft) -> Result<Value> {
        draft.validate().map_err(ApiError::Validation)?;
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = ApiRequest::post(invoice_path(request_id)).json(body);
        self.send(request).await?.json_value()
    }
}
