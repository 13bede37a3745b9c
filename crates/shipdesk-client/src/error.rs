//! Error types for API calls.

use std::collections::BTreeMap;

use serde_json::Value;
use shipdesk_list::ListError;
use thiserror::Error;

/// Coarse category of an [`ApiError`], used to decide how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or transport failure, including timeouts.
    Network,
    /// Missing or rejected credentials (401/403).
    Auth,
    /// Request rejected with field-level messages (400).
    Validation,
    /// Resource does not exist (404).
    NotFound,
    /// Server-side or otherwise unexpected failure.
    Server,
    /// The operation was cancelled before it completed.
    Cancelled,
}

/// API client errors.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Credentials missing, expired or insufficient.
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The request failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server failed (5xx).
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A status outside the handled ranges.
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request path is empty or malformed.
    #[error("invalid request path: {0}")]
    InvalidPath(String),

    /// The operation was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// A local list state change was rejected.
    #[error(transparent)]
    List(#[from] ListError),
}

impl ApiError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Timeout(_) | Self::InvalidPath(_) => ErrorKind::Network,
            Self::Unauthorized { .. } => ErrorKind::Auth,
            Self::Validation(_) | Self::List(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Server { .. } | Self::UnexpectedStatus { .. } | Self::Decode(_) => {
                ErrorKind::Server
            }
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Returns whether the caller should re-authenticate.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Returns the message shown to the user.
    ///
    /// Server and decoding details stay in the logs; the user gets a generic
    /// message for those.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Cannot reach the server. Check your connection.".to_string(),
            Self::Timeout(_) => "The server took too long to respond.".to_string(),
            Self::Unauthorized { status: 403, .. } => {
                "You do not have permission to do that.".to_string()
            }
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".to_string(),
            Self::Validation(errors) => errors
                .first_message()
                .unwrap_or_else(|| "Please check the form for errors.".to_string()),
            Self::NotFound(message) => message.clone(),
            Self::Server { .. } | Self::UnexpectedStatus { .. } | Self::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::InvalidPath(_) => "Invalid request.".to_string(),
            Self::Cancelled => "Cancelled.".to_string(),
            Self::List(e) => e.to_string(),
        }
    }
}

/// Collection of validation errors by field.
///
/// Messages that are not tied to a field are kept under
/// [`ValidationErrors::NON_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Errors keyed by field name.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Key for messages that apply to the whole request.
    pub const NON_FIELD: &'static str = "non_field_errors";

    /// Creates an empty set of validation errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds field errors from a 400 response body.
    ///
    /// Accepts `{"field": ["msg", ...]}`, `{"field": "msg"}` and
    /// `{"error": "msg"}` / `{"detail": "msg"}` bodies. A plain string body
    /// becomes a non-field message.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let mut errors = Self::new();
        match body {
            Value::Object(map) => {
                for (field, value) in map {
                    let field = match field.as_str() {
                        "error" | "detail" | "message" => Self::NON_FIELD,
                        other => other,
                    };
                    match value {
                        Value::String(s) => errors.add(field, s.clone()),
                        Value::Array(items) => {
                            for item in items {
                                let message = item.as_str().map_or_else(|| item.to_string(), str::to_string);
                                errors.add(field, message);
                            }
                        }
                        Value::Null => {}
                        other => errors.add(field, other.to_string()),
                    }
                }
            }
            Value::String(s) if !s.is_empty() => errors.add(Self::NON_FIELD, s.clone()),
            _ => {}
        }
        errors
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns whether there are any errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// Returns all errors as a flat list.
    #[must_use]
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| (field.as_str(), msg.as_str()))
            })
            .collect()
    }

    /// Returns the first message, prefixed with its field unless it is a
    /// non-field message.
    #[must_use]
    pub fn first_message(&self) -> Option<String> {
        if let Some(message) = self.get(Self::NON_FIELD).and_then(|m| m.first()) {
            return Some(message.clone());
        }
        self.all_errors()
            .first()
            .map(|(field, message)| format!("{field}: {message}"))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .all_errors()
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
