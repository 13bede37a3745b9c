//! Credentials passed explicitly to the API client.
//!
//! An [`AuthContext`] is a cheap, cloneable handle. Clones share the same
//! tokens, so a refresh performed by one request is seen by every other
//! request made with the same context.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Access and refresh tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token sent with every request.
    pub access: Option<String>,
    /// Token exchanged for a new access token on 401.
    pub refresh: Option<String>,
}

/// Body of a token refresh request.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh: String,
}

/// Body of a token refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    /// The new access token.
    pub access: String,
}

/// Shared credential handle.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    inner: Arc<RwLock<Credentials>>,
}

impl AuthContext {
    /// Creates an anonymous context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with an access token only.
    #[must_use]
    pub fn with_token(access: impl Into<String>) -> Self {
        Self::from_credentials(Credentials {
            access: Some(access.into()),
            refresh: None,
        })
    }

    /// Creates a context with access and refresh tokens.
    #[must_use]
    pub fn with_tokens(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self::from_credentials(Credentials {
            access: Some(access.into()),
            refresh: Some(refresh.into()),
        })
    }

    /// Creates a context from credentials. Empty tokens are treated as absent.
    #[must_use]
    pub fn from_credentials(credentials: Credentials) -> Self {
        let credentials = Credentials {
            access: credentials.access.filter(|t| !t.is_empty()),
            refresh: credentials.refresh.filter(|t| !t.is_empty()),
        };
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    /// Returns a copy of the current credentials.
    #[must_use]
    pub fn snapshot(&self) -> Credentials {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.snapshot().access
    }

    /// Returns the refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.snapshot().refresh
    }

    /// Returns the `Authorization` header value, if a token is present.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.access_token().map(|token| format!("Bearer {token}"))
    }

    /// Returns whether an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Replaces the access token, keeping the refresh token.
    pub fn set_access(&self, access: impl Into<String>) {
        let access = access.into();
        let mut credentials = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        credentials.access = Some(access).filter(|t| !t.is_empty());
    }

    /// Forgets every token.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Credentials::default();
    }
}
