//! Access tokens for outgoing requests
//!
//! Acquiring credentials (service account files, OAuth flows, environment
//! lookups) happens outside this crate. The transport only asks an
//! [`AccessTokenProvider`] for a bearer token before every attempt, so a
//! provider that refreshes tokens is picked up by retries.

use async_trait::async_trait;
use feedlink_domain::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    ///
    /// This method should handle token refresh if needed.
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// A fixed, already issued token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::Config("access token is empty".to_string()));
        }
        Ok(self.token.clone())
    }
}
