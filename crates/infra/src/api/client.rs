//! API client facade
//!
//! [`ApiClient`] ties the pieces together: every remote operation first takes
//! a token from its own rate limiter bucket, then goes through the resilient
//! [`HttpTransport`]. The per-resource operations live in sibling modules as
//! further `impl ApiClient` blocks.

use std::sync::Arc;
use std::time::Duration;

use feedlink_common::resilience::{BackoffStrategy, RateLimiterBank, TokenBucketConfig};
use feedlink_domain::{ApiError, ClientSettings, Region, RetryMode};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::auth::AccessTokenProvider;
use super::endpoints::{BasePaths, Operation};
use crate::errors::InfraError;
use crate::http::HttpTransport;

/// Rate-limited, retrying client for the feed-management API
#[derive(Clone)]
pub struct ApiClient {
    transport: HttpTransport,
    limiters: Arc<RateLimiterBank<Operation>>,
    paths: BasePaths,
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Base URLs this client talks to
    pub fn base_paths(&self) -> &BasePaths {
        &self.paths
    }

    /// Total attempts per request, initial try included
    pub fn max_attempts(&self) -> u32 {
        self.transport.max_attempts()
    }

    /// Wait for the operation's bucket, then send through the transport.
    pub(crate) async fn call(
        &self,
        operation: Operation,
        method: Method,
        url: &str,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ApiError> {
        self.limiters
            .acquire(&operation, cancel)
            .await
            .map_err(|err| ApiError::from(InfraError::from(err)))?;

        debug!(operation = %operation, "dispatching request");
        self.transport.send(method, url, body, cancel).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("transport", &self.transport)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

/// Decode a response body, mapping failures to [`ApiError::Decode`].
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::Decode(format!("failed to parse response: {e}")))
}

/// Encode a request body, mapping failures to [`ApiError::Decode`].
pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::Decode(format!("failed to encode request body: {e}")))
}

/// Builder for [`ApiClient`]
///
/// Starts from [`ClientSettings::default`]; individual setters override
/// single fields of whatever settings are in place when they are called.
#[derive(Default)]
pub struct ApiClientBuilder {
    settings: ClientSettings,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    base_url: Option<String>,
}

impl ApiClientBuilder {
    /// Replace all settings at once
    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.settings.region = region;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.settings.user_agent = agent.into();
        self
    }

    /// Total attempts per request; zero is rejected by [`build`](Self::build)
    pub fn request_attempts(mut self, attempts: u32) -> Self {
        self.settings.request_attempts = attempts;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout_secs = timeout.as_secs();
        self
    }

    pub fn retry_mode(mut self, mode: RetryMode) -> Self {
        self.settings.retry_mode = mode;
        self
    }

    pub fn backoff(mut self, initial_delay: Duration, max_delay: Duration) -> Self {
        self.settings.backoff.initial_delay_ms = duration_millis(initial_delay);
        self.settings.backoff.max_delay_ms = duration_millis(max_delay);
        self
    }

    /// Tokens per operation bucket and the refill period of one token
    pub fn rate_limit(mut self, burst: u64, refill_interval: Duration) -> Self {
        self.settings.rate_limit.burst = burst;
        self.settings.rate_limit.refill_interval_ms = duration_millis(refill_interval);
        self
    }

    /// Root every resource family at `base_url` instead of the regional host.
    ///
    /// Per-family overrides in the settings still win.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] for invalid settings or a missing token
    /// provider. Nothing touches the network.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let settings = self.settings;
        settings.validate()?;

        let auth =
            self.auth.ok_or_else(|| ApiError::Config("access token provider not set".into()))?;

        let backoff = BackoffStrategy::Exponential {
            initial_delay: Duration::from_millis(settings.backoff.initial_delay_ms),
            base: 2.0,
            max_delay: Duration::from_millis(settings.backoff.max_delay_ms),
        };

        let transport = HttpTransport::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .max_attempts(settings.request_attempts)
            .backoff(backoff)
            .retry_mode(settings.retry_mode)
            .user_agent(settings.user_agent.clone())
            .auth(auth)
            .build()?;

        let bucket = TokenBucketConfig {
            capacity: settings.rate_limit.burst,
            refill_amount: 1,
            refill_interval: Duration::from_millis(settings.rate_limit.refill_interval_ms),
        };
        let limiters = RateLimiterBank::new(Operation::ALL.iter().copied(), &bucket)
            .map_err(|err| ApiError::from(InfraError::from(err)))?;

        let paths = match self.base_url {
            Some(base_url) => BasePaths::rooted_at(&base_url),
            None => BasePaths::for_region(settings.region),
        }
        .with_overrides(&settings.base_paths);

        info!(
            region = %settings.region,
            attempts = settings.request_attempts,
            retry_mode = %settings.retry_mode,
            feeds = %paths.feeds,
            "API client configured"
        );

        Ok(ApiClient { transport, limiters: Arc::new(limiters), paths })
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use feedlink_domain::BasePathOverrides;

    use super::*;
    use crate::api::auth::StaticTokenProvider;

    fn auth() -> Arc<dyn AccessTokenProvider> {
        Arc::new(StaticTokenProvider::new("test-token"))
    }

    #[test]
    fn test_defaults_target_us_region() {
        let client = ApiClient::builder().auth(auth()).build().unwrap();

        assert_eq!(client.max_attempts(), 5);
        assert_eq!(client.base_paths().feeds, "https://backstory.googleapis.com/v1/feeds");
    }

    #[test]
    fn test_zero_attempts_rejected_before_network() {
        let result = ApiClient::builder().auth(auth()).request_attempts(0).build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_missing_auth_rejected() {
        assert!(matches!(ApiClient::builder().build(), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_inverted_backoff_rejected() {
        let result = ApiClient::builder()
            .auth(auth())
            .backoff(Duration::from_secs(10), Duration::from_secs(1))
            .build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_base_url_then_family_override() {
        let settings = ClientSettings {
            base_paths: BasePathOverrides {
                rules: Some("http://rules.local/v2/detect/rules".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let client = ApiClient::builder()
            .settings(settings)
            .base_url("http://127.0.0.1:8080/")
            .auth(auth())
            .build()
            .unwrap();

        assert_eq!(client.base_paths().feeds, "http://127.0.0.1:8080/v1/feeds");
        assert_eq!(client.base_paths().rules, "http://rules.local/v2/detect/rules");
    }

    #[test]
    fn test_setter_after_settings_wins() {
        let client = ApiClient::builder()
            .settings(ClientSettings { request_attempts: 2, ..Default::default() })
            .request_attempts(7)
            .region(Region::AsiaSoutheast1)
            .auth(auth())
            .build()
            .unwrap();

        assert_eq!(client.max_attempts(), 7);
        assert!(client.base_paths().subjects.starts_with("https://asia-southeast1-backstory."));
    }
}
