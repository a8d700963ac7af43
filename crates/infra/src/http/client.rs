use std::sync::Arc;
use std::time::Duration;

use feedlink_common::resilience::{
    BackoffStrategy, RetryConfig, RetryDecision, RetryExecutor, RetryPolicy,
};
use feedlink_domain::{ApiError, RetryMode};
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

use super::normalizer::normalize_error;
use crate::api::auth::AccessTokenProvider;
use crate::errors::InfraError;

/// Longest server requested delay honored between attempts
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Decides which failed attempts are tried again.
///
/// In [`RetryMode::TransientOnly`] a `Retry-After` delay sent with the
/// failure replaces the computed backoff, capped at one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportRetryPolicy {
    mode: RetryMode,
}

impl TransportRetryPolicy {
    pub fn new(mode: RetryMode) -> Self {
        Self { mode }
    }
}

impl RetryPolicy<ApiError> for TransportRetryPolicy {
    fn should_retry(&self, error: &ApiError, _attempt: u32) -> RetryDecision {
        match self.mode {
            RetryMode::Blind if error.is_retryable() => RetryDecision::Retry,
            RetryMode::TransientOnly if error.is_transient() => match error.retry_after() {
                Some(delay) => RetryDecision::RetryAfter(delay.min(MAX_RETRY_AFTER)),
                None => RetryDecision::Retry,
            },
            _ => RetryDecision::Stop,
        }
    }
}

/// HTTP transport with built-in retry, backoff and error normalization.
///
/// Every request carries `alt=json`, a JSON content type, the configured
/// user agent and a bearer token fetched per attempt. A 204 yields an empty
/// body; any other 2xx yields the raw body bytes.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    auth: Arc<dyn AccessTokenProvider>,
    retry: RetryExecutor<TransportRetryPolicy>,
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Total attempts per request, initial try included.
    pub fn max_attempts(&self) -> u32 {
        self.retry.config().max_attempts
    }

    /// Send one logical request, retrying failed attempts.
    ///
    /// # Errors
    ///
    /// - the error of the last attempt once the attempt budget is spent
    /// - [`ApiError::Cancelled`] if `cancel` fires during an attempt or a
    ///   backoff sleep
    /// - [`ApiError::Config`] for a malformed URL, before any network call
    #[instrument(skip(self, body, cancel), fields(%method, url = %url))]
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ApiError> {
        let url = with_json_alt(url)?;
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::Decode(format!("failed to encode request body: {e}")))?;

        self.retry
            .execute(cancel, |attempt| {
                self.attempt(attempt, method.clone(), url.clone(), payload.clone())
            })
            .await
            .map_err(|err| InfraError::from(err).into())
    }

    async fn attempt(
        &self,
        attempt: u32,
        method: Method,
        url: Url,
        payload: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ApiError> {
        let token = self.auth.access_token().await?;

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token);
        if let Some(payload) = payload {
            request = request.body(payload);
        }

        debug!(attempt, %method, %url, "sending HTTP request");
        let response = request.send().await.map_err(|err| ApiError::from(InfraError::from(err)))?;

        let status = response.status();
        debug!(attempt, %method, %url, %status, "received HTTP response");

        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.bytes().await.map_err(|err| ApiError::from(InfraError::from(err)))?;
        if !status.is_success() {
            let error = normalize_error(status, &body).with_retry_after(retry_after);
            return Err(ApiError::Status(error));
        }

        Ok(body.to_vec())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").field("retry", self.retry.config()).finish_non_exhaustive()
    }
}

/// `Retry-After` in delta-seconds form; HTTP dates are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Replace any `alt` parameter with `alt=json`, keeping the rest of the query.
fn with_json_alt(raw: &str) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(raw).map_err(|e| ApiError::Config(format!("invalid URL `{raw}`: {e}")))?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "alt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut().clear().extend_pairs(retained).append_pair("alt", "json");

    Ok(url)
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    timeout: Duration,
    max_attempts: u32,
    backoff: BackoffStrategy,
    retry_mode: RetryMode,
    user_agent: Option<String>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(feedlink_domain::DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: feedlink_domain::DEFAULT_REQUEST_ATTEMPTS,
            backoff: BackoffStrategy::default(),
            retry_mode: RetryMode::default(),
            user_agent: None,
            auth: None,
        }
    }
}

impl HttpTransportBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    ///
    /// Zero is rejected by [`build`](Self::build).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn retry_mode(mut self, mode: RetryMode) -> Self {
        self.retry_mode = mode;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// # Errors
    ///
    /// [`ApiError::Config`] for zero attempts, an invalid backoff, a missing
    /// token provider or a reqwest client that cannot be built.
    pub fn build(self) -> Result<HttpTransport, ApiError> {
        let retry_config = RetryConfig { max_attempts: self.max_attempts, backoff: self.backoff };
        let retry = RetryExecutor::new(retry_config, TransportRetryPolicy::new(self.retry_mode))
            .map_err(|err| ApiError::from(InfraError::from(err)))?;

        let auth =
            self.auth.ok_or_else(|| ApiError::Config("access token provider not set".into()))?;

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| ApiError::from(InfraError::from(err)))?;

        Ok(HttpTransport { client, auth, retry })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;
    use crate::api::auth::StaticTokenProvider;

    fn transport(attempts: u32) -> HttpTransport {
        transport_with(attempts, RetryMode::Blind, Duration::from_millis(1))
    }

    fn transport_with(attempts: u32, mode: RetryMode, delay: Duration) -> HttpTransport {
        HttpTransport::builder()
            .max_attempts(attempts)
            .backoff(BackoffStrategy::Fixed(delay))
            .retry_mode(mode)
            .user_agent("feedlink-test/1.0")
            .auth(Arc::new(StaticTokenProvider::new("test-token")))
            .build()
            .expect("transport")
    }

    #[tokio::test]
    async fn sends_fixed_headers_and_alt_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/feeds"))
            .and(query_param("alt", "json"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", "feedlink-test/1.0"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({"display_name": "x"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name":"feeds/1"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let body = json!({"display_name": "x"});
        let bytes = transport(3)
            .send(
                Method::POST,
                &format!("{}/v1/feeds", server.uri()),
                Some(&body),
                &CancellationToken::new(),
            )
            .await
            .expect("response");

        assert_eq!(bytes, br#"{"name":"feeds/1"}"#);
    }

    #[tokio::test]
    async fn no_content_yields_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = transport(3)
            .send(Method::DELETE, &server.uri(), None, &CancellationToken::new())
            .await
            .expect("response");

        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn exhausted_attempts_return_last_error() {
        let server = MockServer::start().await;
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &Request| -> ResponseTemplate {
                let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                ResponseTemplate::new(500).set_body_json(json!({
                    "message": format!("attempt {n}"),
                    "result": "INTERNAL"
                }))
            })
            .expect(4)
            .mount(&server)
            .await;

        let err = transport(4)
            .send(Method::GET, &server.uri(), None, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ApiError::Status(status) => {
                assert_eq!(status.status_code, 500);
                assert_eq!(status.message, "attempt 4");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn blind_mode_retries_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .expect(3)
            .mount(&server)
            .await;

        let err = transport(3)
            .send(Method::GET, &server.uri(), None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
    }

    #[tokio::test]
    async fn transient_mode_stops_on_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = transport_with(5, RetryMode::TransientOnly, Duration::from_millis(1))
            .send(Method::GET, &server.uri(), None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let server = MockServer::start().await;
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &Request| -> ResponseTemplate {
                if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200).set_body_string("{}")
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let bytes = transport(5)
            .send(Method::GET, &server.uri(), None, &CancellationToken::new())
            .await
            .expect("response");

        assert_eq!(bytes, b"{}");
    }

    #[tokio::test]
    async fn retries_on_network_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport(2)
            .send(Method::GET, &format!("http://{addr}/v1/feeds"), None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn cancellation_during_backoff_returns_promptly() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

        let transport = transport_with(5, RetryMode::Blind, Duration::from_secs(30));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = transport.send(Method::GET, &server.uri(), None, &cancel).await.unwrap_err();

        assert_eq!(err, ApiError::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[test]
    fn zero_attempts_is_configuration_error() {
        let result = HttpTransport::builder()
            .max_attempts(0)
            .auth(Arc::new(StaticTokenProvider::new("t")))
            .build();

        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn missing_auth_is_configuration_error() {
        assert!(matches!(HttpTransport::builder().build(), Err(ApiError::Config(_))));
    }

    #[test]
    fn transient_policy_uses_server_delay() {
        let throttled = |secs| {
            ApiError::Status(
                feedlink_domain::StatusError::new(429, "slow down", "RESOURCE_EXHAUSTED")
                    .with_retry_after(Some(Duration::from_secs(secs))),
            )
        };
        let transient = TransportRetryPolicy::new(RetryMode::TransientOnly);
        let blind = TransportRetryPolicy::new(RetryMode::Blind);

        assert_eq!(
            transient.should_retry(&throttled(2), 1),
            RetryDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(
            transient.should_retry(&throttled(3600), 1),
            RetryDecision::RetryAfter(MAX_RETRY_AFTER)
        );
        assert_eq!(blind.should_retry(&throttled(2), 1), RetryDecision::Retry);
    }

    #[test]
    fn retry_after_accepts_delta_seconds_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, "7".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[tokio::test]
    async fn transient_mode_waits_for_retry_after_instead_of_backoff() {
        let server = MockServer::start().await;
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &Request| -> ResponseTemplate {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    ResponseTemplate::new(429).insert_header("retry-after", "0")
                } else {
                    ResponseTemplate::new(200).set_body_string("{}")
                }
            })
            .expect(2)
            .mount(&server)
            .await;

        let transport = transport_with(3, RetryMode::TransientOnly, Duration::from_secs(30));
        let started = Instant::now();
        let bytes = transport
            .send(Method::GET, &server.uri(), None, &CancellationToken::new())
            .await
            .expect("response");

        assert_eq!(bytes, b"{}");
        assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
    }

    #[test]
    fn alt_json_replaces_existing_alt() {
        let url = with_json_alt("https://example.com/v2/lists?update_mask=list.lines&alt=proto")
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/v2/lists?update_mask=list.lines&alt=json");

        assert!(matches!(with_json_alt("not a url"), Err(ApiError::Config(_))));
    }
}
