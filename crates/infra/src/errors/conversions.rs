//! Conversions from external infrastructure errors into domain errors.

use feedlink_common::resilience::{RateLimitError, RetryConfigError, RetryError};
use feedlink_domain::ApiError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ApiError);

impl From<InfraError> for ApiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ApiError> for InfraError {
    fn from(value: ApiError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for HttpError {
    fn into_api_error(self) -> ApiError {
        if self.is_timeout() {
            return ApiError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ApiError::Transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return ApiError::Config(format!("invalid HTTP request: {self}"));
        }

        ApiError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_api_error())
    }
}

/* -------------------------------------------------------------------------- */
/* feedlink-common errors → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for RetryError<ApiError> {
    /// Only the error of the final attempt survives the retry loop.
    fn into_api_error(self) -> ApiError {
        match self {
            RetryError::AttemptsExhausted { last, .. } => last,
            RetryError::NonRetryable { source, .. } => source,
            RetryError::Cancelled { .. } => ApiError::Cancelled,
        }
    }
}

impl From<RetryError<ApiError>> for InfraError {
    fn from(value: RetryError<ApiError>) -> Self {
        InfraError(value.into_api_error())
    }
}

impl IntoApiError for RateLimitError {
    fn into_api_error(self) -> ApiError {
        match self {
            RateLimitError::Cancelled => ApiError::Cancelled,
            other => ApiError::Config(other.to_string()),
        }
    }
}

impl From<RateLimitError> for InfraError {
    fn from(value: RateLimitError) -> Self {
        InfraError(value.into_api_error())
    }
}

impl From<RetryConfigError> for InfraError {
    fn from(value: RetryConfigError) -> Self {
        InfraError(ApiError::Config(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use feedlink_domain::StatusError;
    use reqwest::Client;

    use super::*;

    #[test]
    fn exhausted_retries_surface_last_error_only() {
        let last = ApiError::Status(StatusError::new(503, "try later", "UNAVAILABLE"));
        let err = RetryError::AttemptsExhausted { attempts: 5, last: last.clone() };

        let mapped: ApiError = InfraError::from(err).into();
        assert_eq!(mapped, last);
    }

    #[test]
    fn cancelled_retry_maps_to_cancelled() {
        let err = RetryError::<ApiError>::Cancelled { attempts: 2 };
        let mapped: ApiError = InfraError::from(err).into();
        assert_eq!(mapped, ApiError::Cancelled);
    }

    #[test]
    fn unknown_operation_is_configuration_error() {
        let err = RateLimitError::UnknownOperation("feeds.create".into());
        let mapped: ApiError = InfraError::from(err).into();
        assert!(matches!(mapped, ApiError::Config(msg) if msg.contains("feeds.create")));

        let cancelled: ApiError = InfraError::from(RateLimitError::Cancelled).into();
        assert_eq!(cancelled, ApiError::Cancelled);
    }

    #[tokio::test]
    async fn connection_refused_maps_to_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: ApiError = InfraError::from(error).into();
        assert!(matches!(mapped, ApiError::Transport(_)));
        assert!(mapped.is_transient());
    }
}
