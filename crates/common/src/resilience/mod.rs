//! Resilience primitives for the API client
//!
//! - **Rate limiting**: token buckets and a bank holding one bucket per
//!   operation
//! - **Retry**: bounded attempts with exponential backoff, cancellable at any
//!   await point
//!
//! Both are generic over their keys and error types; the HTTP layer in
//! `feedlink-infra` supplies the concrete operation catalog and error
//! normalization.

pub mod clock;
pub mod limiter_bank;
pub mod rate_limiter;
pub mod retry;

pub use clock::{Clock, MockClock, SystemClock};
pub use limiter_bank::RateLimiterBank;
pub use rate_limiter::{RateLimitError, TokenBucket, TokenBucketConfig, TokenBucketConfigBuilder};
pub use retry::{
    policies, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryConfigError, RetryDecision,
    RetryError, RetryExecutor, RetryPolicy, RetryResult,
};
