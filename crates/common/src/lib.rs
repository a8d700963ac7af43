//! Shared building blocks for the feedlink client crates.
//!
//! Nothing in here knows about feeds or HTTP. [`resilience`] provides token
//! bucket rate limiting, a per-operation limiter bank, and a cancellable
//! retry executor.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod resilience;

pub use resilience::{
    BackoffStrategy, Clock, MockClock, RateLimitError, RateLimiterBank, RetryConfig,
    RetryConfigBuilder, RetryDecision, RetryError, RetryExecutor, RetryPolicy, RetryResult,
    SystemClock, TokenBucket, TokenBucketConfig,
};
