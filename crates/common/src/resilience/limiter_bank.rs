//! A fixed set of independent token buckets keyed by operation
//!
//! The bank is built once with every key it will ever serve. Buckets never
//! share tokens, so an exhausted bucket only stalls callers of its own
//! operation.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::clock::{Clock, SystemClock};
use super::rate_limiter::{RateLimitError, TokenBucket, TokenBucketConfig};

/// Independent token buckets, one per operation key.
pub struct RateLimiterBank<K, C: Clock = SystemClock> {
    buckets: HashMap<K, TokenBucket<C>>,
}

impl<K> RateLimiterBank<K, SystemClock>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    /// Build a bank with one bucket per key, all using `config`.
    pub fn new<I>(keys: I, config: &TokenBucketConfig) -> Result<Self, RateLimitError>
    where
        I: IntoIterator<Item = K>,
    {
        Self::with_clock(keys, config, &SystemClock)
    }
}

impl<K, C> RateLimiterBank<K, C>
where
    K: Eq + Hash + Clone + fmt::Display,
    C: Clock + Clone,
{
    /// Build a bank whose buckets read time from `clock`.
    pub fn with_clock<I>(
        keys: I,
        config: &TokenBucketConfig,
        clock: &C,
    ) -> Result<Self, RateLimitError>
    where
        I: IntoIterator<Item = K>,
    {
        config.validate()?;

        let mut buckets = HashMap::new();
        for key in keys {
            buckets.insert(key, TokenBucket::with_clock(config.clone(), clock.clone())?);
        }
        Ok(Self { buckets })
    }

    /// Override the bucket used for a single operation.
    pub fn set_bucket(
        &mut self,
        key: K,
        config: TokenBucketConfig,
        clock: C,
    ) -> Result<(), RateLimitError> {
        self.buckets.insert(key, TokenBucket::with_clock(config, clock)?);
        Ok(())
    }
}

impl<K, C> RateLimiterBank<K, C>
where
    K: Eq + Hash + fmt::Display,
    C: Clock,
{
    fn bucket(&self, key: &K) -> Result<&TokenBucket<C>, RateLimitError> {
        self.buckets.get(key).ok_or_else(|| RateLimitError::UnknownOperation(key.to_string()))
    }

    /// Wait for a token from the bucket belonging to `key`.
    ///
    /// # Errors
    ///
    /// - [`RateLimitError::UnknownOperation`] if the bank has no bucket for
    ///   `key`
    /// - [`RateLimitError::Cancelled`] if `cancel` fires first
    #[instrument(skip(self, key, cancel), fields(operation = %key))]
    pub async fn acquire(&self, key: &K, cancel: &CancellationToken) -> Result<(), RateLimitError> {
        self.bucket(key)?.acquire(cancel).await?;
        debug!("Rate limiter token acquired");
        Ok(())
    }

    /// Take a token for `key` without waiting.
    pub fn try_acquire(&self, key: &K) -> Result<bool, RateLimitError> {
        Ok(self.bucket(key)?.try_acquire())
    }

    /// Tokens currently available for `key`.
    pub fn available_tokens(&self, key: &K) -> Result<u64, RateLimitError> {
        Ok(self.bucket(key)?.available_tokens())
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the bank has no buckets
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<K, C: Clock> fmt::Debug for RateLimiterBank<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiterBank").field("buckets", &self.buckets.len()).finish()
    }
}
