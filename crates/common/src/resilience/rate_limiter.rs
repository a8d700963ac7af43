//! Token bucket rate limiting
//!
//! A bucket holds up to `capacity` tokens and regains `refill_amount` tokens
//! every `refill_interval`. Callers either probe with
//! [`TokenBucket::try_acquire`] or park on [`TokenBucket::acquire`] until a
//! token is available or their cancellation token fires.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};

/// Errors raised by rate limiters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    /// The caller cancelled while waiting for a token
    #[error("rate limiter wait cancelled")]
    Cancelled,

    /// No bucket is registered for the requested operation
    #[error("no rate limiter registered for operation `{0}`")]
    UnknownOperation(String),

    /// The bucket configuration is invalid
    #[error("invalid rate limiter configuration: {0}")]
    InvalidConfiguration(String),
}

/// Configuration for token bucket rate limiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBucketConfig {
    /// Maximum number of tokens the bucket can hold (burst size)
    pub capacity: u64,
    /// Number of tokens to refill per interval
    pub refill_amount: u64,
    /// Time interval for token refill
    pub refill_interval: Duration,
}

impl Default for TokenBucketConfig {
    /// One request per second, no burst.
    fn default() -> Self {
        Self { capacity: 1, refill_amount: 1, refill_interval: Duration::from_secs(1) }
    }
}

impl TokenBucketConfig {
    /// Create a new configuration builder
    pub fn builder() -> TokenBucketConfigBuilder {
        TokenBucketConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.capacity == 0 {
            return Err(RateLimitError::InvalidConfiguration(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if self.refill_amount == 0 {
            return Err(RateLimitError::InvalidConfiguration(
                "refill_amount must be greater than 0".to_string(),
            ));
        }
        if self.refill_interval.is_zero() {
            return Err(RateLimitError::InvalidConfiguration(
                "refill_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for TokenBucketConfig
#[derive(Debug, Default)]
pub struct TokenBucketConfigBuilder {
    config: TokenBucketConfig,
}

impl TokenBucketConfigBuilder {
    pub fn new() -> Self {
        Self { config: TokenBucketConfig::default() }
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn refill_amount(mut self, amount: u64) -> Self {
        self.config.refill_amount = amount;
        self
    }

    pub fn refill_interval(mut self, interval: Duration) -> Self {
        self.config.refill_interval = interval;
        self
    }

    pub fn build(self) -> Result<TokenBucketConfig, RateLimitError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: u64,
    last_refill: Instant,
}

/// Token bucket rate limiter
///
/// Clones share the same underlying bucket.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use feedlink_common::resilience::{TokenBucket, TokenBucketConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TokenBucketConfig::builder()
///     .capacity(2)
///     .refill_amount(1)
///     .refill_interval(Duration::from_secs(1))
///     .build()?;
/// let limiter = TokenBucket::new(config)?;
///
/// assert!(limiter.try_acquire());
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
/// # Ok(())
/// # }
/// ```
pub struct TokenBucket<C: Clock = SystemClock> {
    config: TokenBucketConfig,
    state: Arc<Mutex<BucketState>>,
    clock: Arc<C>,
}

impl TokenBucket<SystemClock> {
    /// Create a new token bucket with system clock
    pub fn new(config: TokenBucketConfig) -> Result<Self, RateLimitError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TokenBucket<C> {
    /// Create a new token bucket with custom clock
    pub fn with_clock(config: TokenBucketConfig, clock: C) -> Result<Self, RateLimitError> {
        config.validate()?;

        let state = BucketState { tokens: config.capacity, last_refill: clock.now() };
        Ok(Self { config, state: Arc::new(Mutex::new(state)), clock: Arc::new(clock) })
    }

    /// Bucket configuration
    pub fn config(&self) -> &TokenBucketConfig {
        &self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, BucketState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Token bucket state lock poisoned");
                poisoned.into_inner()
            }
        }
    }

    /// Refill tokens based on elapsed time
    fn refill(&self, state: &mut BucketState) {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(state.last_refill);
        let interval_nanos = self.config.refill_interval.as_nanos();
        let refills = elapsed.as_nanos() / interval_nanos;

        if refills == 0 {
            return;
        }

        let added = u64::try_from(refills)
            .unwrap_or(u64::MAX)
            .saturating_mul(self.config.refill_amount);
        state.tokens = state.tokens.saturating_add(added).min(self.config.capacity);

        if state.tokens == self.config.capacity {
            // A full bucket does not bank idle time.
            state.last_refill = now;
        } else {
            // Keep the partial interval so the next refill is not delayed.
            let consumed = u32::try_from(refills)
                .map(|n| self.config.refill_interval.saturating_mul(n))
                .unwrap_or(elapsed);
            state.last_refill += consumed;
        }

        debug!(added, available = state.tokens, "Refilled token bucket");
    }

    /// Take one token if available, otherwise report how long until the next
    /// refill.
    fn reserve(&self) -> Option<Duration> {
        let mut state = self.lock_state();
        self.refill(&mut state);

        if state.tokens > 0 {
            state.tokens -= 1;
            return None;
        }

        let since_refill = self.clock.now().saturating_duration_since(state.last_refill);
        let wait = self.config.refill_interval.saturating_sub(since_refill);
        Some(wait.max(Duration::from_millis(1)))
    }

    /// Try to acquire a single token without waiting
    pub fn try_acquire(&self) -> bool {
        let acquired = self.reserve().is_none();
        if !acquired {
            debug!("Rate limit: no tokens available");
        }
        acquired
    }

    /// Wait until a token is available
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::Cancelled`] if `cancel` fires before a token
    /// could be taken, including when it is already cancelled on entry.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), RateLimitError> {
        loop {
            if cancel.is_cancelled() {
                return Err(RateLimitError::Cancelled);
            }

            let Some(wait) = self.reserve() else {
                return Ok(());
            };

            debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate limiter token");
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(RateLimitError::Cancelled),
                () = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Get the current number of available tokens
    pub fn available_tokens(&self) -> u64 {
        let mut state = self.lock_state();
        self.refill(&mut state);
        state.tokens
    }

    /// Reset the limiter to full capacity
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.tokens = self.config.capacity;
        state.last_refill = self.clock.now();
    }
}

impl<C: Clock> Clone for TokenBucket<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock> std::fmt::Debug for TokenBucket<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket").field("config", &self.config).finish_non_exhaustive()
    }
}
