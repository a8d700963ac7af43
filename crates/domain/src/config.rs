//! Client configuration structures

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, Result};

/// Default number of attempts per request, initial try included
pub const DEFAULT_REQUEST_ATTEMPTS: u32 = 5;
/// Default per-attempt timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Deployment region of the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Us,
    Europe,
    EuropeWest2,
    AsiaSoutheast1,
}

crate::impl_wire_enum_conversions!(Region {
    Us => "us",
    Europe => "europe",
    EuropeWest2 => "europe-west2",
    AsiaSoutheast1 => "asia-southeast1",
});

impl Region {
    /// Host label in front of `.googleapis.com`
    pub fn subdomain(self) -> String {
        match self {
            Self::Us => "backstory".to_string(),
            other => format!("{}-backstory", other.as_str()),
        }
    }
}

/// Which failed attempts the transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RetryMode {
    /// Every transport or status failure, whatever the code
    #[default]
    Blind,
    /// Only transport failures, 429 and 5xx
    TransientOnly,
}

crate::impl_wire_enum_conversions!(RetryMode {
    Blind => "blind",
    TransientOnly => "transient_only",
});

/// Exponential backoff between attempts (factor 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSettings {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self { initial_delay_ms: 100, max_delay_ms: 30_000 }
    }
}

/// Token bucket parameters applied to every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub burst: u64,
    pub refill_interval_ms: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self { burst: 1, refill_interval_ms: 1_000 }
    }
}

/// Per-resource base path overrides; `None` keeps the regional default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasePathOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feeds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_lists: Option<String>,
}

/// Everything needed to construct an API client, apart from credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub region: Region,
    pub user_agent: String,
    pub request_attempts: u32,
    pub request_timeout_secs: u64,
    pub retry_mode: RetryMode,
    pub backoff: BackoffSettings,
    pub rate_limit: RateLimitSettings,
    pub base_paths: BasePathOverrides,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            region: Region::default(),
            user_agent: concat!("feedlink/", env!("CARGO_PKG_VERSION")).to_string(),
            request_attempts: DEFAULT_REQUEST_ATTEMPTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retry_mode: RetryMode::default(),
            backoff: BackoffSettings::default(),
            rate_limit: RateLimitSettings::default(),
            base_paths: BasePathOverrides::default(),
        }
    }
}

impl ClientSettings {
    /// # Errors
    ///
    /// [`ApiError::Config`] naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.request_attempts == 0 {
            return Err(ApiError::Config("request_attempts must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ApiError::Config("request_timeout_secs must be positive".to_string()));
        }
        if self.backoff.initial_delay_ms > self.backoff.max_delay_ms {
            return Err(ApiError::Config(format!(
                "backoff initial delay {}ms exceeds max delay {}ms",
                self.backoff.initial_delay_ms, self.backoff.max_delay_ms
            )));
        }
        if self.rate_limit.burst == 0 || self.rate_limit.refill_interval_ms == 0 {
            return Err(ApiError::Config(
                "rate limit burst and refill interval must be positive".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ApiError::Config("user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}
