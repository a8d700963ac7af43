//! Resilient HTTP transport
//!
//! Retry with exponential backoff, cancellation and normalization of non-2xx
//! responses into [`feedlink_domain::StatusError`].

pub mod client;
pub mod normalizer;

pub use client::{HttpTransport, HttpTransportBuilder, TransportRetryPolicy};
pub use normalizer::normalize_error;
