//! # Feedlink Infrastructure
//!
//! I/O side of the feed-management client.
//!
//! This crate contains:
//! - The resilient HTTP transport and error normalizer
//! - The API client with per-resource operations (feeds, rules, subjects,
//!   reference lists)
//! - The settings loader (environment, JSON, TOML)
//! - Tracing setup for embedding processes
//!
//! ## Architecture
//! - Data shapes and the error taxonomy come from `feedlink-domain`
//! - Rate limiting and retry come from `feedlink-common`
//! - Every public operation returns [`feedlink_domain::ApiError`]

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    AccessTokenProvider, ApiClient, ApiClientBuilder, BasePaths, Operation, StaticTokenProvider,
};
pub use errors::InfraError;
pub use http::{normalize_error, HttpTransport, HttpTransportBuilder, TransportRetryPolicy};
pub use observability::init_tracing;
