//! Client for the feed-management API
//!
//! Every operation takes a [`CancellationToken`](tokio_util::sync::CancellationToken),
//! waits for its rate limiter bucket and then runs through the retrying
//! transport.
//!
//! # Resource families
//!
//! - feeds: create, read, list, update, delete, enable/disable
//! - detection rules and YARA verification
//! - RBAC subjects
//! - reference lists

pub mod auth;
pub mod client;
pub mod endpoints;
mod feeds;
mod reference_lists;
mod rules;
mod subjects;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use client::{ApiClient, ApiClientBuilder};
pub use endpoints::{BasePaths, Operation};
