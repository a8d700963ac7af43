//! # Feedlink Domain
//!
//! Data model and codecs for the feed-management API.
//!
//! This crate contains:
//! - The error taxonomy shared by every client operation
//! - Feed envelopes, the closed set of concrete feed configurations and the
//!   registry that maps wire discriminators onto them
//! - The envelope assembler/disassembler
//! - Rule, subject and reference list records
//! - Client settings shared by the configuration loader and the client builder
//!
//! ## Architecture
//! - No I/O and no dependencies on other feedlink crates
//! - Wire names live next to the types that carry them

pub mod config;
pub mod errors;
pub mod feed;
pub mod macros;
pub mod reference_list;
pub mod rule;
pub mod subject;

mod serde_util;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use feed::{
    assemble, disassemble, disassemble_value, empty_instance_for, parse_feed_id, Feed,
    FeedConfiguration, FeedDetails, FeedEnvelope, FeedSourceType, FeedState, Label,
    MicrosoftGraphContentType,
};
pub use reference_list::{ReferenceList, ReferenceListContentType, ReferenceListUpdateMask};
pub use rule::{Rule, RuleVerification, VerifyRuleRequest};
pub use subject::{Permission, Role, Subject};
