//! Feed envelope and concrete configurations
//!
//! A feed on the wire is one JSON document: generic fields at the top and in
//! `details`, plus exactly one settings object nested in `details` under a
//! key that depends on the concrete configuration. [`envelope`] converts
//! between that document and the strongly typed [`Feed`].

use serde::{Deserialize, Serialize};

pub mod configuration;
pub mod envelope;
pub mod registry;
pub mod settings;
pub mod source;

pub use configuration::FeedConfiguration;
pub use envelope::{assemble, disassemble, disassemble_value};
pub use registry::empty_instance_for;
pub use source::{FeedSourceType, FeedState, MicrosoftGraphContentType};

/// Resource-name prefix the server puts in front of feed ids
pub const FEED_NAME_PREFIX: &str = "feeds/";

/// Strip the `feeds/` prefix from a server-assigned feed name
pub fn parse_feed_id(name: &str) -> &str {
    name.strip_prefix(FEED_NAME_PREFIX).unwrap_or(name)
}

/// Free-form key/value metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Generic part of the `details` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedDetails {
    /// Set from the configuration when the envelope is assembled
    #[serde(rename = "feedSourceType", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<FeedSourceType>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

/// Generic outer record of a feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedEnvelope {
    /// Server-assigned id; absent until the feed is created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    pub details: FeedDetails,
    #[serde(rename = "feedState", skip_serializing_if = "Option::is_none")]
    pub state: Option<FeedState>,
}

impl FeedEnvelope {
    /// New envelope for a feed that does not exist remotely yet
    pub fn new(display_name: impl Into<String>, log_type: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            details: FeedDetails { log_type: log_type.into(), ..FeedDetails::default() },
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.details.namespace = namespace.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.labels.push(Label::new(key, value));
        self
    }

    /// Feed id without the `feeds/` prefix
    pub fn id(&self) -> Option<&str> {
        self.name.as_deref().map(parse_feed_id)
    }

    /// Anything but `INACTIVE` counts as enabled, including a missing state
    pub fn is_enabled(&self) -> bool {
        self.state.map_or(true, FeedState::is_enabled)
    }
}

/// A fully decoded feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub envelope: FeedEnvelope,
    pub configuration: FeedConfiguration,
}

impl Feed {
    /// "Original plus read": splice credentials back from the configuration
    /// the caller submitted
    pub fn with_restored_secrets(mut self, original: &FeedConfiguration) -> Self {
        self.configuration.restore_secrets(original);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_feed_id() {
        assert_eq!(parse_feed_id("feeds/abc-123"), "abc-123");
        assert_eq!(parse_feed_id("abc-123"), "abc-123");
    }

    #[test]
    fn test_envelope_wire_names() {
        let envelope = FeedEnvelope {
            name: Some("feeds/1".to_string()),
            state: Some(FeedState::Inactive),
            ..FeedEnvelope::new("My Feed", "AWS_CLOUDTRAIL")
                .with_namespace("prod")
                .with_label("team", "secops")
        };

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "name": "feeds/1",
                "display_name": "My Feed",
                "details": {
                    "logType": "AWS_CLOUDTRAIL",
                    "namespace": "prod",
                    "labels": [{"key": "team", "value": "secops"}]
                },
                "feedState": "INACTIVE"
            })
        );
        assert_eq!(envelope.id(), Some("1"));
        assert!(!envelope.is_enabled());
    }

    #[test]
    fn test_missing_state_counts_as_enabled() {
        assert!(FeedEnvelope::default().is_enabled());
        let failed = FeedEnvelope { state: Some(FeedState::Failed), ..Default::default() };
        assert!(failed.is_enabled());
    }
}
