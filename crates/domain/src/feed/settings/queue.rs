//! Queue-driven feeds: Amazon SQS notifications pointing at S3 objects

use serde::{Deserialize, Serialize};

use super::{redact, restore_if_empty, FeedSettings};
use crate::feed::source::FeedSourceType;

/// Access key pair; both fields are always sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqsAccessKeySecretAuth {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl SqsAccessKeySecretAuth {
    fn redact(&mut self) {
        redact(&mut self.access_key_id);
        redact(&mut self.secret_access_key);
    }
}

/// Credentials for the queue, plus optional separate credentials for the
/// bucket the notifications point at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqsAuthentication {
    pub sqs_access_key_secret_auth: SqsAccessKeySecretAuth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_s3_access_key_secret_auth: Option<SqsAccessKeySecretAuth>,
}

impl SqsAuthentication {
    fn redact(&mut self) {
        self.sqs_access_key_secret_auth.redact();
        if let Some(s3) = self.additional_s3_access_key_secret_auth.as_mut() {
            s3.redact();
        }
    }
}

/// `amazonSqsSettings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqsSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub queue: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
    pub authentication: SqsAuthentication,
}

impl FeedSettings for SqsSettings {
    fn envelope_key(&self) -> &'static str {
        "amazonSqsSettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::AmazonSqs
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `amazonSqsV2Settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqsV2Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub s3_uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub queue_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lookback_days: Option<u32>,
    pub authentication: SqsAuthentication,
}

impl FeedSettings for SqsV2Settings {
    fn envelope_key(&self) -> &'static str {
        "amazonSqsV2Settings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::AmazonSqsV2
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}
