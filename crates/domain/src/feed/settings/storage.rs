//! Object storage feeds: Amazon S3, Google Cloud Storage, Azure Blob Store

use serde::{Deserialize, Serialize};

use super::{redact, restore, restore_if_empty, FeedSettings};
use crate::feed::source::FeedSourceType;

/// Region plus access key pair for S3 buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3Authentication {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub access_key_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_access_key: String,
}

impl S3Authentication {
    fn redact(&mut self) {
        redact(&mut self.access_key_id);
        redact(&mut self.secret_access_key);
    }
}

/// `amazonS3Settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub s3_uri: String,
    /// `FILES`, `FOLDERS` or `FOLDERS_RECURSIVE`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
    pub authentication: S3Authentication,
}

impl FeedSettings for S3Settings {
    fn envelope_key(&self) -> &'static str {
        "amazonS3Settings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::AmazonS3
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `amazonS3V2Settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3V2Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub s3_uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lookback_days: Option<u32>,
    pub authentication: S3Authentication,
}

impl FeedSettings for S3V2Settings {
    fn envelope_key(&self) -> &'static str {
        "amazonS3V2Settings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::AmazonS3V2
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `gcsSettings`; access is granted to the service account, so no
/// credentials travel with the feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GcsSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bucket_uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
}

impl FeedSettings for GcsSettings {
    fn envelope_key(&self) -> &'static str {
        "gcsSettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::GoogleCloudStorage
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
    }

    fn redact_secrets(&mut self) {}
}

/// `gcsV2Settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GcsV2Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bucket_uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lookback_days: Option<u32>,
}

impl FeedSettings for GcsV2Settings {
    fn envelope_key(&self) -> &'static str {
        "gcsV2Settings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::GoogleCloudStorageV2
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
    }

    fn redact_secrets(&mut self) {}
}

/// Shared key or SAS token; one of the two is expected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AzureSharedKeyAuth {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub shared_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sas_token: String,
}

impl AzureSharedKeyAuth {
    fn restore(&mut self, original: &Self) {
        restore(&mut self.shared_key, &original.shared_key);
        restore(&mut self.sas_token, &original.sas_token);
    }

    fn redact(&mut self) {
        redact(&mut self.shared_key);
        redact(&mut self.sas_token);
    }
}

/// `azureBlobStoreSettings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AzureBlobStoreSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub azure_uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
    pub authentication: AzureSharedKeyAuth,
}

impl FeedSettings for AzureBlobStoreSettings {
    fn envelope_key(&self) -> &'static str {
        "azureBlobStoreSettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::AzureBlobStore
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
        self.authentication.restore(&original.authentication);
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `azureBlobStoreV2Settings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AzureBlobStoreV2Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub azure_uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_deletion_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lookback_days: Option<u32>,
    pub authentication: AzureSharedKeyAuth,
}

impl FeedSettings for AzureBlobStoreV2Settings {
    fn envelope_key(&self) -> &'static str {
        "azureBlobStoreV2Settings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::AzureBlobStoreV2
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.source_deletion_option, &original.source_deletion_option);
        self.authentication.restore(&original.authentication);
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}
