//! The closed set of concrete feed configurations

use serde_json::Value;

use super::settings::{
    AzureBlobStoreSettings, AzureBlobStoreV2Settings, FeedSettings, GcsSettings, GcsV2Settings,
    MicrosoftGraphSettings, Office365Settings, OktaSystemLogSettings, OktaUsersSettings,
    ProofpointSiemSettings, QualysVmSettings, S3Settings, S3V2Settings, SqsSettings,
    SqsV2Settings, ThinkstCanarySettings,
};
use super::source::FeedSourceType;

/// One concrete configuration, nested under its own key in `details`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedConfiguration {
    AmazonS3(S3Settings),
    AmazonS3V2(S3V2Settings),
    AmazonSqs(SqsSettings),
    AmazonSqsV2(SqsV2Settings),
    AzureBlobStore(AzureBlobStoreSettings),
    AzureBlobStoreV2(AzureBlobStoreV2Settings),
    GoogleCloudStorage(GcsSettings),
    GoogleCloudStorageV2(GcsV2Settings),
    MicrosoftGraph(MicrosoftGraphSettings),
    Office365(Office365Settings),
    OktaSystemLog(OktaSystemLogSettings),
    OktaUsers(OktaUsersSettings),
    ProofpointSiem(ProofpointSiemSettings),
    QualysVm(QualysVmSettings),
    ThinkstCanary(ThinkstCanarySettings),
}

/// Run `$body` with `$inner` bound to the settings of whichever variant
/// `$value` holds.
macro_rules! with_settings {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            FeedConfiguration::AmazonS3($inner) => $body,
            FeedConfiguration::AmazonS3V2($inner) => $body,
            FeedConfiguration::AmazonSqs($inner) => $body,
            FeedConfiguration::AmazonSqsV2($inner) => $body,
            FeedConfiguration::AzureBlobStore($inner) => $body,
            FeedConfiguration::AzureBlobStoreV2($inner) => $body,
            FeedConfiguration::GoogleCloudStorage($inner) => $body,
            FeedConfiguration::GoogleCloudStorageV2($inner) => $body,
            FeedConfiguration::MicrosoftGraph($inner) => $body,
            FeedConfiguration::Office365($inner) => $body,
            FeedConfiguration::OktaSystemLog($inner) => $body,
            FeedConfiguration::OktaUsers($inner) => $body,
            FeedConfiguration::ProofpointSiem($inner) => $body,
            FeedConfiguration::QualysVm($inner) => $body,
            FeedConfiguration::ThinkstCanary($inner) => $body,
        }
    };
}

macro_rules! impl_from_settings {
    ($($settings:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$settings> for FeedConfiguration {
                fn from(settings: $settings) -> Self {
                    Self::$variant(settings)
                }
            }
        )+
    };
}

impl_from_settings!(
    S3Settings => AmazonS3,
    S3V2Settings => AmazonS3V2,
    SqsSettings => AmazonSqs,
    SqsV2Settings => AmazonSqsV2,
    AzureBlobStoreSettings => AzureBlobStore,
    AzureBlobStoreV2Settings => AzureBlobStoreV2,
    GcsSettings => GoogleCloudStorage,
    GcsV2Settings => GoogleCloudStorageV2,
    MicrosoftGraphSettings => MicrosoftGraph,
    Office365Settings => Office365,
    OktaSystemLogSettings => OktaSystemLog,
    OktaUsersSettings => OktaUsers,
    ProofpointSiemSettings => ProofpointSiem,
    QualysVmSettings => QualysVm,
    ThinkstCanarySettings => ThinkstCanary,
);

impl FeedConfiguration {
    /// Property name of the settings object inside `details`
    pub fn envelope_key(&self) -> &'static str {
        with_settings!(self, s => s.envelope_key())
    }

    /// Value of `details.feedSourceType`
    pub fn source_type(&self) -> FeedSourceType {
        with_settings!(self, s => s.source_type())
    }

    /// Log type the shape dictates, if any
    ///
    /// Storage and queue feeds accept any log type; API feeds are identified
    /// by theirs.
    pub fn log_type(&self) -> Option<&'static str> {
        with_settings!(self, s => s.log_type())
    }

    /// The discriminator that selects this shape in the registry: the log
    /// type for API feeds, the source type for everything else
    pub fn source_kind(&self) -> &'static str {
        match self.source_type() {
            FeedSourceType::Api => self.log_type().unwrap_or(FeedSourceType::Api.as_str()),
            other => other.as_str(),
        }
    }

    /// JSON form of the settings object
    pub fn to_value(&self) -> serde_json::Result<Value> {
        with_settings!(self, s => serde_json::to_value(s))
    }

    /// Decode `value` into this shape, replacing the current settings
    pub fn decode_settings(&mut self, value: Value) -> serde_json::Result<()> {
        with_settings!(self, s => s.decode_keyed(value))
    }

    /// Splice credentials back from the configuration originally submitted.
    ///
    /// Does nothing when `original` is a different shape.
    pub fn restore_secrets(&mut self, original: &Self) {
        match (self, original) {
            (Self::AmazonS3(read), Self::AmazonS3(orig)) => read.restore_secrets(orig),
            (Self::AmazonS3V2(read), Self::AmazonS3V2(orig)) => read.restore_secrets(orig),
            (Self::AmazonSqs(read), Self::AmazonSqs(orig)) => read.restore_secrets(orig),
            (Self::AmazonSqsV2(read), Self::AmazonSqsV2(orig)) => read.restore_secrets(orig),
            (Self::AzureBlobStore(read), Self::AzureBlobStore(orig)) => read.restore_secrets(orig),
            (Self::AzureBlobStoreV2(read), Self::AzureBlobStoreV2(orig)) => {
                read.restore_secrets(orig);
            }
            (Self::GoogleCloudStorage(read), Self::GoogleCloudStorage(orig)) => {
                read.restore_secrets(orig);
            }
            (Self::GoogleCloudStorageV2(read), Self::GoogleCloudStorageV2(orig)) => {
                read.restore_secrets(orig);
            }
            (Self::MicrosoftGraph(read), Self::MicrosoftGraph(orig)) => read.restore_secrets(orig),
            (Self::Office365(read), Self::Office365(orig)) => read.restore_secrets(orig),
            (Self::OktaSystemLog(read), Self::OktaSystemLog(orig)) => read.restore_secrets(orig),
            (Self::OktaUsers(read), Self::OktaUsers(orig)) => read.restore_secrets(orig),
            (Self::ProofpointSiem(read), Self::ProofpointSiem(orig)) => read.restore_secrets(orig),
            (Self::QualysVm(read), Self::QualysVm(orig)) => read.restore_secrets(orig),
            (Self::ThinkstCanary(read), Self::ThinkstCanary(orig)) => read.restore_secrets(orig),
            _ => {}
        }
    }

    /// Copy with every credential blanked, safe to log
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        with_settings!(&mut copy, s => s.redact_secrets());
        copy
    }
}
