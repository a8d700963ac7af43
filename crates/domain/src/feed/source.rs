//! Wire enums for feed discriminators and lifecycle

/// Outer discriminator stored in `details.feedSourceType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedSourceType {
    AmazonS3,
    AmazonS3V2,
    AmazonSqs,
    AmazonSqsV2,
    AzureBlobStore,
    AzureBlobStoreV2,
    GoogleCloudStorage,
    GoogleCloudStorageV2,
    /// Shared by every API integration; `details.logType` picks the shape
    Api,
}

crate::impl_wire_enum_conversions!(FeedSourceType {
    AmazonS3 => "AMAZON_S3",
    AmazonS3V2 => "AMAZON_S3_V2",
    AmazonSqs => "AMAZON_SQS",
    AmazonSqsV2 => "AMAZON_SQS_V2",
    AzureBlobStore => "AZURE_BLOBSTORE",
    AzureBlobStoreV2 => "AZURE_BLOBSTORE_V2",
    GoogleCloudStorage => "GOOGLE_CLOUD_STORAGE",
    GoogleCloudStorageV2 => "GOOGLE_CLOUD_STORAGE_V2",
    Api => "API",
});

/// Lifecycle state reported in `feedState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedState {
    Active,
    Inactive,
    InProgress,
    Completed,
    Failed,
}

crate::impl_wire_enum_conversions!(FeedState {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
    Failed => "FAILED",
});

impl FeedState {
    /// Every state except `INACTIVE` counts as enabled
    pub fn is_enabled(self) -> bool {
        self != Self::Inactive
    }
}

/// Log types served by the Microsoft Graph integration
///
/// Each one nests its settings under a different envelope key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MicrosoftGraphContentType {
    AzureAdAudit,
    AzureAdContext,
    #[default]
    AzureAd,
    AzureMdmIntune,
    MicrosoftGraphAlert,
}

crate::impl_wire_enum_conversions!(MicrosoftGraphContentType {
    AzureAdAudit => "AZURE_AD_AUDIT",
    AzureAdContext => "AZURE_AD_CONTEXT",
    AzureAd => "AZURE_AD",
    AzureMdmIntune => "AZURE_MDM_INTUNE",
    MicrosoftGraphAlert => "MICROSOFT_GRAPH_ALERT",
});

impl MicrosoftGraphContentType {
    /// Property name of the settings object inside `details`
    pub const fn envelope_key(self) -> &'static str {
        match self {
            Self::AzureAdAudit => "azureAdAuditSettings",
            Self::AzureAdContext => "azureAdContextSettings",
            Self::AzureAd => "azureAdSettings",
            Self::AzureMdmIntune => "azureMdmIntuneSettings",
            Self::MicrosoftGraphAlert => "microsoftGraphAlertSettings",
        }
    }
}
