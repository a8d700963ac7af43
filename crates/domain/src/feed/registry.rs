//! Discriminator pair to empty configuration shape

use super::configuration::FeedConfiguration;
use super::settings::{
    api, AzureBlobStoreSettings, AzureBlobStoreV2Settings, GcsSettings, GcsV2Settings,
    MicrosoftGraphSettings, Office365Settings, OktaSystemLogSettings, OktaUsersSettings,
    ProofpointSiemSettings, QualysVmSettings, S3Settings, S3V2Settings, SqsSettings,
    SqsV2Settings, ThinkstCanarySettings,
};
use super::source::{FeedSourceType, MicrosoftGraphContentType};

/// Empty configuration for a `details.feedSourceType` / `details.logType`
/// pair.
///
/// The log type only matters when the source type is `API`. Returns `None`
/// for any pair that names no known shape.
pub fn empty_instance_for(source_type: &str, log_type: &str) -> Option<FeedConfiguration> {
    let source_type: FeedSourceType = source_type.parse().ok()?;

    let configuration = match source_type {
        FeedSourceType::AmazonS3 => S3Settings::default().into(),
        FeedSourceType::AmazonS3V2 => S3V2Settings::default().into(),
        FeedSourceType::AmazonSqs => SqsSettings::default().into(),
        FeedSourceType::AmazonSqsV2 => SqsV2Settings::default().into(),
        FeedSourceType::AzureBlobStore => AzureBlobStoreSettings::default().into(),
        FeedSourceType::AzureBlobStoreV2 => AzureBlobStoreV2Settings::default().into(),
        FeedSourceType::GoogleCloudStorage => GcsSettings::default().into(),
        FeedSourceType::GoogleCloudStorageV2 => GcsV2Settings::default().into(),
        FeedSourceType::Api => return empty_api_instance_for(log_type),
    };
    Some(configuration)
}

fn empty_api_instance_for(log_type: &str) -> Option<FeedConfiguration> {
    if let Ok(content_type) = log_type.parse::<MicrosoftGraphContentType>() {
        return Some(MicrosoftGraphSettings::for_content_type(content_type).into());
    }

    let configuration = match log_type {
        api::OFFICE_365 => Office365Settings::default().into(),
        api::OKTA => OktaSystemLogSettings::default().into(),
        api::OKTA_USER_CONTEXT => OktaUsersSettings::default().into(),
        api::PROOFPOINT_MAIL => ProofpointSiemSettings::default().into(),
        api::QUALYS_VM => QualysVmSettings::default().into(),
        api::THINKST_CANARY => ThinkstCanarySettings::default().into(),
        _ => return None,
    };
    Some(configuration)
}

/// One empty instance of every registered shape, Microsoft Graph once per
/// content type
pub fn all_empty_instances() -> Vec<FeedConfiguration> {
    let mut all: Vec<FeedConfiguration> = vec![
        S3Settings::default().into(),
        S3V2Settings::default().into(),
        SqsSettings::default().into(),
        SqsV2Settings::default().into(),
        AzureBlobStoreSettings::default().into(),
        AzureBlobStoreV2Settings::default().into(),
        GcsSettings::default().into(),
        GcsV2Settings::default().into(),
        Office365Settings::default().into(),
        OktaSystemLogSettings::default().into(),
        OktaUsersSettings::default().into(),
        ProofpointSiemSettings::default().into(),
        QualysVmSettings::default().into(),
        ThinkstCanarySettings::default().into(),
    ];
    all.extend(
        MicrosoftGraphContentType::ALL
            .iter()
            .map(|ct| MicrosoftGraphSettings::for_content_type(*ct).into()),
    );
    all
}
