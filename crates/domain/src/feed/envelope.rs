//! Envelope assembly and disassembly
//!
//! Encoding merges the generic envelope with the configuration's settings
//! object under its key. Decoding is two-stage: the document is inspected
//! generically for the discriminators, the registry picks the shape, and
//! only then are the typed parts decoded. The untyped stage stays in this
//! module.

use serde_json::{Map, Value};
use tracing::debug;

use super::configuration::FeedConfiguration;
use super::registry::empty_instance_for;
use super::source::FeedSourceType;
use super::{Feed, FeedEnvelope};
use crate::errors::{ApiError, Result};

const DETAILS: &str = "details";
const SOURCE_TYPE: &str = "feedSourceType";
const LOG_TYPE: &str = "logType";

/// Build the wire document for `envelope` carrying `configuration`.
///
/// `details.feedSourceType` always comes from the configuration. API feeds
/// dictate their own log type: an empty envelope log type is filled in, a
/// different one is rejected.
///
/// # Errors
///
/// [`ApiError::Config`] on a log type conflict, [`ApiError::Decode`] if
/// serialization fails.
pub fn assemble(
    envelope: &FeedEnvelope,
    configuration: &FeedConfiguration,
) -> Result<Map<String, Value>> {
    let mut envelope = envelope.clone();
    envelope.details.source_type = Some(configuration.source_type());

    if let Some(required) = configuration.log_type() {
        if envelope.details.log_type.is_empty() {
            envelope.details.log_type = required.to_string();
        } else if envelope.details.log_type != required {
            return Err(ApiError::Config(format!(
                "log type `{}` does not match the `{}` configuration",
                envelope.details.log_type, required
            )));
        }
    }

    let settings = configuration.to_value().map_err(encode_error)?;

    let encoded = serde_json::to_value(&envelope).map_err(encode_error)?;
    let Value::Object(mut document) = encoded else {
        return Err(ApiError::Decode("feed envelope did not serialize to an object".to_string()));
    };

    let details = document.entry(DETAILS).or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(details) = details {
        details.insert(configuration.envelope_key().to_string(), settings);
    }

    Ok(document)
}

/// Split a wire document into envelope and configuration.
///
/// # Errors
///
/// - [`ApiError::Decode`] when `details` or a needed discriminator is missing,
///   or when any typed part fails to decode
/// - [`ApiError::UnrecognizedConfiguration`] when the discriminators name no
///   known shape
pub fn disassemble(document: Map<String, Value>) -> Result<Feed> {
    let details = document
        .get(DETAILS)
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::Decode("feed has no details block".to_string()))?;

    let source_type = details
        .get(SOURCE_TYPE)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Decode(format!("feed details lack `{SOURCE_TYPE}`")))?;

    let log_type = match details.get(LOG_TYPE).and_then(Value::as_str) {
        Some(log_type) => log_type,
        None if source_type == FeedSourceType::Api.as_str() => {
            return Err(ApiError::Decode(format!("API feed details lack `{LOG_TYPE}`")));
        }
        None => "",
    };

    let mut configuration = empty_instance_for(source_type, log_type).ok_or_else(|| {
        ApiError::UnrecognizedConfiguration {
            source_type: source_type.to_string(),
            log_type: log_type.to_string(),
        }
    })?;

    let key = configuration.envelope_key();
    let settings = match details.get(key) {
        Some(Value::Null) | None => {
            debug!(key, "Feed response carries no settings object, decoding empty");
            Value::Object(Map::new())
        }
        Some(settings) => settings.clone(),
    };
    configuration
        .decode_settings(settings)
        .map_err(|e| ApiError::Decode(format!("invalid `{key}`: {e}")))?;

    let envelope: FeedEnvelope = serde_json::from_value(Value::Object(document))
        .map_err(|e| ApiError::Decode(format!("invalid feed envelope: {e}")))?;

    Ok(Feed { envelope, configuration })
}

/// [`disassemble`] for an arbitrary JSON value
///
/// # Errors
///
/// [`ApiError::Decode`] if `value` is not an object, otherwise as
/// [`disassemble`].
pub fn disassemble_value(value: Value) -> Result<Feed> {
    match value {
        Value::Object(document) => disassemble(document),
        other => Err(ApiError::Decode(format!("expected a feed object, got {other}"))),
    }
}

fn encode_error(error: serde_json::Error) -> ApiError {
    ApiError::Decode(format!("failed to encode feed: {error}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::feed::settings::{
        MicrosoftGraphSettings, OAuthClientCredentials, OktaUsersSettings, S3Authentication,
        S3Settings,
    };
    use crate::feed::source::{FeedState, MicrosoftGraphContentType};

    fn s3_configuration() -> FeedConfiguration {
        S3Settings {
            s3_uri: "s3://bucket/path/".to_string(),
            source_type: "FILES".to_string(),
            source_deletion_option: "SOURCE_DELETION_NEVER".to_string(),
            authentication: S3Authentication {
                region: "EU_WEST_1".to_string(),
                access_key_id: "AKIAEXAMPLE".to_string(),
                secret_access_key: "wJalrXUtnFEMI".to_string(),
            },
        }
        .into()
    }

    #[test]
    fn test_assemble_places_settings_under_key() {
        let envelope = FeedEnvelope::new("S3 feed", "GITHUB").with_namespace("ns");

        let document = assemble(&envelope, &s3_configuration()).unwrap();

        let details = &document["details"];
        assert_eq!(details["feedSourceType"], "AMAZON_S3");
        assert_eq!(details["logType"], "GITHUB");
        assert_eq!(details["namespace"], "ns");
        assert_eq!(details["amazonS3Settings"]["s3Uri"], "s3://bucket/path/");
        assert!(document.get("name").is_none());
    }

    #[test]
    fn test_assemble_fills_api_log_type() {
        let envelope = FeedEnvelope::new("Okta users", "");
        let document = assemble(&envelope, &OktaUsersSettings::default().into()).unwrap();

        assert_eq!(document["details"]["feedSourceType"], "API");
        assert_eq!(document["details"]["logType"], "OKTA_USER_CONTEXT");
        assert_eq!(document["details"]["oktaUserContextSettings"], json!({"authentication": {}}));
    }

    #[test]
    fn test_assemble_rejects_conflicting_api_log_type() {
        let envelope = FeedEnvelope::new("Okta users", "OKTA");
        let err = assemble(&envelope, &OktaUsersSettings::default().into()).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_round_trip_preserves_envelope_and_configuration() {
        let envelope = FeedEnvelope {
            name: Some("feeds/42".to_string()),
            state: Some(FeedState::Active),
            ..FeedEnvelope::new("Graph", "").with_label("env", "prod")
        };
        let configuration: FeedConfiguration = MicrosoftGraphSettings {
            tenant_id: "tenant".to_string(),
            hostname: "graph.microsoft.com".to_string(),
            retrieve_groups: true,
            authentication: OAuthClientCredentials {
                client_id: "client".to_string(),
                client_secret: "secret".to_string(),
            },
            ..MicrosoftGraphSettings::for_content_type(MicrosoftGraphContentType::AzureAdContext)
        }
        .into();

        let feed = disassemble(assemble(&envelope, &configuration).unwrap()).unwrap();

        assert_eq!(feed.configuration, configuration);
        assert_eq!(feed.envelope.name.as_deref(), Some("feeds/42"));
        assert_eq!(feed.envelope.details.log_type, "AZURE_AD_CONTEXT");
        assert_eq!(feed.envelope.details.source_type, Some(FeedSourceType::Api));
        assert_eq!(feed.envelope.details.labels, envelope.details.labels);
    }

    #[test]
    fn test_s3_read_without_credentials_reconciles_with_original() {
        let original = s3_configuration();
        let response = json!({
            "name": "feeds/7f3a",
            "display_name": "S3 feed",
            "feedState": "ACTIVE",
            "details": {
                "feedSourceType": "AMAZON_S3",
                "logType": "GITHUB",
                "amazonS3Settings": {
                    "s3Uri": "s3://bucket/path/",
                    "sourceType": "FILES",
                    "sourceDeletionOption": "SOURCE_DELETION_NEVER",
                    "authentication": {"region": "EU_WEST_1"}
                }
            }
        });

        let feed = disassemble_value(response).unwrap();

        let FeedConfiguration::AmazonS3(read) = &feed.configuration else {
            panic!("wrong shape: {:?}", feed.configuration);
        };
        assert_eq!(read.s3_uri, "s3://bucket/path/");
        assert!(read.authentication.access_key_id.is_empty());
        assert_ne!(feed.configuration, original);

        let reconciled = feed.with_restored_secrets(&original);
        assert_eq!(reconciled.configuration, original);
    }

    #[test]
    fn test_missing_details_is_decode_error() {
        let err = disassemble_value(json!({"name": "feeds/1"})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_missing_source_type_is_decode_error() {
        let err = disassemble_value(json!({"details": {"logType": "GITHUB"}})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(msg) if msg.contains("feedSourceType")));
    }

    #[test]
    fn test_api_feed_without_log_type_is_decode_error() {
        let err = disassemble_value(json!({"details": {"feedSourceType": "API"}})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(msg) if msg.contains("logType")));
    }

    #[test]
    fn test_unknown_discriminator_is_unrecognized() {
        let err = disassemble_value(json!({
            "details": {"feedSourceType": "HTTP", "logType": "GITHUB"}
        }))
        .unwrap_err();

        assert_eq!(
            err,
            ApiError::UnrecognizedConfiguration {
                source_type: "HTTP".to_string(),
                log_type: "GITHUB".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_settings_fail_whole_read() {
        let err = disassemble_value(json!({
            "display_name": "broken",
            "details": {
                "feedSourceType": "AMAZON_S3_V2",
                "amazonS3V2Settings": {"maxLookbackDays": "many"}
            }
        }))
        .unwrap_err();

        assert!(matches!(err, ApiError::Decode(msg) if msg.contains("amazonS3V2Settings")));
    }

    #[test]
    fn test_missing_settings_object_decodes_empty_shape() {
        let feed = disassemble_value(json!({
            "details": {"feedSourceType": "GOOGLE_CLOUD_STORAGE_V2", "logType": "GCP_DNS"}
        }))
        .unwrap();

        let expected = FeedConfiguration::from(crate::feed::settings::GcsV2Settings::default());
        assert_eq!(feed.configuration, expected);
    }

    #[test]
    fn test_not_an_object_is_decode_error() {
        assert!(matches!(disassemble_value(json!([1, 2])), Err(ApiError::Decode(_))));
    }
}
