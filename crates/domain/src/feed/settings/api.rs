//! API-sourced feeds
//!
//! All of these share the `API` source type. The log type is what tells them
//! apart, so each shape reports a fixed log type except Microsoft Graph,
//! which serves several and carries the one it was built for.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{redact, restore_if_empty, FeedSettings};
use crate::feed::source::{FeedSourceType, MicrosoftGraphContentType};
use crate::serde_util::is_false;

/// OAuth client id and secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OAuthClientCredentials {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
}

impl OAuthClientCredentials {
    fn redact(&mut self) {
        redact(&mut self.client_secret);
    }
}

/// One HTTP header sent by the ingestion service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderKeyValue {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

/// Header based authentication (API tokens)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderKeyValueAuth {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub header_key_values: Vec<HeaderKeyValue>,
}

impl HeaderKeyValueAuth {
    /// Single header, the common case
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { header_key_values: vec![HeaderKeyValue { key: key.into(), value: value.into() }] }
    }

    fn redact(&mut self) {
        for header in &mut self.header_key_values {
            redact(&mut header.value);
        }
    }
}

/// Username and secret pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSecretAuth {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret: String,
}

impl UserSecretAuth {
    fn redact(&mut self) {
        redact(&mut self.secret);
    }
}

/// Microsoft Graph integrations (`AZURE_AD*`, `AZURE_MDM_INTUNE`,
/// `MICROSOFT_GRAPH_ALERT`)
///
/// `content_type` is not part of the JSON; it selects the envelope key and
/// is reconstructed from `details.logType` on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MicrosoftGraphSettings {
    #[serde(skip)]
    pub content_type: MicrosoftGraphContentType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub authentication: OAuthClientCredentials,
    /// `AZURE_AD_CONTEXT` only
    #[serde(skip_serializing_if = "is_false")]
    pub retrieve_devices: bool,
    /// `AZURE_AD_CONTEXT` only
    #[serde(skip_serializing_if = "is_false")]
    pub retrieve_groups: bool,
    /// `MICROSOFT_GRAPH_ALERT` only
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_endpoint: String,
}

impl MicrosoftGraphSettings {
    /// Empty settings for the given content type
    pub fn for_content_type(content_type: MicrosoftGraphContentType) -> Self {
        Self { content_type, ..Self::default() }
    }
}

impl FeedSettings for MicrosoftGraphSettings {
    fn envelope_key(&self) -> &'static str {
        self.content_type.envelope_key()
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::Api
    }

    fn log_type(&self) -> Option<&'static str> {
        Some(self.content_type.as_str())
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.hostname, &original.hostname);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }

    fn decode_keyed(&mut self, value: Value) -> serde_json::Result<()> {
        let content_type = self.content_type;
        *self = serde_json::from_value(value)?;
        self.content_type = content_type;
        Ok(())
    }
}

/// `office365Settings`, log type `OFFICE_365`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Office365Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tenant_id: String,
    /// Management activity content type, e.g. `AUDIT_AZURE_ACTIVE_DIRECTORY`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub authentication: OAuthClientCredentials,
}

impl FeedSettings for Office365Settings {
    fn envelope_key(&self) -> &'static str {
        "office365Settings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::Api
    }

    fn log_type(&self) -> Option<&'static str> {
        Some(OFFICE_365)
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.hostname, &original.hostname);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `oktaSettings`, log type `OKTA`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OktaSystemLogSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub authentication: HeaderKeyValueAuth,
}

impl FeedSettings for OktaSystemLogSettings {
    fn envelope_key(&self) -> &'static str {
        "oktaSettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::Api
    }

    fn log_type(&self) -> Option<&'static str> {
        Some(OKTA)
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.hostname, &original.hostname);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `oktaUserContextSettings`, log type `OKTA_USER_CONTEXT`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OktaUsersSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub manager_id_reference_field: String,
    pub authentication: HeaderKeyValueAuth,
}

impl FeedSettings for OktaUsersSettings {
    fn envelope_key(&self) -> &'static str {
        "oktaUserContextSettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::Api
    }

    fn log_type(&self) -> Option<&'static str> {
        Some(OKTA_USER_CONTEXT)
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.hostname, &original.hostname);
        restore_if_empty(
            &mut self.manager_id_reference_field,
            &original.manager_id_reference_field,
        );
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `proofpointMailSettings`, log type `PROOFPOINT_MAIL`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofpointSiemSettings {
    pub authentication: UserSecretAuth,
}

impl FeedSettings for ProofpointSiemSettings {
    fn envelope_key(&self) -> &'static str {
        "proofpointMailSettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::Api
    }

    fn log_type(&self) -> Option<&'static str> {
        Some(PROOFPOINT_MAIL)
    }

    fn restore_secrets(&mut self, original: &Self) {
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `qualysVmSettings`, log type `QUALYS_VM`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualysVmSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub authentication: UserSecretAuth,
}

impl FeedSettings for QualysVmSettings {
    fn envelope_key(&self) -> &'static str {
        "qualysVmSettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::Api
    }

    fn log_type(&self) -> Option<&'static str> {
        Some(QUALYS_VM)
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.hostname, &original.hostname);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

/// `thinkstCanarySettings`, log type `THINKST_CANARY`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinkstCanarySettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub authentication: HeaderKeyValueAuth,
}

impl FeedSettings for ThinkstCanarySettings {
    fn envelope_key(&self) -> &'static str {
        "thinkstCanarySettings"
    }

    fn source_type(&self) -> FeedSourceType {
        FeedSourceType::Api
    }

    fn log_type(&self) -> Option<&'static str> {
        Some(THINKST_CANARY)
    }

    fn restore_secrets(&mut self, original: &Self) {
        restore_if_empty(&mut self.hostname, &original.hostname);
        self.authentication = original.authentication.clone();
    }

    fn redact_secrets(&mut self) {
        self.authentication.redact();
    }
}

pub(crate) const OFFICE_365: &str = "OFFICE_365";
pub(crate) const OKTA: &str = "OKTA";
pub(crate) const OKTA_USER_CONTEXT: &str = "OKTA_USER_CONTEXT";
pub(crate) const PROOFPOINT_MAIL: &str = "PROOFPOINT_MAIL";
pub(crate) const QUALYS_VM: &str = "QUALYS_VM";
pub(crate) const THINKST_CANARY: &str = "THINKST_CANARY";

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_graph_content_type_is_not_serialized() {
        let settings = MicrosoftGraphSettings {
            tenant_id: "tenant".to_string(),
            retrieve_devices: true,
            ..MicrosoftGraphSettings::for_content_type(MicrosoftGraphContentType::AzureAdContext)
        };

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(
            value,
            json!({"tenantId": "tenant", "authentication": {}, "retrieveDevices": true})
        );
        assert_eq!(settings.envelope_key(), "azureAdContextSettings");
        assert_eq!(settings.log_type(), Some("AZURE_AD_CONTEXT"));
    }

    #[test]
    fn test_graph_decode_keeps_content_type() {
        let alert = MicrosoftGraphContentType::MicrosoftGraphAlert;
        let mut settings = MicrosoftGraphSettings::for_content_type(alert);

        settings
            .decode_keyed(json!({"tenantId": "t1", "authEndpoint": "https://login.example"}))
            .unwrap();

        assert_eq!(settings.content_type, MicrosoftGraphContentType::MicrosoftGraphAlert);
        assert_eq!(settings.auth_endpoint, "https://login.example");
    }

    #[test]
    fn test_header_auth_wire_shape_and_redaction() {
        let mut settings = OktaSystemLogSettings {
            hostname: "example.okta.com".to_string(),
            authentication: HeaderKeyValueAuth::single("Authorization", "SSWS token"),
        };
        assert_eq!(
            serde_json::to_value(&settings).unwrap()["authentication"],
            json!({"headerKeyValues": [{"key": "Authorization", "value": "SSWS token"}]})
        );

        settings.redact_secrets();
        assert_eq!(settings.authentication.header_key_values[0].key, "Authorization");
        assert_ne!(settings.authentication.header_key_values[0].value, "SSWS token");
    }

    #[test]
    fn test_restore_hostname_only_when_stripped() {
        let original = QualysVmSettings {
            hostname: "qualysapi.example.com".to_string(),
            authentication: UserSecretAuth { user: "svc".to_string(), secret: "pw".to_string() },
        };

        let mut stripped = QualysVmSettings::default();
        stripped.restore_secrets(&original);
        assert_eq!(stripped, original);

        let mut moved =
            QualysVmSettings { hostname: "new.example.com".to_string(), ..Default::default() };
        moved.restore_secrets(&original);
        assert_eq!(moved.hostname, "new.example.com");
        assert_eq!(moved.authentication, original.authentication);
    }
}
