//! Concrete feed configuration shapes
//!
//! Every shape is a plain serde record whose JSON form is the object nested
//! under its envelope key in `details`. Shapes also know which of their
//! fields are credentials: the remote API never echoes those back, so a
//! decoded shape must be reconciled against the caller's original before it
//! is compared or displayed.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::source::FeedSourceType;

pub(crate) mod api;
mod queue;
mod storage;

pub use api::{
    HeaderKeyValue, HeaderKeyValueAuth, MicrosoftGraphSettings, OAuthClientCredentials,
    Office365Settings, OktaSystemLogSettings, OktaUsersSettings, ProofpointSiemSettings,
    QualysVmSettings, ThinkstCanarySettings, UserSecretAuth,
};
pub use queue::{SqsAccessKeySecretAuth, SqsAuthentication, SqsSettings, SqsV2Settings};
pub use storage::{
    AzureBlobStoreSettings, AzureBlobStoreV2Settings, AzureSharedKeyAuth, GcsSettings,
    GcsV2Settings, S3Authentication, S3Settings, S3V2Settings,
};

/// Placeholder written over credentials in redacted copies
pub const REDACTED: &str = "<redacted>";

/// Behaviour shared by every concrete configuration shape
pub trait FeedSettings:
    Serialize + DeserializeOwned + Clone + Default + PartialEq + Debug + Send + Sync
{
    /// Property name of this shape inside the envelope's `details` block
    fn envelope_key(&self) -> &'static str;

    /// Value written to `details.feedSourceType`
    fn source_type(&self) -> FeedSourceType;

    /// Log type fixed by the shape itself (API family only)
    fn log_type(&self) -> Option<&'static str> {
        None
    }

    /// Splice back fields the server strips from reads.
    ///
    /// Credentials are always taken from `original`; other stripped fields
    /// only when the read value is empty.
    fn restore_secrets(&mut self, original: &Self);

    /// Blank every credential field
    fn redact_secrets(&mut self);

    /// Replace `self` with the shape decoded from its keyed sub-object.
    ///
    /// Shapes that carry state outside their JSON override this to keep it.
    fn decode_keyed(&mut self, value: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(value)?;
        Ok(())
    }
}

/// Copy a credential from the original configuration
pub(crate) fn restore(field: &mut String, original: &str) {
    original.clone_into(field);
}

/// Copy a stripped field back when the server left it empty
pub(crate) fn restore_if_empty(field: &mut String, original: &str) {
    if field.is_empty() {
        original.clone_into(field);
    }
}

/// Overwrite a credential with [`REDACTED`] unless it is already empty
pub(crate) fn redact(field: &mut String) {
    if !field.is_empty() {
        REDACTED.clone_into(field);
    }
}
