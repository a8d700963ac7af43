//! Reference list operations

use feedlink_domain::{ApiError, ReferenceList, ReferenceListUpdateMask};
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::client::{decode, encode, ApiClient};
use super::endpoints::{item_url, Operation};

impl ApiClient {
    /// Read a list; a missing content type comes back as
    /// `CONTENT_TYPE_DEFAULT_STRING`.
    #[instrument(skip(self, cancel))]
    pub async fn get_reference_list(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<ReferenceList, ApiError> {
        let url = item_url(&self.base_paths().reference_lists, name);
        let bytes = self.call(Operation::GetReferenceList, Method::GET, &url, None, cancel).await?;

        let mut list: ReferenceList = decode(&bytes)?;
        list.content_type.get_or_insert_with(Default::default);
        Ok(list)
    }

    /// Create a list and return the name the server stored it under.
    ///
    /// # Errors
    ///
    /// [`ApiError::Decode`] when the response carries no name.
    #[instrument(skip_all, fields(name = %list.name))]
    pub async fn create_reference_list(
        &self,
        list: &ReferenceList,
        cancel: &CancellationToken,
    ) -> Result<String, ApiError> {
        let body = encode(list)?;
        let url = &self.base_paths().reference_lists;
        let bytes = self
            .call(Operation::CreateReferenceList, Method::POST, url, Some(&body), cancel)
            .await?;

        let created: ReferenceList = decode(&bytes)?;
        if created.name.is_empty() {
            return Err(ApiError::Decode("create reference list response has no name".to_string()));
        }
        info!(lines = list.lines.len(), "reference list created");
        Ok(created.name)
    }

    /// Patch the fields selected by `mask` and return the stored list.
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] when `mask` selects nothing.
    #[instrument(skip_all, fields(name = %list.name))]
    pub async fn update_reference_list(
        &self,
        list: &ReferenceList,
        mask: ReferenceListUpdateMask,
        cancel: &CancellationToken,
    ) -> Result<ReferenceList, ApiError> {
        let mask = mask.to_query_value();
        if mask.is_empty() {
            return Err(ApiError::Config("reference list update selects no fields".to_string()));
        }

        let body = encode(list)?;
        let url = format!("{}?update_mask={mask}", self.base_paths().reference_lists);
        let bytes = self
            .call(Operation::UpdateReferenceList, Method::PATCH, &url, Some(&body), cancel)
            .await?;
        decode(&bytes)
    }
}
