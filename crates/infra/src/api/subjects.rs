//! RBAC subject operations

use feedlink_domain::{ApiError, Subject};
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use super::client::{decode, encode, ApiClient};
use super::endpoints::{item_url, Operation};

impl ApiClient {
    #[instrument(skip(self, cancel))]
    pub async fn get_subject(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Subject, ApiError> {
        let url = item_url(&self.base_paths().subjects, name);
        let bytes = self.call(Operation::GetSubject, Method::GET, &url, None, cancel).await?;
        decode(&bytes)
    }

    #[instrument(skip_all, fields(name = %subject.name))]
    pub async fn create_subject(
        &self,
        subject: &Subject,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let body = encode(subject)?;
        let url = &self.base_paths().subjects;
        self.call(Operation::CreateSubject, Method::POST, url, Some(&body), cancel).await?;
        debug!(roles = subject.roles.len(), "subject created");
        Ok(())
    }

    #[instrument(skip_all, fields(name = %subject.name))]
    pub async fn update_subject(
        &self,
        subject: &Subject,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let body = encode(subject)?;
        let url = item_url(&self.base_paths().subjects, &subject.name);
        self.call(Operation::UpdateSubject, Method::PATCH, &url, Some(&body), cancel).await?;
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    pub async fn delete_subject(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let url = item_url(&self.base_paths().subjects, name);
        self.call(Operation::DeleteSubject, Method::DELETE, &url, None, cancel).await?;
        Ok(())
    }
}
