//! Feed management operations

use feedlink_domain::{
    assemble, disassemble_value, parse_feed_id, ApiError, Feed, FeedConfiguration, FeedEnvelope,
};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::client::{decode, ApiClient};
use super::endpoints::{action_url, item_url, Operation};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreatedFeed {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedPage {
    feeds: Vec<Value>,
}

impl ApiClient {
    /// Create a feed and return its id without the `feeds/` prefix.
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] if the envelope conflicts with the configuration,
    /// [`ApiError::Decode`] if the response carries no name, otherwise the
    /// transport's errors.
    #[instrument(skip_all, fields(display_name = %envelope.display_name))]
    pub async fn create_feed(
        &self,
        envelope: &FeedEnvelope,
        configuration: &FeedConfiguration,
        cancel: &CancellationToken,
    ) -> Result<String, ApiError> {
        let document = Value::Object(assemble(envelope, configuration)?);
        debug!(configuration = ?configuration.redacted(), "creating feed");

        let url = &self.base_paths().feeds;
        let bytes =
            self.call(Operation::CreateFeed, Method::POST, url, Some(&document), cancel).await?;

        let created: CreatedFeed = decode(&bytes)?;
        if created.name.is_empty() {
            return Err(ApiError::Decode("create feed response has no name".to_string()));
        }

        let id = parse_feed_id(&created.name).to_string();
        info!(feed_id = %id, kind = configuration.source_kind(), "feed created");
        Ok(id)
    }

    /// Read a feed back, decoding its concrete configuration.
    ///
    /// Secrets come back blanked; see [`Feed::with_restored_secrets`].
    ///
    /// # Errors
    ///
    /// [`ApiError::UnrecognizedConfiguration`] for an unknown shape,
    /// [`ApiError::Decode`] for a malformed one, and a 404
    /// [`ApiError::Status`] when the feed is gone.
    #[instrument(skip(self, cancel))]
    pub async fn read_feed(&self, id: &str, cancel: &CancellationToken) -> Result<Feed, ApiError> {
        let url = item_url(&self.base_paths().feeds, id);
        let bytes = self.call(Operation::GetFeed, Method::GET, &url, None, cancel).await?;
        disassemble_value(decode(&bytes)?)
    }

    /// Every feed visible to the caller.
    ///
    /// One element that cannot be decoded fails the whole listing.
    #[instrument(skip_all)]
    pub async fn list_feeds(&self, cancel: &CancellationToken) -> Result<Vec<Feed>, ApiError> {
        let url = &self.base_paths().feeds;
        let bytes = self.call(Operation::ListFeeds, Method::GET, url, None, cancel).await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let page: FeedPage = decode(&bytes)?;
        let feeds = page.feeds.into_iter().map(disassemble_value).collect::<Result<Vec<_>, _>>()?;
        debug!(count = feeds.len(), "feeds listed");
        Ok(feeds)
    }

    /// Replace the feed `id` with `envelope` and `configuration`.
    #[instrument(skip(self, envelope, configuration, cancel))]
    pub async fn update_feed(
        &self,
        id: &str,
        envelope: &FeedEnvelope,
        configuration: &FeedConfiguration,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let mut document = assemble(envelope, configuration)?;
        document.entry("name").or_insert_with(|| Value::String(id.to_string()));
        debug!(configuration = ?configuration.redacted(), "updating feed");

        let url = item_url(&self.base_paths().feeds, id);
        let body = Value::Object(document);
        self.call(Operation::UpdateFeed, Method::PATCH, &url, Some(&body), cancel).await?;
        Ok(())
    }

    /// Delete the feed `id`.
    ///
    /// A 404 is returned as is; callers decide whether "already gone" is
    /// success.
    #[instrument(skip(self, cancel))]
    pub async fn delete_feed(&self, id: &str, cancel: &CancellationToken) -> Result<(), ApiError> {
        let url = item_url(&self.base_paths().feeds, id);
        self.call(Operation::DeleteFeed, Method::DELETE, &url, None, cancel).await?;
        info!(feed_id = %id, "feed deleted");
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    pub async fn set_feed_enabled(
        &self,
        id: &str,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let action = if enabled { "enable" } else { "disable" };
        let url = action_url(&self.base_paths().feeds, Some(id), action);
        self.call(Operation::EnableFeed, Method::POST, &url, None, cancel).await?;
        Ok(())
    }
}
