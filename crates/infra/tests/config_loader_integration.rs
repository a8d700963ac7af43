//! Integration tests for the settings loader
//!
//! Tests the end-to-end path from a settings file to a working client.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use feedlink_domain::{ApiError, Region, RetryMode};
use feedlink_infra::{config, ApiClient, StaticTokenProvider};
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_settings(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_settings_from_toml_file() {
    let path = write_settings(
        r#"
region = "europe"
user_agent = "integration/0.1"
request_attempts = 3
request_timeout_secs = 10

[backoff]
initial_delay_ms = 10
max_delay_ms = 50

[base_paths]
subjects = "http://127.0.0.1:1/v1/subjects"
"#,
        "toml",
    );

    let settings = config::load_from_file(Some(path.clone())).expect("settings");

    assert_eq!(settings.region, Region::Europe);
    assert_eq!(settings.user_agent, "integration/0.1");
    assert_eq!(settings.request_attempts, 3);
    assert_eq!(settings.backoff.max_delay_ms, 50);
    assert_eq!(settings.retry_mode, RetryMode::Blind);

    let client = ApiClient::builder()
        .settings(settings)
        .auth(Arc::new(StaticTokenProvider::new("t")))
        .build()
        .expect("client");
    assert_eq!(client.base_paths().feeds, "https://europe-backstory.googleapis.com/v1/feeds");
    assert_eq!(client.base_paths().subjects, "http://127.0.0.1:1/v1/subjects");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_settings_with_minimal_fields() {
    let path = write_settings("{}", "json");

    let settings = config::load_from_file(Some(path.clone())).expect("settings");
    assert_eq!(settings, feedlink_domain::ClientSettings::default());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_settings_from_nonexistent_file() {
    let result = config::load_from_file(Some(PathBuf::from("/nonexistent/feedlink.toml")));
    assert!(matches!(result, Err(ApiError::Config(_))));
}

#[test]
fn test_load_settings_with_invalid_values() {
    let path = write_settings(r#"{"region": "moon"}"#, "json");
    assert!(matches!(config::load_from_file(Some(path.clone())), Err(ApiError::Config(_))));
    std::fs::remove_file(path).ok();

    let path = write_settings("request_attempts = -1\n", "toml");
    assert!(matches!(config::load_from_file(Some(path.clone())), Err(ApiError::Config(_))));
    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_file_settings_drive_requests() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/subjects/analyst"))
        .and(header("user-agent", "loader-test/2.0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let path = write_settings(
        &format!(
            r#"{{
                "user_agent": "loader-test/2.0",
                "base_paths": {{"subjects": "{}/v1/subjects"}}
            }}"#,
            server.uri()
        ),
        "json",
    );

    let settings = config::load_from_file(Some(path.clone()))?;
    let client = ApiClient::builder()
        .settings(settings)
        .auth(Arc::new(StaticTokenProvider::new("t")))
        .build()?;

    client.delete_subject("analyst", &CancellationToken::new()).await?;

    std::fs::remove_file(path).ok();
    Ok(())
}
