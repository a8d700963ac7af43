//! Detection rule operations

use feedlink_domain::{ApiError, Rule, RuleVerification, VerifyRuleRequest};
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::client::{decode, encode, ApiClient};
use super::endpoints::{action_url, item_url, Operation};

impl ApiClient {
    #[instrument(skip(self, cancel))]
    pub async fn get_rule(&self, id: &str, cancel: &CancellationToken) -> Result<Rule, ApiError> {
        let url = item_url(&self.base_paths().rules, id);
        let bytes = self.call(Operation::GetRule, Method::GET, &url, None, cancel).await?;
        decode(&bytes)
    }

    /// Create a rule and return the server-assigned `ruleId`.
    #[instrument(skip_all)]
    pub async fn create_rule(
        &self,
        rule: &Rule,
        cancel: &CancellationToken,
    ) -> Result<String, ApiError> {
        let body = encode(rule)?;
        let url = &self.base_paths().rules;
        let bytes = self.call(Operation::CreateRule, Method::POST, url, Some(&body), cancel).await?;

        let created: Rule = decode(&bytes)?;
        if created.rule_id.is_empty() {
            return Err(ApiError::Decode("create rule response has no ruleId".to_string()));
        }
        info!(rule_id = %created.rule_id, "rule created");
        Ok(created.rule_id)
    }

    /// Publish `rule.rule_text` as a new version of `rule.rule_id`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] when the rule has no id.
    #[instrument(skip_all, fields(rule_id = %rule.rule_id))]
    pub async fn create_rule_version(
        &self,
        rule: &Rule,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        if rule.rule_id.is_empty() {
            return Err(ApiError::Config("rule id is required to create a version".to_string()));
        }

        let body = encode(rule)?;
        let url = action_url(&self.base_paths().rules, Some(&rule.rule_id), "createVersion");
        self.call(Operation::CreateRuleVersion, Method::POST, &url, Some(&body), cancel).await?;
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    pub async fn set_rule_alerting(
        &self,
        id: &str,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let action = if enabled { "enableAlerting" } else { "disableAlerting" };
        let url = action_url(&self.base_paths().rules, Some(id), action);
        self.call(Operation::EnableAlertingRule, Method::POST, &url, None, cancel).await?;
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    pub async fn set_rule_live(
        &self,
        id: &str,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> Result<(), ApiError> {
        let action = if enabled { "enableLiveRule" } else { "disableLiveRule" };
        let url = action_url(&self.base_paths().rules, Some(id), action);
        self.call(Operation::EnableLiveRule, Method::POST, &url, None, cancel).await?;
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    pub async fn delete_rule(&self, id: &str, cancel: &CancellationToken) -> Result<(), ApiError> {
        let url = item_url(&self.base_paths().rules, id);
        self.call(Operation::DeleteRule, Method::DELETE, &url, None, cancel).await?;
        info!(rule_id = %id, "rule deleted");
        Ok(())
    }

    /// Ask the server to compile `rule_text` without saving it.
    ///
    /// A rule that does not compile is a successful call; use
    /// [`RuleVerification::into_result`] to turn it into an error.
    #[instrument(skip_all)]
    pub async fn verify_yara_rule(
        &self,
        rule_text: &str,
        cancel: &CancellationToken,
    ) -> Result<RuleVerification, ApiError> {
        let body = encode(&VerifyRuleRequest { rule_text })?;
        let url = action_url(&self.base_paths().rules, None, "verifyRule");
        let bytes =
            self.call(Operation::VerifyYaraRule, Method::POST, &url, Some(&body), cancel).await?;
        decode(&bytes)
    }
}
