//! Detection rules

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, Result};

/// A detection rule as exchanged with the rules endpoint
///
/// Only `ruleText` is mandatory on the wire; every other field is omitted
/// when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rule {
    pub rule_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule_name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version_create_time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub compilation_state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub compilation_error: String,
    #[serde(rename = "liveRuleEnabled", skip_serializing_if = "crate::serde_util::is_false")]
    pub live_enabled: bool,
    #[serde(skip_serializing_if = "crate::serde_util::is_false")]
    pub alerting_enabled: bool,
}

impl Rule {
    pub fn new(rule_text: impl Into<String>) -> Self {
        Self { rule_text: rule_text.into(), ..Self::default() }
    }
}

/// Body of a `:verifyRule` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRuleRequest<'a> {
    pub rule_text: &'a str,
}

/// Compiler verdict on a rule text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleVerification {
    pub success: bool,
    /// Compiler output, only meaningful on failure
    pub context: String,
}

impl RuleVerification {
    /// # Errors
    ///
    /// [`ApiError::Config`] carrying the compiler context when the rule did
    /// not compile.
    pub fn into_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::Config(format!("compilation error: {}", self.context)))
        }
    }
}
