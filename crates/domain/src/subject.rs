//! RBAC subjects, their roles and permissions

use serde::{Deserialize, Serialize};

/// A user or group bound to a set of roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    pub name: String,
    /// `SUBJECT_TYPE_ANALYST`, `SUBJECT_TYPE_IDP_GROUP`, ...
    #[serde(rename = "type")]
    pub subject_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
}

impl Subject {
    pub fn new(name: impl Into<String>, subject_type: impl Into<String>) -> Self {
        Self { name: name.into(), subject_type: subject_type.into(), roles: Vec::new() }
    }

    pub fn with_role(mut self, name: impl Into<String>) -> Self {
        self.roles.push(Role { name: name.into(), ..Role::default() });
        self
    }

    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|role| role.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub create_time: String,
    #[serde(skip_serializing_if = "crate::serde_util::is_false")]
    pub is_default: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Permission {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub create_time: String,
}
