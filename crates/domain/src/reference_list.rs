//! Reference lists used by detection rules

use serde::{Deserialize, Serialize};

/// How the lines of a reference list are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferenceListContentType {
    #[default]
    DefaultString,
    Regex,
    Cidr,
}

crate::impl_wire_enum_conversions!(ReferenceListContentType {
    DefaultString => "CONTENT_TYPE_DEFAULT_STRING",
    Regex => "REGEX",
    Cidr => "CIDR",
});

/// Fields that may be changed by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferenceListUpdateMask {
    pub lines: bool,
    pub description: bool,
}

impl ReferenceListUpdateMask {
    /// Comma separated `update_mask` query value
    pub fn to_query_value(self) -> String {
        let mut fields = Vec::with_capacity(2);
        if self.lines {
            fields.push("list.lines");
        }
        if self.description {
            fields.push("list.description");
        }
        fields.join(",")
    }
}

/// A named list of lines referenced from rules
///
/// Requests carry `content_type`/`create_time` in snake case while the
/// server answers with `contentType`/`createTime`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceList {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
    #[serde(
        rename(serialize = "content_type", deserialize = "contentType"),
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<ReferenceListContentType>,
    #[serde(
        rename(serialize = "create_time", deserialize = "createTime"),
        skip_serializing_if = "String::is_empty"
    )]
    pub create_time: String,
}

impl ReferenceList {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self { name: name.into(), lines, ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_content_type(mut self, content_type: ReferenceListContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Content type, `CONTENT_TYPE_DEFAULT_STRING` when the server omitted it
    pub fn effective_content_type(&self) -> ReferenceListContentType {
        self.content_type.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_uses_snake_case_fields() {
        let list = ReferenceList::new("allowed_cidrs", vec!["10.0.0.0/8".to_string()])
            .with_description("internal ranges")
            .with_content_type(ReferenceListContentType::Cidr);

        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({
                "name": "allowed_cidrs",
                "description": "internal ranges",
                "lines": ["10.0.0.0/8"],
                "content_type": "CIDR"
            })
        );
    }

    #[test]
    fn test_response_reads_camel_case_fields() {
        let list: ReferenceList = serde_json::from_value(json!({
            "name": "patterns",
            "lines": ["^a.*$"],
            "contentType": "REGEX",
            "createTime": "2024-02-02T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(list.content_type, Some(ReferenceListContentType::Regex));
        assert_eq!(list.create_time, "2024-02-02T10:00:00Z");
    }

    #[test]
    fn test_missing_content_type_defaults_to_string() {
        let list: ReferenceList = serde_json::from_value(json!({"name": "plain"})).unwrap();
        assert_eq!(list.content_type, None);
        assert_eq!(list.effective_content_type(), ReferenceListContentType::DefaultString);
    }

    #[test]
    fn test_update_mask() {
        let both = ReferenceListUpdateMask { lines: true, description: true };
        assert_eq!(both.to_query_value(), "list.lines,list.description");

        let lines = ReferenceListUpdateMask { lines: true, description: false };
        assert_eq!(lines.to_query_value(), "list.lines");
        assert_eq!(ReferenceListUpdateMask::default().to_query_value(), "");
    }
}
