//! Endpoint catalog: regional base paths and the rate-limited operations

use feedlink_domain::{impl_wire_enum_conversions, BasePathOverrides, Region};

const FEEDS_PATH: &str = "/v1/feeds";
const RULES_PATH: &str = "/v2/detect/rules";
const SUBJECTS_PATH: &str = "/v1/subjects";
const REFERENCE_LISTS_PATH: &str = "/v2/lists";

/// One entry per rate-limited remote operation; each owns a token bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateFeed,
    GetFeed,
    ListFeeds,
    UpdateFeed,
    DeleteFeed,
    /// Shared by enable and disable
    EnableFeed,
    CreateRule,
    CreateRuleVersion,
    GetRule,
    DeleteRule,
    EnableLiveRule,
    EnableAlertingRule,
    VerifyYaraRule,
    CreateSubject,
    GetSubject,
    UpdateSubject,
    DeleteSubject,
    CreateReferenceList,
    GetReferenceList,
    UpdateReferenceList,
}

impl_wire_enum_conversions!(Operation {
    CreateFeed => "feeds.create",
    GetFeed => "feeds.get",
    ListFeeds => "feeds.list",
    UpdateFeed => "feeds.update",
    DeleteFeed => "feeds.delete",
    EnableFeed => "feeds.enable",
    CreateRule => "rules.create",
    CreateRuleVersion => "rules.createVersion",
    GetRule => "rules.get",
    DeleteRule => "rules.delete",
    EnableLiveRule => "rules.enableLiveRule",
    EnableAlertingRule => "rules.enableAlerting",
    VerifyYaraRule => "rules.verifyRule",
    CreateSubject => "subjects.create",
    GetSubject => "subjects.get",
    UpdateSubject => "subjects.update",
    DeleteSubject => "subjects.delete",
    CreateReferenceList => "referenceLists.create",
    GetReferenceList => "referenceLists.get",
    UpdateReferenceList => "referenceLists.update",
});

/// Base URL of every resource family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePaths {
    pub feeds: String,
    pub rules: String,
    pub subjects: String,
    pub reference_lists: String,
}

impl BasePaths {
    /// Default `https://{subdomain}.googleapis.com{path}` URLs for `region`
    pub fn for_region(region: Region) -> Self {
        let host = format!("https://{}.googleapis.com", region.subdomain());
        Self {
            feeds: format!("{host}{FEEDS_PATH}"),
            rules: format!("{host}{RULES_PATH}"),
            subjects: format!("{host}{SUBJECTS_PATH}"),
            reference_lists: format!("{host}{REFERENCE_LISTS_PATH}"),
        }
    }

    /// Replace the families named in `overrides`
    pub fn with_overrides(mut self, overrides: &BasePathOverrides) -> Self {
        let apply = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.trim_end_matches('/').to_string();
            }
        };
        apply(&mut self.feeds, &overrides.feeds);
        apply(&mut self.rules, &overrides.rules);
        apply(&mut self.subjects, &overrides.subjects);
        apply(&mut self.reference_lists, &overrides.reference_lists);
        self
    }

    /// Every family rooted at `base`, with the default paths appended
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            feeds: format!("{base}{FEEDS_PATH}"),
            rules: format!("{base}{RULES_PATH}"),
            subjects: format!("{base}{SUBJECTS_PATH}"),
            reference_lists: format!("{base}{REFERENCE_LISTS_PATH}"),
        }
    }
}

/// `{base}/{id}`
pub(crate) fn item_url(base: &str, id: &str) -> String {
    format!("{base}/{id}")
}

/// `{base}/{id}:{action}`, or `{base}:{action}` for collection actions
pub(crate) fn action_url(base: &str, id: Option<&str>, action: &str) -> String {
    match id {
        Some(id) => format!("{base}/{id}:{action}"),
        None => format!("{base}:{action}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_us_region_paths() {
        let paths = BasePaths::for_region(Region::Us);
        assert_eq!(paths.feeds, "https://backstory.googleapis.com/v1/feeds");
        assert_eq!(paths.rules, "https://backstory.googleapis.com/v2/detect/rules");
        assert_eq!(paths.subjects, "https://backstory.googleapis.com/v1/subjects");
        assert_eq!(paths.reference_lists, "https://backstory.googleapis.com/v2/lists");
    }

    #[test]
    fn test_regional_subdomain() {
        let paths = BasePaths::for_region(Region::EuropeWest2);
        assert_eq!(paths.feeds, "https://europe-west2-backstory.googleapis.com/v1/feeds");
    }

    #[test]
    fn test_overrides_replace_only_named_families() {
        let overrides = BasePathOverrides {
            feeds: Some("http://127.0.0.1:9000/feeds/".to_string()),
            ..Default::default()
        };
        let paths = BasePaths::for_region(Region::Europe).with_overrides(&overrides);

        assert_eq!(paths.feeds, "http://127.0.0.1:9000/feeds");
        assert_eq!(paths.rules, "https://europe-backstory.googleapis.com/v2/detect/rules");
    }

    #[test]
    fn test_action_urls() {
        let feeds = "https://h/v1/feeds";
        assert_eq!(action_url(feeds, Some("abc"), "enable"), "https://h/v1/feeds/abc:enable");
        assert_eq!(action_url(feeds, None, "verifyRule"), "https://h/v1/feeds:verifyRule");
        assert_eq!(item_url(feeds, "abc"), "https://h/v1/feeds/abc");
    }

    #[test]
    fn test_operation_names_are_unique() {
        let names: HashSet<_> = Operation::ALL.iter().map(Operation::as_str).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }
}
