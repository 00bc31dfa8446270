use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Capabilities an embedded iframe may keep by default.
pub const SAFE_IFRAME_PERMISSIONS: [&str; 5] = [
    "autoplay",
    "clipboard-write",
    "picture-in-picture",
    "web-share",
    "fullscreen",
];

static ALLOW_ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"allow\s*=\s*["']([^"']+?)["']"#).expect("allow attribute pattern is valid")
});

static DEFAULT_POLICY: LazyLock<PermissionPolicy> = LazyLock::new(PermissionPolicy::default);

/// Returns every capability token requested through `allow="..."` attributes,
/// in order of appearance. Duplicates are kept.
pub fn extract_iframe_permissions(iframe: &str) -> Vec<String> {
    ALLOW_ATTRIBUTE_RE
        .captures_iter(iframe)
        .filter_map(|caps| caps.get(1))
        .flat_map(|value| value.as_str().split(';'))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Filters `iframe`'s requested capabilities through the default policy.
pub fn filter_safe_iframe_permissions(iframe: &str) -> Vec<String> {
    DEFAULT_POLICY.filter(iframe)
}

/// Read-only allowlist of iframe capabilities.
///
/// Matching is exact and case-sensitive; anything not listed is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPolicy {
    allowed: HashSet<String>,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::with_capabilities(SAFE_IFRAME_PERMISSIONS)
    }
}

impl PermissionPolicy {
    pub fn with_capabilities<I, S>(capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: capabilities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_allowed(&self, token: &str) -> bool {
        self.allowed.contains(token)
    }

    /// Approved tokens from `iframe`, in extraction order.
    pub fn filter(&self, iframe: &str) -> Vec<String> {
        extract_iframe_permissions(iframe)
            .into_iter()
            .filter(|token| self.is_allowed(token))
            .collect()
    }

    /// Approved tokens joined into a value for a fresh `allow` attribute.
    pub fn allow_attribute(&self, iframe: &str) -> String {
        self.filter(iframe).join("; ")
    }
}
