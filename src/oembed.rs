use crate::iframe::PermissionPolicy;
use serde::{Deserialize, Serialize};

/// The subset of an oEmbed response that carries embeddable markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OEmbed {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub html: String,
}

impl OEmbed {
    /// Capabilities requested by the embed's iframe that `policy` lets through.
    pub fn allowed_permissions(&self, policy: &PermissionPolicy) -> Vec<String> {
        policy.filter(&self.html)
    }
}
