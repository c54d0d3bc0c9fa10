//! Bundle configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Data bindings handed to the archive name template.
pub type Bindings = BTreeMap<String, serde_json::Value>;

/// `[bundle]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleOptions {
    /// Archive file name template; missing means `assignment-{{_id}}.{{format}}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Arbitrary bindings for the template
    #[serde(default)]
    pub data: Bindings,
    /// Files and glob patterns, relative to each assignment directory
    #[serde(default)]
    pub include: Vec<String>,
}
