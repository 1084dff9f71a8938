use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A `$ref` object. Sibling keys are kept so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Reference {
    pub fn new(ref_path: impl Into<String>) -> Self {
        Self {
            ref_path: ref_path.into(),
            summary: None,
            description: None,
            extensions: IndexMap::new(),
        }
    }

    /// The final name segment of a local component reference
    /// (`#/components/<section>/<name>`), if the reference points into `section`.
    pub fn component_name(&self, section: &str) -> Option<&str> {
        let (found, name) = self
            .ref_path
            .strip_prefix("#/components/")?
            .split_once('/')?;
        (found == section).then_some(name)
    }
}
