use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::RequestBodyOrRef;
use super::parameter::ParameterOrRef;
use super::response::ResponseOrRef;
use super::schema::SchemaOrRef;

/// Reusable definitions. `schemas` is the schema registry that the
/// normalizer renames and every `#/components/schemas/...` reference targets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,

    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Components {
    /// Add a schema under `name` unless one is already registered.
    /// Returns whether it was added.
    pub fn insert_schema_if_absent(&mut self, name: &str, schema: &SchemaOrRef) -> bool {
        if self.schemas.contains_key(name) {
            return false;
        }
        self.schemas.insert(name.to_string(), schema.clone());
        true
    }
}
