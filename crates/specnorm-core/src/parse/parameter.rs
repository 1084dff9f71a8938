use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::reference::Reference;
use super::schema::{Schema, SchemaOrRef, SchemaType};

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

/// An API parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl Parameter {
    /// A required string path parameter with nothing else set.
    pub fn path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Path,
            description: None,
            required: true,
            deprecated: None,
            schema: Some(SchemaOrRef::schema(Schema::of_type(SchemaType::String))),
            style: None,
            explode: None,
            extensions: IndexMap::new(),
        }
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref(Reference),
    Parameter(Parameter),
}

impl ParameterOrRef {
    /// The parameter's name, looking references up in `shared`
    /// (`components.parameters`). `None` for unresolvable references.
    pub fn resolved_name<'a>(
        &'a self,
        shared: &'a IndexMap<String, ParameterOrRef>,
    ) -> Option<&'a str> {
        match self {
            Self::Parameter(param) => Some(param.name.as_str()),
            Self::Ref(r) => match shared.get(r.component_name("parameters")?) {
                Some(Self::Parameter(param)) => Some(param.name.as_str()),
                _ => None,
            },
        }
    }
}
