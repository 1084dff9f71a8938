pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod reference;
pub mod response;
pub mod schema;
pub mod spec;

use crate::error::DecodeError;
use spec::OpenApiDocument;

/// Parse a typed OpenAPI document from JSON text.
pub fn from_json(input: &str) -> Result<OpenApiDocument, DecodeError> {
    let doc: OpenApiDocument = serde_json::from_str(input)?;
    validate_version(&doc)?;
    Ok(doc)
}

/// Decode a typed OpenAPI document from an already-parsed JSON tree.
pub fn from_value(value: serde_json::Value) -> Result<OpenApiDocument, DecodeError> {
    let doc: OpenApiDocument = serde_json::from_value(value)?;
    validate_version(&doc)?;
    Ok(doc)
}

fn validate_version(doc: &OpenApiDocument) -> Result<(), DecodeError> {
    if !doc.openapi.starts_with("3.") {
        return Err(DecodeError::UnsupportedVersion(doc.openapi.clone()));
    }
    Ok(())
}
