pub mod completer;
pub mod name_mapping;
pub mod name_normalizer;
pub mod ref_rewriter;
pub mod sanitizer;

pub use completer::{CompletionOptions, CompletionReport, complete};
pub use name_mapping::NameMapping;
pub use name_normalizer::normalize_schema_name;
pub use ref_rewriter::{normalize_document, rewrite_refs};
pub use sanitizer::sanitize;
