pub mod codegen;
pub mod config;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod partition;
pub mod pipeline;
pub mod transform;

pub use pipeline::{NormalizeOptions, NormalizedDocument, Pipeline, RunReport, normalize_bytes};
