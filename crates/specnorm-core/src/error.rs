use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must be a JSON object")]
    NotAnObject,

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("schemas '{first}' and '{second}' both normalize to '{normalized}'")]
    NameCollision {
        first: String,
        second: String,
        normalized: String,
    },
}

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("document declares an empty info.version")]
    EmptyVersion,
}

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}\n{output}")]
    Failed {
        program: String,
        status: ExitStatus,
        output: String,
    },

    #[error("failed to render codegen config: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),

    #[error("generation error: {0}")]
    Codegen(#[from] CodegenError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}
