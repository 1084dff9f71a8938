use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PartitionError, PipelineError};

/// Normalized document file name inside a partition.
pub const SPEC_FILE_NAME: &str = "updated-openapi.json";

/// Keep the first two dot-separated components of a declared API version.
///
/// A version with a single component is used whole.
pub fn truncate_version(declared: &str) -> Result<String, PartitionError> {
    let declared = declared.trim();
    if declared.is_empty() {
        return Err(PartitionError::EmptyVersion);
    }
    Ok(declared.splitn(3, '.').take(2).collect::<Vec<_>>().join("."))
}

/// The isolated output location for one API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPartition {
    /// Truncated version, e.g. `0.51`.
    pub version: String,
    /// `<versions_root>/<version with '.' replaced by '_'>`.
    pub output_dir: PathBuf,
}

impl VersionPartition {
    pub fn new(declared: &str, versions_root: &Path) -> Result<Self, PartitionError> {
        let version = truncate_version(declared)?;
        let output_dir = versions_root.join(version.replace('.', "_"));
        Ok(Self {
            version,
            output_dir,
        })
    }

    /// Create the output directory. Succeeds if it already exists.
    pub fn ensure_dir(&self) -> Result<(), PipelineError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| PipelineError::Io {
            path: self.output_dir.clone(),
            source,
        })
    }

    pub fn spec_path(&self) -> PathBuf {
        self.output_dir.join(SPEC_FILE_NAME)
    }

    /// Path of a file inside this partition.
    pub fn file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}
