use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::config::CodegenConfig;
use crate::error::CodegenError;

/// Config file name written next to the normalized document.
pub const CODEGEN_CONFIG_FILE_NAME: &str = "oapi-codegen-config.yaml";

/// The configuration artifact handed to the external code generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodegenArtifact {
    pub package: String,
    pub generate: Vec<String>,
    pub output: String,
}

impl CodegenArtifact {
    /// Artifact for a partition directory, with the bindings written inside it.
    pub fn for_partition(config: &CodegenConfig, output_dir: &Path) -> Self {
        Self {
            package: config.package.clone(),
            generate: config.generate.clone(),
            output: output_dir
                .join(&config.output_file)
                .to_string_lossy()
                .into_owned(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, CodegenError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// A ready-to-run generator invocation.
#[derive(Debug, Clone)]
pub struct CodegenInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CodegenInvocation {
    /// `<command> <args...> -config <config_path> <spec_path>`
    pub fn new(config: &CodegenConfig, config_path: &Path, spec_path: &Path) -> Self {
        let mut args = config.args.clone();
        args.push("-config".to_string());
        args.push(config_path.to_string_lossy().into_owned());
        args.push(spec_path.to_string_lossy().into_owned());
        Self {
            program: config.command.clone(),
            args,
        }
    }

    /// Run the generator and return its combined output.
    ///
    /// A non-zero exit is an error carrying whatever the tool printed.
    pub fn run(&self) -> Result<String, CodegenError> {
        log::info!("running {} {}", self.program, self.args.join(" "));
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| CodegenError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(CodegenError::Failed {
                program: self.program.clone(),
                status: output.status,
                output: combined,
            });
        }
        Ok(combined)
    }
}

/// Path of the codegen config inside `output_dir`.
pub fn config_path(output_dir: &Path) -> PathBuf {
    output_dir.join(CODEGEN_CONFIG_FILE_NAME)
}
