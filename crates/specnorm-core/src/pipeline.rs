//! End-to-end normalization run.
//!
//! Every stage consumes the whole output of the previous one and the first
//! failure aborts the run. Two runs targeting the same version directory must
//! not overlap; nothing here locks the output.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use minijinja::{Environment, context};
use serde_json::Value;

use crate::codegen::{self, CODEGEN_CONFIG_FILE_NAME, CodegenArtifact, CodegenInvocation};
use crate::config::{CollisionPolicy, SpecnormConfig};
use crate::error::{DecodeError, PipelineError};
use crate::fetch;
use crate::parse;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiDocument;
use crate::partition::{SPEC_FILE_NAME, VersionPartition};
use crate::transform::completer::{CompletionOptions, CompletionReport, complete};
use crate::transform::name_mapping::NameMapping;
use crate::transform::ref_rewriter::normalize_document;
use crate::transform::sanitizer::sanitize_bytes;

/// Name-mapping table file name inside a partition.
pub const NAMES_FILE_NAME: &str = "schema-names.json";

/// Options for the in-memory part of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub collision_policy: CollisionPolicy,
    pub completion: CompletionOptions,
}

impl NormalizeOptions {
    /// Options derived from project config: its collision policy, and the
    /// built-in synthetic schemas plus any configured ones.
    pub fn from_config(config: &SpecnormConfig) -> Result<Self, DecodeError> {
        let extra = config
            .inject_schemas
            .iter()
            .map(|(name, schema)| {
                let schema: SchemaOrRef = serde_json::from_value(schema.clone())?;
                Ok((name.clone(), schema))
            })
            .collect::<Result<IndexMap<_, _>, serde_json::Error>>()?;

        Ok(Self {
            collision_policy: config.collision_policy,
            completion: CompletionOptions::with_builtin(extra),
        })
    }
}

/// A fully normalized and completed document, with the mapping that produced it.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    pub document: OpenApiDocument,
    pub mapping: NameMapping,
    pub completion: CompletionReport,
}

impl NormalizedDocument {
    /// Two-space indented JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String, DecodeError> {
        let mut out = serde_json::to_string_pretty(&self.document)?;
        out.push('\n');
        Ok(out)
    }
}

/// Sanitize, parse, normalize names and references, decode, and complete.
pub fn normalize_bytes(
    raw: Vec<u8>,
    options: &NormalizeOptions,
) -> Result<NormalizedDocument, PipelineError> {
    let text = sanitize_bytes(raw).map_err(DecodeError::from)?;

    let untyped: Value = serde_json::from_str(&text).map_err(DecodeError::from)?;
    if !untyped.is_object() {
        return Err(DecodeError::NotAnObject.into());
    }

    let synthetic: Vec<&str> = options
        .completion
        .schemas
        .keys()
        .map(String::as_str)
        .collect();
    let (rewritten, mapping) = normalize_document(untyped, options.collision_policy, &synthetic)?;

    let mut document = parse::from_value(rewritten)?;
    let completion = complete(&mut document, &options.completion);

    Ok(NormalizedDocument {
        document,
        mapping,
        completion,
    })
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub partition: VersionPartition,
    pub spec_path: PathBuf,
    pub schema_count: usize,
    pub completion: CompletionReport,
    /// Generator output, when code generation ran.
    pub codegen_output: Option<String>,
}

/// Drives one run from source to persisted partition.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: SpecnormConfig,
}

impl Pipeline {
    pub fn new(config: SpecnormConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpecnormConfig {
        &self.config
    }

    /// Fetch the configured source and run every stage.
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let timeout = self.config.fetch.timeout_secs.map(Duration::from_secs);
        let raw = fetch::fetch_source(&self.config.source, timeout)?;
        self.run_on_bytes(raw)
    }

    /// Run every stage after fetch on already-retrieved bytes.
    pub fn run_on_bytes(&self, raw: Vec<u8>) -> Result<RunReport, PipelineError> {
        let options = NormalizeOptions::from_config(&self.config)?;
        let normalized = normalize_bytes(raw, &options)?;

        let partition = VersionPartition::new(
            &normalized.document.info.version,
            Path::new(&self.config.versions_dir),
        )?;
        log::info!(
            "API version {} → {}",
            partition.version,
            partition.output_dir.display()
        );

        let spec_path = self.persist(&partition, &normalized)?;

        let codegen_output = if self.config.codegen.enabled {
            let invocation = CodegenInvocation::new(
                &self.config.codegen,
                &codegen::config_path(&partition.output_dir),
                &spec_path,
            );
            match invocation.run() {
                Ok(output) => Some(output),
                Err(e) => {
                    log::warn!(
                        "code generation failed; normalized output kept in {}",
                        partition.output_dir.display()
                    );
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        Ok(RunReport {
            partition,
            spec_path,
            schema_count: normalized.mapping.len(),
            completion: normalized.completion,
            codegen_output,
        })
    }

    /// Write the normalized document and its companion files into the partition.
    fn persist(
        &self,
        partition: &VersionPartition,
        normalized: &NormalizedDocument,
    ) -> Result<PathBuf, PipelineError> {
        partition.ensure_dir()?;

        let spec_path = partition.spec_path();
        write_file(&spec_path, &normalized.to_pretty_json()?)?;

        let names = serde_json::to_string_pretty(&normalized.mapping.to_table())
            .map_err(DecodeError::from)?;
        write_file(&partition.file(NAMES_FILE_NAME), &names)?;

        let artifact = CodegenArtifact::for_partition(&self.config.codegen, &partition.output_dir);
        write_file(
            &codegen::config_path(&partition.output_dir),
            &artifact.to_yaml()?,
        )?;

        let readme = render_readme(&self.config.source, partition, normalized)?;
        write_file(&partition.file("README.md"), &readme)?;

        Ok(spec_path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), PipelineError> {
    fs::write(path, content).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Render the partition's "do not edit" README.
fn render_readme(
    source: &str,
    partition: &VersionPartition,
    normalized: &NormalizedDocument,
) -> Result<String, PipelineError> {
    let template_err = |source| PipelineError::Template {
        name: "README.md.j2".to_string(),
        source,
    };

    let mut env = Environment::new();
    env.add_template("README.md.j2", include_str!("../templates/README.md.j2"))
        .map_err(template_err)?;
    let tmpl = env.get_template("README.md.j2").map_err(template_err)?;

    let completion = normalized.completion;
    tmpl.render(context! {
        title => normalized.document.info.title,
        version => partition.version,
        declared_version => normalized.document.info.version,
        source => source,
        spec_file => SPEC_FILE_NAME,
        names_file => NAMES_FILE_NAME,
        codegen_file => CODEGEN_CONFIG_FILE_NAME,
        schema_count => normalized.mapping.len(),
        completion => context! {
            responses => completion.responses,
            parameters => completion.parameters,
            schemas => completion.schemas,
        },
    })
    .map_err(template_err)
}
