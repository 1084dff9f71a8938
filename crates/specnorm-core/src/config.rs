use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level project configuration loaded from `.specnorm.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpecnormConfig {
    /// URL (`http://`, `https://`) or local path of the source document.
    pub source: String,
    /// Root directory under which per-version partitions are written.
    pub versions_dir: String,
    pub collision_policy: CollisionPolicy,
    pub fetch: FetchConfig,
    pub codegen: CodegenConfig,
    /// Extra schema definitions injected into `components.schemas` when absent.
    pub inject_schemas: IndexMap<String, serde_json::Value>,
}

impl Default for SpecnormConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            versions_dir: "versions".to_string(),
            collision_policy: CollisionPolicy::default(),
            fetch: FetchConfig::default(),
            codegen: CodegenConfig::default(),
            inject_schemas: IndexMap::new(),
        }
    }
}

/// What to do when two distinct schema names normalize to the same symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Abort the run.
    #[default]
    Reject,
    /// Append `_2`, `_3`, ... to later names until the symbol is free.
    Suffix,
    /// Later names overwrite earlier ones.
    LastWins,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

/// External code generator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub enabled: bool,
    /// Symbol namespace of the generated bindings.
    pub package: String,
    pub generate: Vec<String>,
    /// File name of the generated bindings, relative to the partition directory.
    pub output_file: String,
    pub command: String,
    /// Arguments placed before `-config <file> <spec>`.
    pub args: Vec<String>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            package: "schema".to_string(),
            generate: vec![
                "types".to_string(),
                "client".to_string(),
                "models".to_string(),
            ],
            output_file: "client.gen.go".to_string(),
            command: "go".to_string(),
            args: vec![
                "run".to_string(),
                "github.com/deepmap/oapi-codegen/cmd/oapi-codegen".to_string(),
            ],
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".specnorm.yaml";

pub const DEFAULT_SOURCE: &str = "http://127.0.0.1:3002/api/docs/openapi.json";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SpecnormConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SpecnormConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# specnorm configuration
source: http://127.0.0.1:3002/api/docs/openapi.json
versions_dir: versions
collision_policy: reject   # reject | suffix | last_wins

fetch: {}
  # timeout_secs: 30

codegen:
  enabled: true
  package: schema
  generate: [types, client, models]
  output_file: client.gen.go
  command: go
  args: [run, github.com/deepmap/oapi-codegen/cmd/oapi-codegen]

inject_schemas: {}
  # my_Missing_Type:
  #   type: object
  #   additionalProperties: true
"#
}
