use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::json;

use crate::parse::operation::Operation;
use crate::parse::parameter::{Parameter, ParameterOrRef};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::schema::{Schema, SchemaOrRef};
use crate::parse::spec::OpenApiDocument;

static PATH_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// Status code and description of the synthesized success response.
pub const DEFAULT_RESPONSE_STATUS: &str = "200";
pub const DEFAULT_RESPONSE_DESCRIPTION: &str = "Default response";

/// Inputs to the completion pass that are not derived from the document.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    /// Definitions added to `components.schemas` when the name is absent.
    pub schemas: IndexMap<String, SchemaOrRef>,
}

impl CompletionOptions {
    /// The built-in definitions plus `extra` (which take precedence on name clash).
    pub fn with_builtin(extra: IndexMap<String, SchemaOrRef>) -> Self {
        let mut schemas = builtin_schemas();
        schemas.extend(extra);
        Self { schemas }
    }
}

/// Counts of everything a completion pass added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionReport {
    pub responses: usize,
    pub parameters: usize,
    pub schemas: usize,
}

impl CompletionReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Definitions the Metabase document references but never declares.
pub fn builtin_schemas() -> IndexMap<String, SchemaOrRef> {
    let schedule_map = json!({
        "type": "object",
        "properties": {
            "schedule_day": {"type": "string"},
            "schedule_frame": {"type": "string"},
            "schedule_hour": {"type": "integer"},
            "schedule_minute": {"type": "integer"},
            "schedule_type": {"type": "string"}
        },
        "required": ["schedule_type"]
    });

    let mut schemas = IndexMap::new();
    schemas.insert(
        "metabase_util_cron_ScheduleMap".to_string(),
        serde_json::from_value(schedule_map).expect("built-in schema is valid"),
    );
    schemas
}

/// Placeholder names in a path template, in order, without duplicates.
pub fn path_placeholders(path: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    PATH_PLACEHOLDER
        .captures_iter(path)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Fill in what downstream generators need but the document leaves out.
///
/// Running this on its own output adds nothing.
pub fn complete(doc: &mut OpenApiDocument, options: &CompletionOptions) -> CompletionReport {
    let mut report = CompletionReport::default();
    if !options.schemas.is_empty() {
        let components = doc.components_mut();
        for (name, schema) in &options.schemas {
            if components.insert_schema_if_absent(name, schema) {
                report.schemas += 1;
            }
        }
    }

    let shared_params = doc
        .components
        .as_ref()
        .map(|c| c.parameters.clone())
        .unwrap_or_default();

    for (path, item) in &mut doc.paths {
        let placeholders = path_placeholders(path);
        let path_level = declared_names(&item.parameters, &shared_params);

        for (method, op) in item.operations_mut() {
            if fill_missing_responses(op) {
                log::debug!("{} {path}: added default response", method.to_uppercase());
                report.responses += 1;
            }

            let mut declared = declared_names(&op.parameters, &shared_params);
            declared.extend(path_level.iter().cloned());

            for name in &placeholders {
                if declared.contains(*name) {
                    continue;
                }
                log::debug!(
                    "{} {path}: added path parameter '{name}'",
                    method.to_uppercase()
                );
                op.parameters
                    .push(ParameterOrRef::Parameter(Parameter::path(name)));
                report.parameters += 1;
            }
        }
    }

    log::debug!(
        "completion added {} responses, {} parameters, {} schemas",
        report.responses,
        report.parameters,
        report.schemas
    );
    report
}

/// Give an operation without any responses a single open-object `200`.
fn fill_missing_responses(op: &mut Operation) -> bool {
    if !op.responses.is_empty() {
        return false;
    }
    op.responses.insert(
        DEFAULT_RESPONSE_STATUS.to_string(),
        ResponseOrRef::Response(Response::json(
            DEFAULT_RESPONSE_DESCRIPTION,
            SchemaOrRef::schema(Schema::open_object()),
        )),
    );
    true
}

fn declared_names(
    params: &[ParameterOrRef],
    shared: &IndexMap<String, ParameterOrRef>,
) -> HashSet<String> {
    params
        .iter()
        .filter_map(|p| p.resolved_name(shared))
        .map(str::to_string)
        .collect()
}
