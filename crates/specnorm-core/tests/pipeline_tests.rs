use std::fs;
use std::path::Path;

use serde_json::Value;
use specnorm_core::config::{CollisionPolicy, SpecnormConfig};
use specnorm_core::error::{NormalizeError, PartitionError, PipelineError};
use specnorm_core::parse;
use specnorm_core::parse::parameter::{ParameterLocation, ParameterOrRef};
use specnorm_core::pipeline::{NAMES_FILE_NAME, NormalizeOptions, Pipeline, normalize_bytes};
use specnorm_core::transform::completer::{CompletionOptions, complete};
use specnorm_core::transform::ref_rewriter::{SCHEMA_REF_PREFIX, collect_refs};

const METABASE: &str = include_str!("fixtures/metabase-mini.json");

fn default_options() -> NormalizeOptions {
    NormalizeOptions::from_config(&SpecnormConfig::default()).unwrap()
}

fn normalized_value() -> Value {
    let out = normalize_bytes(METABASE.as_bytes().to_vec(), &default_options()).unwrap();
    serde_json::to_value(&out.document).unwrap()
}

fn offline_config(versions_dir: &Path) -> SpecnormConfig {
    SpecnormConfig {
        versions_dir: versions_dir.to_string_lossy().into_owned(),
        codegen: specnorm_core::config::CodegenConfig {
            enabled: false,
            ..Default::default()
        },
        ..SpecnormConfig::default()
    }
}

#[test]
fn every_schema_ref_resolves_after_normalization() {
    let doc = normalized_value();
    let schemas = doc["components"]["schemas"].as_object().unwrap();
    let refs = collect_refs(&doc);
    let schema_refs: Vec<_> = refs
        .iter()
        .filter_map(|r| r.strip_prefix(SCHEMA_REF_PREFIX))
        .collect();
    assert!(!schema_refs.is_empty());

    // The engine ref points at a registry name; ScheduleMap at the injected one.
    for name in schema_refs {
        assert!(schemas.contains_key(name), "dangling ref to {name}");
    }
}

#[test]
fn registry_keys_are_normalized_in_order() {
    let doc = normalized_value();
    let names: Vec<_> = doc["components"]["schemas"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(
        names,
        vec![
            "metabase_api_database_Database",
            "metabase_api_user_User_Model",
            "metabase_api_permission_group_Group",
            "metabase_driver_Engine",
            "Plain",
            "metabase_util_cron_ScheduleMap",
        ]
    );
}

#[test]
fn null_types_become_nullable() {
    let doc = normalized_value();
    let text = serde_json::to_string(&doc).unwrap();
    assert!(!text.contains(r#""type":"null""#));

    let user = &doc["components"]["schemas"]["metabase_api_user_User_Model"];
    assert_eq!(user["properties"]["locale"]["anyOf"][1]["nullable"], true);
    assert!(user["properties"]["locale"]["default"].is_null());

    let db = &doc["components"]["schemas"]["metabase_api_database_Database"];
    assert_eq!(db["properties"]["caveats"]["nullable"], true);
}

#[test]
fn unmodelled_content_survives() {
    let doc = normalized_value();
    assert_eq!(doc["servers"][0]["url"], "/api");
    let get = &doc["paths"]["/api/database/{id}"]["get"];
    assert_eq!(get["parameters"][0]["schema"]["minimum"], 1);
    assert_eq!(
        get["parameters"][1]["schema"]["enum"],
        serde_json::json!(["tables", "tables.fields"])
    );
    assert_eq!(
        doc["components"]["schemas"]["metabase_api_database_Database"]["required"],
        serde_json::json!(["id", "name"])
    );
}

#[test]
fn missing_path_parameter_injected_once() {
    let out = normalize_bytes(METABASE.as_bytes().to_vec(), &default_options()).unwrap();
    let sync = out.document.paths["/api/database/{id}/sync"]
        .post
        .as_ref()
        .unwrap();
    assert_eq!(sync.parameters.len(), 1);
    match &sync.parameters[0] {
        ParameterOrRef::Parameter(p) => {
            assert_eq!(p.name, "id");
            assert_eq!(p.location, ParameterLocation::Path);
            assert!(p.required);
        }
        other => panic!("expected inline parameter, got {other:?}"),
    }

    // Path-level `group-id` counts as declared; only `membership-id` is added.
    let membership = &out.document.paths
        ["/api/permissions/group/{group-id}/membership/{membership-id}"];
    let delete = membership.delete.as_ref().unwrap();
    let names: Vec<_> = delete
        .parameters
        .iter()
        .map(|p| match p {
            ParameterOrRef::Parameter(p) => p.name.as_str(),
            ParameterOrRef::Ref(r) => r.ref_path.as_str(),
        })
        .collect();
    assert_eq!(names, vec!["membership-id"]);
}

#[test]
fn missing_responses_get_open_object_default() {
    let doc = normalized_value();
    let responses = doc["paths"]["/api/database/{id}/sync"]["post"]["responses"]
        .as_object()
        .unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses["200"]["content"]["application/json"]["schema"],
        serde_json::json!({"type": "object", "additionalProperties": true})
    );
}

#[test]
fn completion_is_idempotent_across_output() {
    let out = normalize_bytes(METABASE.as_bytes().to_vec(), &default_options()).unwrap();
    assert_eq!(out.completion.responses, 3);
    assert_eq!(out.completion.parameters, 3);
    assert_eq!(out.completion.schemas, 1);

    let mut reparsed = parse::from_json(&out.to_pretty_json().unwrap()).unwrap();
    let options = CompletionOptions::with_builtin(Default::default());
    let second = complete(&mut reparsed, &options);
    assert!(second.is_empty(), "second pass added {second:?}");
    assert_eq!(reparsed, out.document);
}

#[test]
fn colliding_names_rejected_by_default() {
    let input = r#"{
        "openapi": "3.1.0",
        "info": {"title": "t", "version": "1.0.0"},
        "components": {"schemas": {"a.b": {}, "a-b": {}}}
    }"#;
    let err = normalize_bytes(input.as_bytes().to_vec(), &default_options()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Normalize(NormalizeError::NameCollision { .. })
    ));

    let options = NormalizeOptions {
        collision_policy: CollisionPolicy::Suffix,
        ..default_options()
    };
    let out = normalize_bytes(input.as_bytes().to_vec(), &options).unwrap();
    let schemas = &out.document.components.unwrap().schemas;
    assert!(schemas.contains_key("a_b"));
    assert!(schemas.contains_key("a_b_2"));
}

#[test]
fn suffix_keeps_plain_and_escaped_keys_apart() {
    let input = r#"{
        "openapi": "3.1.0",
        "info": {"title": "t", "version": "1.0.0"},
        "components": {"schemas": {
            "a/b": {"type": "string"},
            "a~1b": {"type": "integer"}
        }}
    }"#;
    let options = NormalizeOptions {
        collision_policy: CollisionPolicy::Suffix,
        ..default_options()
    };
    let out = normalize_bytes(input.as_bytes().to_vec(), &options).unwrap();
    let schemas = serde_json::to_value(&out.document.components.unwrap().schemas).unwrap();
    assert_eq!(schemas["a_b"]["type"], "string");
    assert_eq!(schemas["a_b_2"]["type"], "integer");
    assert_eq!(out.mapping.len(), 2);
}

#[test]
fn run_writes_version_partition() {
    let dir = tempfile::tempdir().unwrap();
    let versions = dir.path().join("versions");
    let pipeline = Pipeline::new(offline_config(&versions));

    let report = pipeline.run_on_bytes(METABASE.as_bytes().to_vec()).unwrap();
    assert_eq!(report.partition.version, "0.51");
    assert_eq!(report.partition.output_dir, versions.join("0_51"));
    assert_eq!(report.schema_count, 5);
    assert!(report.codegen_output.is_none());

    let written = fs::read_to_string(&report.spec_path).unwrap();
    assert!(written.starts_with("{\n  \"openapi\": \"3.1.0\""));
    assert!(written.ends_with("}\n"));

    let names: Value =
        serde_json::from_str(&fs::read_to_string(report.partition.file(NAMES_FILE_NAME)).unwrap())
            .unwrap();
    assert_eq!(
        names["metabase.api.user/User-Model"],
        "metabase_api_user_User_Model"
    );

    let codegen = fs::read_to_string(report.partition.file("oapi-codegen-config.yaml")).unwrap();
    assert!(codegen.contains("package: schema"));
    assert!(codegen.contains("client.gen.go"));
    assert!(report.partition.file("README.md").exists());

    // Re-running into the same partition overwrites cleanly
    pipeline.run_on_bytes(METABASE.as_bytes().to_vec()).unwrap();
}

#[test]
fn run_fetches_over_http() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/docs/openapi.json")
        .with_status(200)
        .with_body(METABASE)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let config = SpecnormConfig {
        source: format!("{}/api/docs/openapi.json", server.url()),
        ..offline_config(dir.path())
    };
    let report = Pipeline::new(config).run().unwrap();
    mock.assert();
    assert!(report.spec_path.ends_with("0_51/updated-openapi.json"));
}

#[test]
fn fetch_failure_writes_nothing() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/docs/openapi.json")
        .with_status(500)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let versions = dir.path().join("versions");
    let config = SpecnormConfig {
        source: format!("{}/api/docs/openapi.json", server.url()),
        ..offline_config(&versions)
    };
    let err = Pipeline::new(config).run().unwrap_err();
    assert!(matches!(err, PipelineError::Fetch(_)));
    assert!(!versions.exists());
}

#[test]
fn malformed_document_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let versions = dir.path().join("versions");
    let pipeline = Pipeline::new(offline_config(&versions));
    let err = pipeline.run_on_bytes(b"{\"openapi\": ".to_vec()).unwrap_err();
    assert!(matches!(err, PipelineError::Decode(_)));
    assert!(!versions.exists());
}

#[test]
fn missing_version_is_a_partition_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(offline_config(dir.path()));
    let err = pipeline
        .run_on_bytes(br#"{"openapi": "3.1.0", "info": {"title": "t"}}"#.to_vec())
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Partition(PartitionError::EmptyVersion)
    ));
}

#[cfg(unix)]
#[test]
fn codegen_failure_keeps_normalized_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = offline_config(dir.path());
    config.codegen.enabled = true;
    config.codegen.command = "sh".to_string();
    config.codegen.args = vec![
        "-c".to_string(),
        "echo generator blew up >&2; exit 1".to_string(),
        "codegen".to_string(),
    ];

    let err = Pipeline::new(config)
        .run_on_bytes(METABASE.as_bytes().to_vec())
        .unwrap_err();
    match err {
        PipelineError::Codegen(e) => assert!(e.to_string().contains("generator blew up")),
        other => panic!("expected codegen error, got {other:?}"),
    }
    assert!(dir.path().join("0_51/updated-openapi.json").exists());
}
