//! OpenAPI 3.0 document generator.
//!
//! Endpoints are grouped by path, then by lower-cased method, in first-seen
//! order. JSON Schemas attached to an endpoint are rendered as nested block
//! YAML under their `schema:` key.

use std::path::PathBuf;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use serde_yaml::Value as YamlValue;

use super::default_base_dir;
use crate::artifact::{Artifact, Report};
use crate::tools::Generator;

const INDENT: &str = "  ";

fn default_title() -> String {
    "Autocraft API".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_file() -> String {
    "openapi.yaml".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Endpoint {
    /// HTTP method, e.g., GET, POST
    pub method: String,
    /// /resource path
    pub path: String,
    #[serde(default, rename = "operationId", alias = "operation_id")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// JSON Schema for request body
    #[serde(default, rename = "requestSchema", alias = "request_schema")]
    pub request_schema: Option<JsonMap<String, JsonValue>>,
    /// JSON Schema for 200 OK response
    #[serde(default, rename = "responseSchema", alias = "response_schema")]
    pub response_schema: Option<JsonMap<String, JsonValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OpenApiArgs {
    /// API title
    #[serde(default = "default_title")]
    pub title: String,
    /// API version
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    /// Repo root
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Output file relative to repo root
    #[serde(default = "default_file")]
    pub file: String,
}

/// `value` as a single-line YAML scalar that reads back as the same string.
///
/// The scalar style is chosen by `serde_yaml`; multi-line text and anything
/// that would not round-trip falls back to a double-quoted JSON string, which
/// is also valid YAML.
pub fn yaml_scalar(value: &str) -> String {
    let expected = YamlValue::String(value.to_string());
    if !value.contains('\n') {
        if let Ok(text) = serde_yaml::to_string(&expected) {
            let text = text.trim_end_matches('\n');
            let text = text.strip_suffix("\n...").unwrap_or(text);
            let reads_back = serde_yaml::from_str::<YamlValue>(&format!("k: {text}"))
                .ok()
                .and_then(|doc| doc.get("k").cloned());
            if !text.contains('\n') && reads_back.as_ref() == Some(&expected) {
                return text.to_string();
            }
        }
    }
    serde_json::to_string(value).unwrap_or_else(|_| format!("'{}'", value.replace('\'', "''")))
}

fn push_mapping(lines: &mut Vec<String>, map: &JsonMap<String, JsonValue>, level: usize) {
    let pad = INDENT.repeat(level);
    for (key, value) in map {
        let key = yaml_scalar(key);
        match value {
            JsonValue::Object(inner) if !inner.is_empty() => {
                lines.push(format!("{pad}{key}:"));
                push_mapping(lines, inner, level + 1);
            }
            JsonValue::Array(items) if !items.is_empty() => {
                lines.push(format!("{pad}{key}:"));
                push_sequence(lines, items, level + 1);
            }
            other => lines.push(format!("{pad}{key}: {}", flow_scalar(other))),
        }
    }
}

fn push_sequence(lines: &mut Vec<String>, items: &[JsonValue], level: usize) {
    let pad = INDENT.repeat(level);
    for item in items {
        match item {
            JsonValue::Object(inner) if !inner.is_empty() => {
                lines.push(format!("{pad}-"));
                push_mapping(lines, inner, level + 1);
            }
            JsonValue::Array(inner) if !inner.is_empty() => {
                lines.push(format!("{pad}-"));
                push_sequence(lines, inner, level + 1);
            }
            other => lines.push(format!("{pad}- {}", flow_scalar(other))),
        }
    }
}

/// Scalars and empty collections; numbers, booleans and null as JSON.
fn flow_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::Object(_) => "{}".to_string(),
        JsonValue::Array(_) => "[]".to_string(),
        JsonValue::String(text) => yaml_scalar(text),
        other => other.to_string(),
    }
}

fn non_empty(schema: &Option<JsonMap<String, JsonValue>>) -> Option<&JsonMap<String, JsonValue>> {
    schema.as_ref().filter(|s| !s.is_empty())
}

/// Render the OpenAPI document text.
pub fn render_openapi(title: &str, version: &str, endpoints: &[Endpoint]) -> String {
    let mut paths: IndexMap<&str, IndexMap<String, &Endpoint>> = IndexMap::new();
    for endpoint in endpoints {
        paths
            .entry(endpoint.path.as_str())
            .or_default()
            .insert(endpoint.method.to_lowercase(), endpoint);
    }

    let mut lines = vec![
        "openapi: 3.0.3".to_string(),
        "info:".to_string(),
        format!("  title: {}", yaml_scalar(title)),
        format!("  version: {}", yaml_scalar(version)),
    ];

    if paths.is_empty() {
        lines.push("paths: {}".to_string());
    } else {
        lines.push("paths:".to_string());
    }

    for (path, methods) in &paths {
        lines.push(format!("  {}:", yaml_scalar(path)));
        for (method, endpoint) in methods {
            lines.push(format!("    {}:", yaml_scalar(method)));
            if let Some(summary) = endpoint.summary.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("      summary: {}", yaml_scalar(summary)));
            }
            if let Some(op_id) = endpoint.operation_id.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("      operationId: {}", yaml_scalar(op_id)));
            }
            if let Some(schema) = non_empty(&endpoint.request_schema) {
                lines.push("      requestBody:".to_string());
                lines.push("        required: true".to_string());
                lines.push("        content:".to_string());
                lines.push("          application/json:".to_string());
                lines.push("            schema:".to_string());
                push_mapping(&mut lines, schema, 7);
            }
            lines.push("      responses:".to_string());
            lines.push("        '200':".to_string());
            lines.push("          description: OK".to_string());
            if let Some(schema) = non_empty(&endpoint.response_schema) {
                lines.push("          content:".to_string());
                lines.push("            application/json:".to_string());
                lines.push("              schema:".to_string());
                push_mapping(&mut lines, schema, 8);
            }
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

pub struct OpenApiSchemaTool;

impl Generator for OpenApiSchemaTool {
    type Args = OpenApiArgs;
    const NAME: &'static str = "OpenAPISchemaTool";
    const DESCRIPTION: &'static str =
        "Generates a minimal OpenAPI 3.0 YAML file from a list of endpoints with JSON Schemas.";

    fn run(&self, args: OpenApiArgs) -> crate::Result<Report> {
        let content = render_openapi(&args.title, &args.version, &args.endpoints);
        Ok(Artifact::new(args.base_dir.join(&args.file), content)
            .write()?
            .into())
    }
}
