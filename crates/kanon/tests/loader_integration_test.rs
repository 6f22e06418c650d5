//! Integration tests for descriptor loading
//!
//! These tests load descriptor files from disk and validate JSON input
//! against the compiled schemas.

use kanon::guards::is_object;
use kanon::{DescriptorFormat, Error, LoaderConfig, SchemaLoader, SchemaRegistry, SchemaTag};
use kanon_value::Value;
use std::fs;
use tempfile::TempDir;

const ORDER: &str = r#"{
  "definitions": {
    "line": {
      "type": "object",
      "strict": true,
      "fields": {
        "sku": { "type": "string", "pattern": "^[A-Z]{3}-[0-9]+$" },
        "quantity": { "type": "integer", "min": 1 },
        "note": { "type": "string", "nullish": true }
      }
    }
  },
  "schema": {
    "type": "object",
    "fields": {
      "id": { "type": "string", "format": "uuid" },
      "status": { "type": "enum", "values": ["open", "shipped"], "default": "open" },
      "lines": { "type": "array", "items": { "type": "ref", "name": "line" }, "nonempty": true }
    }
  }
}"#;

fn order(lines: Value) -> Value {
    Value::object([
        ("id", Value::from("550e8400-e29b-41d4-a716-446655440000")),
        ("lines", lines),
    ])
}

fn line(sku: &str, quantity: i32) -> Value {
    Value::object([("sku", Value::from(sku)), ("quantity", Value::from(quantity))])
}

#[test]
fn test_load_json_file_and_validate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("order.json");
    fs::write(&path, ORDER).unwrap();

    let loader = SchemaLoader::default();
    let schema = loader.load_file(&path).unwrap();
    assert!(is_object(&schema));

    let data = schema.parse(&order(Value::array(vec![line("ABC-1", 2)]))).unwrap();
    let Value::Object(fields) = &data else {
        panic!("expected an object");
    };
    assert_eq!(fields.get_str("status"), Some(&Value::from("open")));

    assert_eq!(
        schema.safe_parse(&order(Value::array(vec![line("abc", 2)]))).error(),
        Some("Property 'lines': Item 0: Property 'sku': String must match pattern ^[A-Z]{3}-[0-9]+$")
    );
    assert_eq!(
        schema.safe_parse(&order(Value::array(vec![]))).error(),
        Some("Property 'lines': Array must contain at least 1 item(s)")
    );
}

#[test]
fn test_yaml_search_path_and_shared_registry() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("point.yml"),
        "schema:\n  type: tuple\n  items: [{ type: number }, { type: number }]\n  rest: { type: ref, name: label }\n",
    )
    .unwrap();

    let registry = SchemaRegistry::new();
    registry.register("label", kanon::string());
    let loader = SchemaLoader::with_registry(
        registry.clone(),
        LoaderConfig {
            search_paths: vec![dir.path().to_path_buf()],
            default_format: DescriptorFormat::Json,
        },
    );

    let schema = loader.load("point").unwrap();
    assert_eq!(schema.tag(), SchemaTag::Tuple);
    assert!(registry.contains("point"));
    assert!(
        schema
            .safe_parse(&Value::array(vec![Value::from(1), Value::from(2), Value::from("x")]))
            .is_success()
    );
    assert!(!schema.safe_parse(&Value::array(vec![Value::from(1)])).is_success());
}

#[test]
fn test_missing_file_reports_search_paths() {
    let loader = SchemaLoader::new(LoaderConfig {
        search_paths: vec!["does-not-exist".into()],
        ..LoaderConfig::default()
    });
    let err = loader.load("anything").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn test_malformed_descriptor_is_rejected() {
    let loader = SchemaLoader::default();
    let err = loader
        .load_str(r#"{"schema": {"type": "string", "min_length": "two"}}"#, DescriptorFormat::Json)
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
