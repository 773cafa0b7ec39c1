// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end runs over catalog files on disk.

use std::fs;
use std::path::Path;
use wiremodel::{DiagnosticKind, SchemaCompiler};
use wiremodel_gen::{Pipeline, MANIFEST_FILE};

const CATALOG: &str = r#"
types:
  - name: acme.Order
    members:
      - { name: id, type: i64, annotations: { tag: 5 } }
      - { name: items, type: "Vec<acme.Item>" }
      - { name: status, type: acme.Order.Status }
  - name: acme.Order.Status
    class: enum
    enclosing: acme.Order
    constants: [OK, FAILED]
  - name: acme.Item
    members:
      - { name: sku, type: String }
      - { name: price, type: f64 }
"#;

fn write_catalog(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("types.yaml");
    fs::write(&path, CATALOG).expect("write catalog");
    path
}

fn load(dir: &Path, config: &str) -> Pipeline {
    let catalog = write_catalog(dir);
    let config_path = dir.join("wiremodel.toml");
    let out = dir.join("proto");
    fs::write(
        &config_path,
        format!("output_dir = {:?}\n{}", out.display().to_string(), config),
    )
    .expect("write config");
    Pipeline::load(&catalog, Some(&config_path)).expect("load")
}

#[test]
fn test_run_writes_schema_and_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pipeline = load(dir.path(), "");
    let outcome = pipeline.run().expect("run");

    assert_eq!(outcome.report.written.len(), 1);
    assert!(!outcome.has_errors());

    let text = fs::read_to_string(dir.path().join("proto/acme.proto")).expect("schema");
    assert!(text.starts_with("syntax = \"proto2\";\n\npackage acme;\n"));
    assert!(text.contains("import \"acme.proto\";"));
    assert!(text.contains("    optional int64 id = 5;\n"));
    assert!(text.contains("    repeated acme.Item items = 1;\n"));
    assert!(text.contains("    optional acme.Order.Status status = 2;\n"));
    assert!(text.contains("        Order_Status_OK = 0;\n"));
    assert!(text.contains("message Item {\n    optional string sku = 1;\n    optional double price = 2;\n}\n"));

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("proto").join(MANIFEST_FILE)).expect("manifest"),
    )
    .expect("json");
    assert_eq!(manifest["files"], serde_json::json!(["acme.proto"]));
    assert_eq!(manifest["namespaces"], serde_json::json!(["acme"]));
    assert_eq!(manifest["dialect"], "proto2");
    assert_eq!(manifest["resolve"]["unresolved"], 0);
    assert_eq!(manifest["diagnostics"]["errors"], 0);
}

#[test]
fn test_config_selects_dialect_and_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pipeline = load(
        dir.path(),
        "dialect = \"proto3\"\npackage_prefix = \"wire\"\ninclude_self_import = false\n",
    );
    pipeline.run().expect("run");

    let text = fs::read_to_string(dir.path().join("proto/acme.proto")).expect("schema");
    assert!(text.starts_with("syntax = \"proto3\";\n\npackage wire.acme;\n"));
    assert!(!text.contains("import"));
    assert!(text.contains("    int64 id = 5;\n"));
    assert!(text.contains("    repeated wire.acme.Item items = 1;\n"));
}

#[test]
fn test_missing_compiler_is_recorded_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut pipeline = load(dir.path(), "");
    pipeline.config.compiler = Some(SchemaCompiler::new("wiremodel-no-such-compiler"));

    let outcome = pipeline.run().expect("run");
    assert_eq!(outcome.report.written.len(), 1);
    assert_eq!(outcome.manifest.compiler_ok, Some(false));
    assert_eq!(
        outcome
            .report
            .diagnostics
            .of_kind(DiagnosticKind::Compiler)
            .count(),
        1
    );
    assert!(outcome.has_errors());
    assert_eq!(outcome.manifest.diagnostics.errors, 1);
}

#[cfg(unix)]
#[test]
fn test_successful_compiler_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut pipeline = load(dir.path(), "");
    pipeline.config.compiler = Some(SchemaCompiler::new("true"));

    let outcome = pipeline.run().expect("run");
    assert_eq!(outcome.manifest.compiler_ok, Some(true));
    assert!(!outcome.has_errors());
}

#[test]
fn test_unknown_catalog_extension_fails_to_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("types.txt");
    fs::write(&path, CATALOG).expect("write");
    assert!(Pipeline::load(&path, None).is_err());
}
