// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end build, resolve and export.

use wiremodel::{
    export, render_namespace, ActionEntry, Dialect, ExportOptions, MemberInfo, MethodKind,
    ModelBuilder, OpenPolicy, Registry, Target, TypeCatalog, TypeInfo, TypeRef,
};

fn ty(s: &str) -> TypeRef {
    s.parse().expect("type expression")
}

fn build(catalog: &TypeCatalog) -> Registry {
    let mut builder = ModelBuilder::new(catalog, &OpenPolicy);
    builder.register_all(&catalog.entries());
    let mut registry = builder.finish();
    registry.resolve();
    registry
}

fn render(registry: &Registry, namespace: &str, options: &ExportOptions) -> String {
    let ns = registry.namespace(namespace).expect("namespace registered");
    render_namespace(registry, ns, options)
}

fn no_self_import() -> ExportOptions {
    ExportOptions {
        include_self_import: false,
        ..ExportOptions::default()
    }
}

#[test]
fn test_full_file_layout() {
    let catalog = TypeCatalog::new().with(
        TypeInfo::message("acme.Point")
            .member(MemberInfo::new("a", ty("i32")))
            .member(MemberInfo::new("b", ty("i32")))
            .member(MemberInfo::new("c", ty("i32"))),
    );
    let registry = build(&catalog);
    let text = render(&registry, "acme", &ExportOptions::default());
    assert_eq!(
        text,
        r#"syntax = "proto2";

package acme;

option java_package = "proto.acme";

option csharp_namespace = "WireMessage.Acme";

import "acme.proto";

message Point {
    optional int32 a = 1;
    optional int32 b = 2;
    optional int32 c = 3;
}

"#
    );
}

#[test]
fn test_list_and_map_fields() {
    let catalog = TypeCatalog::new()
        .with(TypeInfo::message("acme.Item"))
        .with(
            TypeInfo::message("acme.Cart")
                .member(MemberInfo::new("items", ty("Vec<acme.Item>")))
                .member(MemberInfo::new("counts", ty("HashMap<String, i64>")))
                .member(MemberInfo::new("tags", ty("HashSet<String>")))
                .member(MemberInfo::new("owner", ty("String"))),
        );
    let registry = build(&catalog);

    let proto2 = render(&registry, "acme", &no_self_import());
    assert!(proto2.contains("    repeated acme.Item items = 1;\n"));
    assert!(proto2.contains("    map<string, int64> counts = 2;\n"));
    assert!(proto2.contains("    repeated string tags = 3;\n"));
    assert!(proto2.contains("    optional string owner = 4;\n"));

    let proto3 = render(
        &registry,
        "acme",
        &ExportOptions {
            dialect: Dialect::Proto3,
            ..no_self_import()
        },
    );
    assert!(proto3.starts_with("syntax = \"proto3\";\n"));
    assert!(proto3.contains("    repeated acme.Item items = 1;\n"));
    assert!(proto3.contains("    map<string, int64> counts = 2;\n"));
    assert!(proto3.contains("    string owner = 4;\n"));

    // Only the syntax line and the optional labels differ.
    let normalized = proto2
        .replace("syntax = \"proto2\";", "syntax = \"proto3\";")
        .replace("optional ", "");
    assert_eq!(normalized, proto3);
}

#[test]
fn test_leaf_kinds_map_to_scalars() {
    let catalog = TypeCatalog::new().with(
        TypeInfo::message("acme.Leaves")
            .member(MemberInfo::new("flag", ty("std.BoxedBool")))
            .member(MemberInfo::new("small", ty("u8")))
            .member(MemberInfo::new("ratio", ty("f32")))
            .member(MemberInfo::new("price", ty("std.Decimal")))
            .member(MemberInfo::new("ttl", ty("std.Duration")))
            .member(MemberInfo::new("at", ty("std.DateTime")))
            .member(MemberInfo::new("raw", ty("std.Byte[]")))
            .member(MemberInfo::new("buf", ty("std.ByteBuffer")))
            .member(MemberInfo::new("any", ty("std.Object"))),
    );
    let registry = build(&catalog);
    let text = render(&registry, "acme", &no_self_import());
    for line in [
        "optional bool flag = 1;",
        "optional int32 small = 2;",
        "optional float ratio = 3;",
        "optional string price = 4;",
        "optional string ttl = 5;",
        "optional string at = 6;",
        "optional bytes raw = 7;",
        "optional bytes buf = 8;",
        "optional UNKNOWN any = 9;",
    ] {
        assert!(text.contains(line), "missing `{}` in\n{}", line, text);
    }
    assert_eq!(
        registry.unknown_mappings().iter().collect::<Vec<_>>(),
        vec!["std.Object"]
    );
}

#[test]
fn test_import_closure() {
    let catalog = TypeCatalog::new()
        .with(TypeInfo::message("billing.Invoice").member(MemberInfo::new("total", ty("i64"))))
        .with(
            TypeInfo::message("acme.orders.Order")
                .member(MemberInfo::new("invoice", ty("billing.Invoice"))),
        );
    let registry = build(&catalog);

    let orders = render(&registry, "acme.orders", &no_self_import());
    assert!(orders.contains("import \"billing.proto\";\n"));
    assert!(orders.contains("optional billing.Invoice invoice = 1;"));

    let billing = render(&registry, "billing", &no_self_import());
    assert!(!billing.contains("import"));

    let billing_self = render(&registry, "billing", &ExportOptions::default());
    assert!(billing_self.contains("import \"billing.proto\";\n"));
    assert!(!billing_self.contains("acme_orders.proto"));
}

#[test]
fn test_reserved_namespaces_are_not_imported() {
    let catalog = TypeCatalog::new()
        .with(TypeInfo::message("java.util.Locale"))
        .with(
            TypeInfo::message("acme.User")
                .member(MemberInfo::new("locale", ty("java.util.Locale"))),
        );
    let registry = build(&catalog);
    let text = render(&registry, "acme", &no_self_import());
    assert!(!text.contains("import"));

    let dir = tempfile::tempdir().expect("tempdir");
    let report = export(&registry, dir.path(), &ExportOptions::default()).expect("export");
    let names: Vec<String> = report
        .written
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(names, vec!["acme.proto"]);
}

#[test]
fn test_sibling_enum_constants_do_not_collide() {
    let catalog = TypeCatalog::new()
        .with(TypeInfo::message("acme.Payment"))
        .with(TypeInfo::enumeration("acme.Payment.Status", &["OK", "DECLINED"]).nested_in("acme.Payment"))
        .with(TypeInfo::message("acme.Shipment"))
        .with(TypeInfo::enumeration("acme.Shipment.Status", &["OK", "LOST"]).nested_in("acme.Shipment"))
        .with(TypeInfo::enumeration("acme.Level", &["LOW", "HIGH"]));
    let registry = build(&catalog);
    let text = render(&registry, "acme", &no_self_import());

    assert!(text.contains("        Payment_Status_OK = 0;\n"));
    assert!(text.contains("        Payment_Status_DECLINED = 1;\n"));
    assert!(text.contains("        Shipment_Status_OK = 0;\n"));
    assert!(text.contains("    Level_HIGH = 1;\n"));

    // Namespace-scope enums come before messages.
    let level = text.find("enum Level").expect("level");
    let payment = text.find("message Payment").expect("payment");
    assert!(level < payment);
    assert!(text.contains("message Payment {\n\n    enum Status {\n"));
}

#[test]
fn test_enclosing_placeholder_renders_as_message() {
    let catalog = TypeCatalog::new().with(
        TypeInfo::enumeration("acme.Codes.Reason", &["NONE"]).nested_in("acme.Codes"),
    );
    let registry = build(&catalog);
    let text = render(&registry, "acme", &no_self_import());
    assert!(text.contains("message Codes {\n\n    enum Reason {\n        Codes_Reason_NONE = 0;\n    }\n}\n"));
}

#[test]
fn test_explicit_tag_end_to_end() {
    let catalog = TypeCatalog::new().with(
        TypeInfo::message("acme.User")
            .member(MemberInfo::new("id", ty("i32")).tag(5))
            .member(MemberInfo::new("name", ty("String"))),
    );
    let registry = build(&catalog);

    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("proto");
    let report = export(&registry, &out, &ExportOptions::default()).expect("export");
    assert_eq!(report.written, vec![out.join("acme.proto")]);
    assert!(report.failed.is_empty());

    let text = std::fs::read_to_string(out.join("acme.proto")).expect("read");
    assert!(text.contains("    optional int32 id = 5;\n    optional string name = 1;\n"));
}

#[test]
fn test_external_name_ignore_and_rest_paths() {
    let catalog = TypeCatalog::new().with(
        TypeInfo::message("acme.Login")
            .with_rpc(&["POST /login"])
            .member(MemberInfo::new("user", ty("String")).external_name("user_name"))
            .member(MemberInfo::new("session", ty("String")).ignored())
            .member(MemberInfo::new("remember", ty("bool"))),
    );
    let registry = build(&catalog);
    let text = render(&registry, "acme", &no_self_import());
    assert!(text.contains("// REST: POST /login\nmessage Login {\n"));
    assert!(text.contains("    optional string user_name = 1;\n"));
    assert!(!text.contains("session"));
    assert!(text.contains("    optional bool remember = 3;\n"));
}

#[test]
fn test_package_prefix_and_flatten_target() {
    let catalog = TypeCatalog::new()
        .with(TypeInfo::message("geo.Region"))
        .with(
            TypeInfo::message("acme.orders.Order")
                .member(MemberInfo::new("region", ty("geo.Region")))
                .member(MemberInfo::new("by_region", ty("HashMap<geo.Region, i32>"))),
        );
    let registry = build(&catalog);

    let prefixed = render(
        &registry,
        "acme.orders",
        &ExportOptions {
            package_prefix: "wire".into(),
            ..no_self_import()
        },
    );
    assert!(prefixed.contains("package wire.acme.orders;\n"));
    assert!(prefixed.contains("option java_package = \"proto.wire.acme.orders\";\n"));
    assert!(prefixed.contains("option csharp_namespace = \"WireMessage.Wire.Acme.Orders\";\n"));
    assert!(prefixed.contains("optional wire.geo.Region region = 1;"));

    let flat = render(
        &registry,
        "acme.orders",
        &ExportOptions {
            target: Target::Flatten,
            ..no_self_import()
        },
    );
    assert!(flat.contains("package acme_orders;\n"));
    assert!(flat.contains("optional geo_Region region = 1;"));
    assert!(flat.contains("map<geo_Region, int32> by_region = 2;"));
    assert!(flat.contains("import \"geo.proto\";"));
}

#[test]
fn test_services_block() {
    let mut catalog = TypeCatalog::new()
        .with(TypeInfo::message("acme.Query"))
        .with(TypeInfo::message("acme.Row"));
    catalog.add_action(
        ActionEntry::new("acme.api.Search")
            .request(ty("acme.Query"))
            .response(ty("acme.Row"))
            .kind(MethodKind::ServerStreaming),
    );
    catalog.add_action(
        ActionEntry::new("acme.api.Count")
            .request(ty("acme.Query"))
            .response(ty("i64")),
    );
    let registry = build(&catalog);
    let api = registry.namespace("acme.api").expect("api namespace");

    let without = render_namespace(&registry, api, &no_self_import());
    assert!(!without.contains("service"));
    assert!(!without.contains("import"));

    let with = render_namespace(
        &registry,
        api,
        &ExportOptions {
            emit_services: true,
            ..no_self_import()
        },
    );
    assert!(with.contains("import \"acme.proto\";\n"));
    assert!(with.contains(
        "service ApiService {\n    rpc Count (acme.Query) returns (int64);\n    rpc Search (acme.Query) returns (stream acme.Row);\n}\n"
    ));
}

#[test]
fn test_write_failure_skips_one_namespace() {
    let catalog = TypeCatalog::new()
        .with(TypeInfo::message("alpha.A"))
        .with(TypeInfo::message("beta.B"));
    let registry = build(&catalog);

    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(dir.path().join("alpha.proto")).expect("blocker");

    let report = export(&registry, dir.path(), &ExportOptions::default()).expect("export");
    assert_eq!(report.written, vec![dir.path().join("beta.proto")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].namespace, "alpha");
    assert!(report.diagnostics.has_errors());
    assert!(!report.is_clean());
}

#[test]
fn test_export_is_deterministic() {
    let catalog = TypeCatalog::new()
        .with(TypeInfo::message("zeta.Z").member(MemberInfo::new("a", ty("alpha.A"))))
        .with(TypeInfo::message("alpha.A").member(MemberInfo::new("m", ty("mid.M"))))
        .with(TypeInfo::message("mid.M"));
    let first = build(&catalog);
    let second = build(&catalog);
    for ns in ["alpha", "mid", "zeta"] {
        assert_eq!(
            render(&first, ns, &ExportOptions::default()),
            render(&second, ns, &ExportOptions::default())
        );
    }
    let zeta = render(&first, "zeta", &ExportOptions::default());
    assert!(zeta.contains("import \"alpha.proto\";\nimport \"zeta.proto\";\n\n"));
}

#[test]
fn test_action_only_namespace_needs_services() {
    let mut catalog = TypeCatalog::new()
        .with(TypeInfo::message("acme.Query"))
        .with(TypeInfo::message("acme.Row"));
    catalog.add_action(
        ActionEntry::new("acme.api.Search")
            .request(ty("acme.Query"))
            .response(ty("acme.Row")),
    );
    let registry = build(&catalog);

    let dir = tempfile::tempdir().expect("tempdir");
    let report = export(&registry, dir.path(), &ExportOptions::default()).expect("export");
    assert_eq!(report.written, vec![dir.path().join("acme.proto")]);
    assert!(!dir.path().join("acme_api.proto").exists());

    let dir = tempfile::tempdir().expect("tempdir");
    let options = ExportOptions {
        emit_services: true,
        ..ExportOptions::default()
    };
    let report = export(&registry, dir.path(), &options).expect("export");
    assert_eq!(report.written.len(), 2);
    let text = std::fs::read_to_string(dir.path().join("acme_api.proto")).expect("api schema");
    assert!(text.contains("service ApiService {\n"));
}
