// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema text rendering.

use super::mapping::{is_map, is_repeated, proto_type_of, qualify, ProtoType};
use super::target::TargetStrategy;
use super::{file_name, is_generated, Dialect, ExportOptions};
use crate::builder::Registry;
use crate::model::{
    DescriptorId, FieldDescriptor, NamespaceDescriptor, RpcActionDescriptor, TypeDescriptor,
};

const INDENT: &str = "    ";

/// Line-oriented text sink with four-space indentation.
#[derive(Debug, Default)]
pub struct SchemaWriter {
    out: String,
    depth: usize,
}

impl SchemaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Run `body` one level deeper.
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Render one namespace as schema text. Pure: reads the registry only.
pub fn render_namespace(
    registry: &Registry,
    namespace: &NamespaceDescriptor,
    options: &ExportOptions,
) -> String {
    Renderer {
        registry,
        options,
        target: options.target.strategy(),
    }
    .render(namespace)
}

struct Renderer<'r> {
    registry: &'r Registry,
    options: &'r ExportOptions,
    target: &'static dyn TargetStrategy,
}

impl Renderer<'_> {
    fn render(&self, namespace: &NamespaceDescriptor) -> String {
        let mut w = SchemaWriter::new();
        let package = qualify(&self.options.package_prefix, &namespace.name);

        w.line(match self.options.dialect {
            Dialect::Proto2 => "syntax = \"proto2\";",
            Dialect::Proto3 => "syntax = \"proto3\";",
        });
        w.blank();
        w.line(format!("package {};", self.target.package_name(&package)));
        w.blank();
        if let Some(java) = self.target.java_package(&package) {
            w.line(format!("option java_package = \"{}\";", java));
            w.blank();
        }
        if let Some(csharp) = self.target.csharp_namespace(&package) {
            w.line(format!("option csharp_namespace = \"{}\";", csharp));
            w.blank();
        }

        let imports: Vec<String> = namespace
            .dependencies(self.options.include_self_import, self.options.emit_services)
            .into_iter()
            .filter(|dep| is_generated(dep, &self.options.reserved_prefixes))
            .collect();
        for dep in &imports {
            w.line(format!("import \"{}\";", file_name(dep)));
        }
        if !imports.is_empty() {
            w.blank();
        }

        let top: Vec<&TypeDescriptor> = namespace
            .types
            .values()
            .filter_map(|id| self.registry.get(*id))
            .collect();
        for desc in top.iter().filter(|d| d.is_enum()) {
            self.write_enum(&mut w, desc);
            w.blank();
        }
        for desc in top.iter().filter(|d| renders_as_message(self.registry, d)) {
            self.write_message(&mut w, desc);
            w.blank();
        }

        if self.options.emit_services && !namespace.actions.is_empty() {
            self.write_service(&mut w, namespace);
            w.blank();
        }
        w.finish()
    }

    fn write_enum(&self, w: &mut SchemaWriter, desc: &TypeDescriptor) {
        let prefix = format!("{}_", self.registry.relative_name(desc.id).replace('.', "_"));
        w.line(format!("enum {} {{", desc.simple_name));
        w.indented(|w| {
            for constant in desc.enum_constants() {
                w.line(format!("{}{} = {};", prefix, constant.name, constant.tag));
            }
        });
        w.line("}");
    }

    fn write_message(&self, w: &mut SchemaWriter, desc: &TypeDescriptor) {
        if let Some(rpc) = &desc.rpc {
            for path in &rpc.paths {
                w.line(format!("// REST: {}", path));
            }
        }
        w.line(format!("message {} {{", desc.simple_name));
        w.indented(|w| {
            // A template only holds the declarations nested in it.
            if !desc.is_template() {
                for field in desc.fields().iter().filter(|f| !f.ignored) {
                    w.line(self.field_line(field));
                }
            }
            let nested = self.nested(desc);
            for child in nested.iter().filter(|d| d.is_enum()) {
                w.blank();
                self.write_enum(w, child);
            }
            for child in nested.iter().filter(|d| renders_as_message(self.registry, d)) {
                w.blank();
                self.write_message(w, child);
            }
        });
        w.line("}");
    }

    fn nested(&self, desc: &TypeDescriptor) -> Vec<&TypeDescriptor> {
        desc.nested
            .values()
            .filter_map(|id| self.registry.get(*id))
            .collect()
    }

    fn field_line(&self, field: &FieldDescriptor) -> String {
        let ty = self.type_of(field.type_id);
        let repeated = is_repeated(self.registry, field.type_id);
        let label = match (self.options.dialect, repeated) {
            (_, true) => "repeated ",
            (Dialect::Proto2, false) if !is_map(self.registry, field.type_id) => "optional ",
            _ => "",
        };
        format!("{}{} {} = {};", label, ty, field.external_name, field.tag)
    }

    fn type_of(&self, id: Option<DescriptorId>) -> ProtoType {
        let ty = proto_type_of(self.registry, id, &self.options.package_prefix);
        self.target.type_name(&ty)
    }

    fn write_service(&self, w: &mut SchemaWriter, namespace: &NamespaceDescriptor) {
        w.line(format!("service {} {{", service_name(&namespace.name)));
        w.indented(|w| {
            for action in namespace.actions.values() {
                w.line(self.rpc_line(action));
            }
        });
        w.line("}");
    }

    fn rpc_line(&self, action: &RpcActionDescriptor) -> String {
        let stream = |on: bool| if on { "stream " } else { "" };
        format!(
            "rpc {} ({}{}) returns ({}{});",
            action.simple_name,
            stream(action.kind.streams_request()),
            self.type_of(action.request),
            stream(action.kind.streams_response()),
            self.type_of(action.response),
        )
    }
}

/// Enclosing placeholders render as messages. A template renders only when
/// something is declared inside it.
fn renders_as_message(registry: &Registry, desc: &TypeDescriptor) -> bool {
    if desc.is_template() {
        return has_declarations(registry, desc.nested.values().copied());
    }
    desc.is_message() || desc.is_enclosing()
}

/// Whether any of `ids` produces an enum or message declaration.
pub(crate) fn has_declarations(
    registry: &Registry,
    ids: impl IntoIterator<Item = DescriptorId>,
) -> bool {
    ids.into_iter()
        .filter_map(|id| registry.get(id))
        .any(|d| d.is_enum() || renders_as_message(registry, d))
}

/// `acme.api` becomes `ApiService`.
fn service_name(namespace: &str) -> String {
    let last = crate::introspect::simple_name_of(namespace);
    let mut chars = last.chars();
    let head: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{}Service", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_indents_nested_blocks() {
        let mut w = SchemaWriter::new();
        w.line("message A {");
        w.indented(|w| {
            w.line("optional int32 x = 1;");
            w.blank();
            w.line("message B {");
            w.line("}");
        });
        w.line("}");
        assert_eq!(
            w.finish(),
            "message A {\n    optional int32 x = 1;\n\n    message B {\n    }\n}\n"
        );
    }

    #[test]
    fn test_service_name() {
        assert_eq!(service_name("acme.api"), "ApiService");
        assert_eq!(service_name("orders"), "OrdersService");
    }

    #[test]
    fn test_empty_namespace_header() {
        let registry = Registry::new();
        let ns = NamespaceDescriptor::new("acme.orders");
        let options = ExportOptions {
            include_self_import: false,
            ..ExportOptions::default()
        };
        let text = render_namespace(&registry, &ns, &options);
        assert_eq!(
            text,
            "syntax = \"proto2\";\n\npackage acme.orders;\n\n\
             option java_package = \"proto.acme.orders\";\n\n\
             option csharp_namespace = \"WireMessage.Acme.Orders\";\n\n"
        );
    }
}
