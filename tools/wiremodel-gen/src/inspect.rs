// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read-only view of a resolved model for the `inspect` command.

use serde::Serialize;
use std::fmt::Write as _;
use wiremodel::export::is_generated;
use wiremodel::{Diagnostic, DescriptorId, Registry};

#[derive(Debug, Clone, Serialize)]
pub struct TypeView {
    pub name: String,
    pub kind: &'static str,
    pub fields: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<TypeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceView {
    pub name: String,
    /// False for reserved namespaces.
    pub generated: bool,
    pub depends_on: Vec<String>,
    pub types: Vec<TypeView>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelView {
    pub namespaces: Vec<NamespaceView>,
    pub unknown_mappings: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModelView {
    pub fn from_registry<S: AsRef<str>>(registry: &Registry, reserved: &[S]) -> Self {
        let namespaces = registry
            .namespaces()
            .map(|ns| NamespaceView {
                name: ns.name.clone(),
                generated: is_generated(&ns.name, reserved),
                depends_on: ns.dependencies(false, true).into_iter().collect(),
                types: ns.types.values().map(|&id| type_view(registry, id)).collect(),
                actions: ns.actions.keys().cloned().collect(),
            })
            .collect();
        Self {
            namespaces,
            unknown_mappings: registry.unknown_mappings().iter().cloned().collect(),
            diagnostics: registry.diagnostics().iter().cloned().collect(),
        }
    }

    /// Indented text listing.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for ns in &self.namespaces {
            let marker = if ns.generated { "" } else { " (reserved)" };
            let _ = writeln!(out, "{}{}", ns.name, marker);
            if !ns.depends_on.is_empty() {
                let _ = writeln!(out, "  depends on: {}", ns.depends_on.join(", "));
            }
            for ty in &ns.types {
                write_type(&mut out, ty, 1);
            }
            for action in &ns.actions {
                let _ = writeln!(out, "  action {}", action);
            }
        }
        if !self.unknown_mappings.is_empty() {
            let _ = writeln!(out, "unknown: {}", self.unknown_mappings.join(", "));
        }
        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "{}", diagnostic);
        }
        out
    }
}

fn type_view(registry: &Registry, id: DescriptorId) -> TypeView {
    let desc = &registry[id];
    TypeView {
        name: desc.name.clone(),
        kind: desc.kind.label(),
        fields: desc.fields().len(),
        nested: desc
            .nested
            .values()
            .map(|&child| type_view(registry, child))
            .collect(),
    }
}

fn write_type(out: &mut String, ty: &TypeView, depth: usize) {
    let indent = "  ".repeat(depth);
    if ty.fields > 0 {
        let _ = writeln!(out, "{}{} {} ({} fields)", indent, ty.kind, ty.name, ty.fields);
    } else {
        let _ = writeln!(out, "{}{} {}", indent, ty.kind, ty.name);
    }
    for child in &ty.nested {
        write_type(out, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremodel::{MemberInfo, ModelBuilder, OpenPolicy, TypeCatalog, TypeInfo};

    fn registry() -> Registry {
        let catalog = TypeCatalog::new()
            .with(
                TypeInfo::message("acme.Order")
                    .member(MemberInfo::new("line", "acme.Order.Line".parse().expect("type"))),
            )
            .with(TypeInfo::message("acme.Order.Line").nested_in("acme.Order"));
        let mut builder = ModelBuilder::new(&catalog, &OpenPolicy);
        builder.register_all(&catalog.entries());
        let mut registry = builder.finish();
        registry.resolve();
        registry
    }

    #[test]
    fn test_view_groups_nested_types() {
        let view = ModelView::from_registry(&registry(), &["std"]);
        let acme = view
            .namespaces
            .iter()
            .find(|ns| ns.name == "acme")
            .expect("acme");
        assert!(acme.generated);
        assert_eq!(acme.types.len(), 1);
        assert_eq!(acme.types[0].name, "acme.Order");
        assert_eq!(acme.types[0].fields, 1);
        assert_eq!(acme.types[0].nested[0].name, "acme.Order.Line");

        let reserved = ModelView::from_registry(&registry(), &["acme"]);
        assert!(reserved.namespaces.iter().all(|ns| !ns.generated));
    }

    #[test]
    fn test_render_text() {
        let text = ModelView::from_registry(&registry(), &["std"]).render_text();
        assert!(text.starts_with(
            "acme\n  message acme.Order (1 fields)\n    message acme.Order.Line\n"
        ));

        let text = ModelView::from_registry(&registry(), &["acme"]).render_text();
        assert!(text.starts_with("acme (reserved)\n"));
    }
}
