// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type introspection provider.
//!
//! The builder never looks at a host type system directly. It asks a
//! [`TypeIntrospector`] for [`TypeInfo`] records by canonical name and walks
//! members, methods, ancestors and annotations from there. [`TypeCatalog`]
//! is the file-backed implementation used by the generator.

mod catalog;
mod policy;
mod type_ref;

pub use catalog::{CatalogError, CatalogFormat, TypeCatalog};
pub use policy::{OpenPolicy, PatternPolicy, TypePolicy};
pub use type_ref::{resolve_alias, ParseTypeRefError, TypeRef, Wildcard, ALIASES};

use crate::model::ScalarKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Leaf kind hint attached to a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeClass {
    #[default]
    Message,
    Interface,
    Enum,
    Primitive,
    Boxed,
    String,
    Bytes,
    Buffer,
    Decimal,
    Duration,
    Date,
    List,
    Set,
    Map,
    /// Anything without a wire mapping.
    Opaque,
}

/// Explicit overrides carried by a member or accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<bool>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.name.is_none() && self.ignore.is_none()
    }
}

/// Instance or static member of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Opaque layout metadata, copied through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl MemberInfo {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            offset: None,
            annotations: Annotations::default(),
        }
    }

    pub fn tag(mut self, tag: u32) -> Self {
        self.annotations.tag = Some(tag);
        self
    }

    pub fn external_name(mut self, name: impl Into<String>) -> Self {
        self.annotations.name = Some(name.into());
        self
    }

    pub fn ignored(mut self) -> Self {
        self.annotations.ignore = Some(true);
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Method signature, reduced to what accessor discovery needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default)]
    pub params: usize,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, params: usize) -> Self {
        Self {
            name: name.into(),
            params,
            annotations: Annotations::default(),
        }
    }

    pub fn annotated(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

/// REST metadata attached to a message or handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcInfo {
    #[serde(default)]
    pub paths: Vec<String>,
}

/// RPC method shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodKind {
    #[default]
    Unary,
    ServerStreaming,
    ClientStreaming,
    BidiStreaming,
}

impl MethodKind {
    pub fn streams_request(self) -> bool {
        matches!(self, Self::ClientStreaming | Self::BidiStreaming)
    }

    pub fn streams_response(self) -> bool {
        matches!(self, Self::ServerStreaming | Self::BidiStreaming)
    }
}

/// Description of one type as seen by the introspection provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Canonical dotted name.
    pub name: String,
    /// Owning namespace. Derived from the name and enclosing chain when empty.
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub class: TypeClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<ScalarKind>,
    /// Canonical name of the lexically enclosing type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc: Option<RpcInfo>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>, class: TypeClass) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            class,
            scalar: None,
            enclosing: None,
            superclass: None,
            type_params: Vec::new(),
            is_abstract: false,
            members: Vec::new(),
            methods: Vec::new(),
            constants: Vec::new(),
            rpc: None,
        }
    }

    pub fn message(name: impl Into<String>) -> Self {
        Self::new(name, TypeClass::Message)
    }

    pub fn enumeration(name: impl Into<String>, constants: &[&str]) -> Self {
        let mut info = Self::new(name, TypeClass::Enum);
        info.constants = constants.iter().map(|c| c.to_string()).collect();
        info
    }

    pub fn scalar(name: impl Into<String>, class: TypeClass, kind: ScalarKind) -> Self {
        let mut info = Self::new(name, class);
        info.scalar = Some(kind);
        info
    }

    pub fn member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn nested_in(mut self, enclosing: impl Into<String>) -> Self {
        self.enclosing = Some(enclosing.into());
        self
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_rpc(mut self, paths: &[&str]) -> Self {
        self.rpc = Some(RpcInfo {
            paths: paths.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Abstract types, interfaces and enums contribute no members.
    pub fn has_members(&self) -> bool {
        !self.is_abstract && matches!(self.class, TypeClass::Message)
    }
}

/// Last dotted segment of a canonical name.
pub fn simple_name_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Everything before the last dotted segment.
pub fn parent_name_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(parent, _)| parent).unwrap_or("")
}

/// One superclass reached while walking a type's ancestor chain.
#[derive(Debug, Clone, Copy)]
pub struct Ancestor<'a> {
    pub info: &'a TypeInfo,
    /// Reference used by the subtype, carrying any generic arguments.
    pub reference: &'a TypeRef,
}

/// Source of type information for the builder.
pub trait TypeIntrospector {
    /// Look up a type by canonical name.
    fn describe(&self, name: &str) -> Option<&TypeInfo>;

    /// Superclass chain, nearest first. Stops at the first undescribed
    /// ancestor and never revisits a type.
    fn ancestors<'a>(&'a self, info: &'a TypeInfo) -> Vec<Ancestor<'a>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(info.name.as_str());
        let mut current = info;
        while let Some(reference) = current.superclass.as_ref() {
            let Some(name) = reference.raw_name() else {
                break;
            };
            let Some(next) = self.describe(name) else {
                break;
            };
            if !seen.insert(next.name.as_str()) {
                break;
            }
            chain.push(Ancestor {
                info: next,
                reference,
            });
            current = next;
        }
        chain
    }

    /// Methods visible on a type: its own first, then inherited ones.
    fn methods<'a>(&'a self, info: &'a TypeInfo) -> Vec<&'a MethodInfo> {
        let mut methods: Vec<&MethodInfo> = info.methods.iter().collect();
        for ancestor in self.ancestors(info) {
            methods.extend(ancestor.info.methods.iter());
        }
        methods
    }
}

/// One unit of builder input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "kebab-case")]
pub enum Entry {
    Type { name: String },
    Action(ActionEntry),
}

impl Entry {
    pub fn ty(name: impl Into<String>) -> Self {
        Self::Type { name: name.into() }
    }
}

/// RPC action: a handler with a request and a response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    /// Canonical handler identity.
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<TypeRef>,
    #[serde(default)]
    pub kind: MethodKind,
}

impl ActionEntry {
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            request: None,
            response: None,
            kind: MethodKind::Unary,
        }
    }

    pub fn request(mut self, ty: TypeRef) -> Self {
        self.request = Some(ty);
        self
    }

    pub fn response(mut self, ty: TypeRef) -> Self {
        self.response = Some(ty);
        self
    }

    pub fn kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Map(HashMap<String, TypeInfo>);

    impl TypeIntrospector for Map {
        fn describe(&self, name: &str) -> Option<&TypeInfo> {
            self.0.get(name)
        }
    }

    fn map(types: Vec<TypeInfo>) -> Map {
        Map(types.into_iter().map(|t| (t.name.clone(), t)).collect())
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let types = map(vec![
            TypeInfo::message("acme.Base"),
            TypeInfo::message("acme.Mid").extends(TypeRef::named("acme.Base")),
            TypeInfo::message("acme.Leaf").extends(TypeRef::named("acme.Mid")),
        ]);
        let leaf = types.describe("acme.Leaf").expect("leaf");
        let names: Vec<&str> = types
            .ancestors(leaf)
            .iter()
            .map(|a| a.info.name.as_str())
            .collect();
        assert_eq!(names, vec!["acme.Mid", "acme.Base"]);
    }

    #[test]
    fn test_ancestors_stop_on_cycle() {
        let types = map(vec![
            TypeInfo::message("acme.A").extends(TypeRef::named("acme.B")),
            TypeInfo::message("acme.B").extends(TypeRef::named("acme.A")),
        ]);
        let a = types.describe("acme.A").expect("a");
        assert_eq!(types.ancestors(a).len(), 1);
    }

    #[test]
    fn test_methods_include_inherited() {
        let types = map(vec![
            TypeInfo::message("acme.Base").method(MethodInfo::new("getId", 0)),
            TypeInfo::message("acme.Leaf")
                .extends(TypeRef::named("acme.Base"))
                .method(MethodInfo::new("getName", 0)),
        ]);
        let leaf = types.describe("acme.Leaf").expect("leaf");
        let names: Vec<&str> = types.methods(leaf).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getName", "getId"]);
    }

    #[test]
    fn test_name_helpers() {
        assert_eq!(simple_name_of("acme.orders.Order"), "Order");
        assert_eq!(parent_name_of("acme.orders.Order"), "acme.orders");
        assert_eq!(parent_name_of("Order"), "");
        assert!(TypeInfo::message("acme.A").has_members());
        assert!(!TypeInfo::new("acme.I", TypeClass::Interface).has_members());
    }

    #[test]
    fn test_method_kind_streaming_sides() {
        assert!(!MethodKind::Unary.streams_request());
        assert!(MethodKind::ServerStreaming.streams_response());
        assert!(MethodKind::BidiStreaming.streams_request());
        assert!(MethodKind::BidiStreaming.streams_response());
    }
}
