// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the closed set of variants a registered type can take.

use crate::introspect::{RpcInfo, TypeRef};
use crate::model::field::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable handle of a descriptor inside a [`crate::Registry`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptorId(pub(crate) u32);

impl DescriptorId {
    /// Position of the descriptor in the registry arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scalar kinds with a fixed wire mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

/// How a list-like type is backed. Preserved for fidelity, not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionRepr {
    Array,
    Collection,
}

/// One enumeration constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    /// Ordinal tag, starting at zero.
    pub tag: u32,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>, tag: u32) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }
}

/// List or set wrapper around one component.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionType {
    pub component: Option<DescriptorId>,
    pub repr: CollectionRepr,
}

/// Map wrapper around a key and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    pub key: Option<DescriptorId>,
    pub value: Option<DescriptorId>,
}

/// A generic message that still carries unresolved type variables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    /// Declared type variables, in positional order.
    pub type_vars: Vec<String>,
    /// Monomorphized instantiations, in creation order.
    pub impls: Vec<DescriptorId>,
}

/// A monomorphized instantiation of a [`Template`].
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub template: DescriptorId,
    /// Name the instantiation was generated under.
    pub impl_name: String,
    pub arguments: Vec<TypeRef>,
    /// Declaring context the instantiation is nested in, if any.
    pub declaring: Option<DescriptorId>,
}

/// Whether a message is plain, a template, or a template instantiation.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageForm {
    Concrete,
    Template(Template),
    Impl(Instance),
}

/// Record-like type with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageType {
    /// Declaration order is wire declaration order.
    pub fields: Vec<FieldDescriptor>,
    pub form: MessageForm,
}

impl MessageType {
    pub fn concrete() -> Self {
        Self {
            fields: Vec::new(),
            form: MessageForm::Concrete,
        }
    }

    pub fn template(type_vars: Vec<String>) -> Self {
        Self {
            fields: Vec::new(),
            form: MessageForm::Template(Template {
                type_vars,
                impls: Vec::new(),
            }),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Descriptor variant.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(ScalarKind),
    BoxedPrimitive(ScalarKind),
    String,
    Bytes {
        /// Buffer-backed rather than array-backed.
        buffer: bool,
    },
    Date,
    Duration,
    Decimal,
    Enum(Vec<EnumConstant>),
    Message(MessageType),
    List(CollectionType),
    Set(CollectionType),
    Map(MapType),
    /// Namespacing node with no registered type of its own yet.
    Enclosing,
    /// Best-effort marker for a kind the scalar table does not cover.
    Unknown(String),
}

impl TypeKind {
    /// Short label used in logs and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::BoxedPrimitive(_) => "boxed",
            Self::String => "string",
            Self::Bytes { .. } => "bytes",
            Self::Date => "date",
            Self::Duration => "duration",
            Self::Decimal => "decimal",
            Self::Enum(_) => "enum",
            Self::Message(m) => match m.form {
                MessageForm::Concrete => "message",
                MessageForm::Template(_) => "template",
                MessageForm::Impl(_) => "impl",
            },
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Enclosing => "enclosing",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// A registered type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub id: DescriptorId,
    /// Canonical identity.
    pub name: String,
    pub simple_name: String,
    pub namespace: String,
    pub enclosing: Option<DescriptorId>,
    pub rpc: Option<RpcInfo>,
    /// Nested declarations keyed by simple name.
    pub nested: BTreeMap<String, DescriptorId>,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub fn new(
        id: DescriptorId,
        name: impl Into<String>,
        simple_name: impl Into<String>,
        namespace: impl Into<String>,
        kind: TypeKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            simple_name: simple_name.into(),
            namespace: namespace.into(),
            enclosing: None,
            rpc: None,
            nested: BTreeMap::new(),
            kind,
        }
    }

    pub fn message(&self) -> Option<&MessageType> {
        match &self.kind {
            TypeKind::Message(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn message_mut(&mut self) -> Option<&mut MessageType> {
        match &mut self.kind {
            TypeKind::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        self.message().map(|m| m.fields.as_slice()).unwrap_or(&[])
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.message()?.field(name)
    }

    pub fn is_message(&self) -> bool {
        matches!(self.kind, TypeKind::Message(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    pub fn is_enclosing(&self) -> bool {
        matches!(self.kind, TypeKind::Enclosing)
    }

    pub fn is_template(&self) -> bool {
        matches!(
            &self.kind,
            TypeKind::Message(MessageType {
                form: MessageForm::Template(_),
                ..
            })
        )
    }

    pub fn is_impl(&self) -> bool {
        matches!(
            &self.kind,
            TypeKind::Message(MessageType {
                form: MessageForm::Impl(_),
                ..
            })
        )
    }

    pub fn template(&self) -> Option<&Template> {
        match &self.kind {
            TypeKind::Message(MessageType {
                form: MessageForm::Template(t),
                ..
            }) => Some(t),
            _ => None,
        }
    }

    pub fn instance(&self) -> Option<&Instance> {
        match &self.kind {
            TypeKind::Message(MessageType {
                form: MessageForm::Impl(i),
                ..
            }) => Some(i),
            _ => None,
        }
    }

    pub fn enum_constants(&self) -> &[EnumConstant] {
        match &self.kind {
            TypeKind::Enum(constants) => constants,
            _ => &[],
        }
    }
}
