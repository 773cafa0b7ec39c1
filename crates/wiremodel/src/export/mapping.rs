// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor to schema type mapping.

use crate::builder::Registry;
use crate::model::{DescriptorId, ScalarKind, TypeKind};
use std::fmt;

/// Placeholder written for types without a wire mapping.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// A type expression as it appears in a field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoType {
    Scalar(&'static str),
    /// Declared enum or message, already prefixed.
    Named(String),
    Map(Box<ProtoType>, Box<ProtoType>),
    Unknown,
}

impl ProtoType {
    /// Replace `.` with `_` in every non-scalar part.
    pub fn flatten(&self) -> Self {
        match self {
            Self::Scalar(_) | Self::Unknown => self.clone(),
            Self::Named(name) => Self::Named(name.replace('.', "_")),
            Self::Map(key, value) => Self::Map(Box::new(key.flatten()), Box::new(value.flatten())),
        }
    }
}

impl fmt::Display for ProtoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => f.write_str(name),
            Self::Named(name) => f.write_str(name),
            Self::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            Self::Unknown => f.write_str(UNKNOWN_TYPE),
        }
    }
}

/// Prepend the package prefix to a canonical name.
pub fn qualify(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, name),
    }
}

fn scalar(kind: ScalarKind) -> ProtoType {
    ProtoType::Scalar(match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::Byte | ScalarKind::Short | ScalarKind::Char | ScalarKind::Int => "int32",
        ScalarKind::Long => "int64",
        ScalarKind::Float => "float",
        ScalarKind::Double => "double",
    })
}

/// Schema type of a bound descriptor. Lists and sets map to their component;
/// the caller adds the `repeated` label.
pub fn proto_type_of(registry: &Registry, id: Option<DescriptorId>, prefix: &str) -> ProtoType {
    let Some(desc) = id.and_then(|id| registry.get(id)) else {
        return ProtoType::Unknown;
    };
    match &desc.kind {
        TypeKind::Primitive(kind) | TypeKind::BoxedPrimitive(kind) => scalar(*kind),
        TypeKind::String | TypeKind::Decimal | TypeKind::Duration | TypeKind::Date => {
            ProtoType::Scalar("string")
        }
        TypeKind::Bytes { .. } => ProtoType::Scalar("bytes"),
        TypeKind::Enum(_) | TypeKind::Message(_) | TypeKind::Enclosing => {
            ProtoType::Named(qualify(prefix, &desc.name))
        }
        TypeKind::List(c) | TypeKind::Set(c) => proto_type_of(registry, c.component, prefix),
        TypeKind::Map(m) => ProtoType::Map(
            Box::new(proto_type_of(registry, m.key, prefix)),
            Box::new(proto_type_of(registry, m.value, prefix)),
        ),
        TypeKind::Unknown(_) => ProtoType::Unknown,
    }
}

/// Fields backed by a list or set carry the `repeated` label.
pub fn is_repeated(registry: &Registry, id: Option<DescriptorId>) -> bool {
    id.and_then(|id| registry.get(id))
        .is_some_and(|d| matches!(d.kind, TypeKind::List(_) | TypeKind::Set(_)))
}

pub fn is_map(registry: &Registry, id: Option<DescriptorId>) -> bool {
    id.and_then(|id| registry.get(id))
        .is_some_and(|d| matches!(d.kind, TypeKind::Map(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_table() {
        assert_eq!(scalar(ScalarKind::Bool).to_string(), "bool");
        assert_eq!(scalar(ScalarKind::Char).to_string(), "int32");
        assert_eq!(scalar(ScalarKind::Short).to_string(), "int32");
        assert_eq!(scalar(ScalarKind::Long).to_string(), "int64");
        assert_eq!(scalar(ScalarKind::Float).to_string(), "float");
        assert_eq!(scalar(ScalarKind::Double).to_string(), "double");
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("", "acme.Order"), "acme.Order");
        assert_eq!(qualify("wire", "acme.Order"), "wire.acme.Order");
        assert_eq!(qualify("wire", ""), "wire");
    }

    #[test]
    fn test_unbound_is_unknown() {
        let registry = Registry::new();
        assert_eq!(proto_type_of(&registry, None, ""), ProtoType::Unknown);
        assert_eq!(ProtoType::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_flatten_keeps_scalars() {
        let ty = ProtoType::Map(
            Box::new(ProtoType::Named("geo.Region".into())),
            Box::new(ProtoType::Scalar("int64")),
        );
        assert_eq!(ty.flatten().to_string(), "map<geo_Region, int64>");
    }
}
