// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::introspect::TypeRef;
use crate::model::DescriptorId;

/// Where a field's tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    Auto,
    Explicit,
}

/// Accessor method discovered for a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub name: String,
    /// Same-name accessor rather than a `get`/`is`/`set` prefixed one.
    pub fluent: bool,
}

impl Accessor {
    pub fn prefixed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fluent: false,
        }
    }

    pub fn fluent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fluent: true,
        }
    }
}

/// One field of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Name used on the wire.
    pub external_name: String,
    /// Declared type after generic substitution. Symbolic in templates.
    pub declared: TypeRef,
    /// Bound descriptor. `None` while unresolved or symbolic.
    pub type_id: Option<DescriptorId>,
    /// Type whose member list introduced this field.
    pub declaring_type: String,
    pub tag: u32,
    pub tag_source: TagSource,
    /// Position in the flattened member list, inherited members first.
    pub index: usize,
    pub ignored: bool,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
    pub offset: Option<u64>,
}

impl FieldDescriptor {
    pub fn is_bound(&self) -> bool {
        self.type_id.is_some()
    }

    pub fn is_explicit(&self) -> bool {
        self.tag_source == TagSource::Explicit
    }
}
