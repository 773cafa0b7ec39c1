// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor arena owned by one run.

use crate::diagnostics::Diagnostics;
use crate::introspect::parent_name_of;
use crate::model::{DescriptorId, NamespaceDescriptor, TypeDescriptor, TypeKind};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Index;

/// Registration state of a canonical identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Enclosing placeholder waiting for its real type.
    Placeholder(DescriptorId),
    Resolved(DescriptorId),
}

impl Slot {
    pub fn id(self) -> DescriptorId {
        match self {
            Self::Placeholder(id) | Self::Resolved(id) => id,
        }
    }
}

/// (template, declaring context, argument signature)
pub(crate) type InstanceKey = (DescriptorId, Option<DescriptorId>, String);

/// Every descriptor, namespace and diagnostic produced by a run.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) descriptors: Vec<TypeDescriptor>,
    pub(crate) slots: HashMap<String, Slot>,
    pub(crate) namespaces: BTreeMap<String, NamespaceDescriptor>,
    pub(crate) instances: HashMap<InstanceKey, DescriptorId>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) unknown: BTreeSet<String>,
    pub(crate) reported_tags: HashSet<(DescriptorId, u32)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: DescriptorId) -> Option<&TypeDescriptor> {
        self.descriptors.get(id.index())
    }

    /// Descriptor registered under a canonical name.
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn id_of(&self, name: &str) -> Option<DescriptorId> {
        self.slots.get(name).map(|slot| slot.id())
    }

    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.slots.get(name).copied()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Namespaces in name order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceDescriptor> + '_ {
        self.namespaces.values()
    }

    pub fn namespace(&self, name: &str) -> Option<&NamespaceDescriptor> {
        self.namespaces.get(name)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Names that fell back to the unknown marker.
    pub fn unknown_mappings(&self) -> &BTreeSet<String> {
        &self.unknown
    }

    /// Instantiations of a template, in creation order.
    pub fn impls_of(&self, template: DescriptorId) -> &[DescriptorId] {
        self.get(template)
            .and_then(|d| d.template())
            .map(|t| t.impls.as_slice())
            .unwrap_or(&[])
    }

    /// Name relative to the owning namespace, e.g. `Outer.Status`.
    pub fn relative_name(&self, id: DescriptorId) -> String {
        let Some(desc) = self.get(id) else {
            return String::new();
        };
        if desc.namespace.is_empty() {
            return desc.name.clone();
        }
        desc.name
            .strip_prefix(desc.namespace.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&desc.name)
            .to_string()
    }

    pub(crate) fn alloc(&mut self, name: &str, namespace: &str, kind: TypeKind) -> DescriptorId {
        let id = DescriptorId(self.descriptors.len() as u32);
        let simple = crate::introspect::simple_name_of(name);
        let namespace = if namespace.is_empty() {
            parent_name_of(name)
        } else {
            namespace
        };
        self.descriptors
            .push(TypeDescriptor::new(id, name, simple, namespace, kind));
        id
    }

    pub(crate) fn namespace_mut(&mut self, name: &str) -> &mut NamespaceDescriptor {
        self.namespaces
            .entry(name.to_string())
            .or_insert_with(|| NamespaceDescriptor::new(name))
    }

    pub(crate) fn descriptor_mut(&mut self, id: DescriptorId) -> &mut TypeDescriptor {
        &mut self.descriptors[id.index()]
    }
}

impl Index<DescriptorId> for Registry {
    type Output = TypeDescriptor;

    fn index(&self, id: DescriptorId) -> &TypeDescriptor {
        &self.descriptors[id.index()]
    }
}
