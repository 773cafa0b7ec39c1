// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enclosing walk and placeholder upgrade.
//!
//! A nested type needs every lexical parent to exist before it can be filed.
//! Parents that have not been registered yet are created as `Enclosing`
//! placeholders in [`Slot::Placeholder`] state. When the real type shows up
//! later, [`ModelBuilder::upgrade`] rewrites the placeholder in place: the id,
//! the enclosing link and the nested children all survive.

use super::core::ModelBuilder;
use super::registry::Slot;
use crate::introspect::{parent_name_of, TypeInfo, TypeIntrospector, TypePolicy};
use crate::model::{DescriptorId, TypeKind};
use tracing::debug;

impl<'a, I, P> ModelBuilder<'a, I, P>
where
    I: TypeIntrospector + ?Sized,
    P: TypePolicy + ?Sized,
{
    /// File a declared type under its parent, or at namespace scope.
    pub(super) fn link(&mut self, id: DescriptorId, enclosing: Option<&str>) {
        match enclosing {
            Some(parent_name) => {
                let parent = self.ensure_enclosing(parent_name);
                self.attach(parent, id);
            }
            None => {
                let desc = &self.registry[id];
                let (name, namespace) = (desc.name.clone(), desc.namespace.clone());
                self.registry
                    .namespace_mut(&namespace)
                    .types
                    .insert(name, id);
            }
        }
    }

    /// Existing descriptor for `name`, or a new placeholder chain up to namespace scope.
    pub(super) fn ensure_enclosing(&mut self, name: &str) -> DescriptorId {
        if let Some(slot) = self.registry.slot(name) {
            return slot.id();
        }

        let introspector = self.introspector;
        let info = introspector.describe(name);
        let namespace = info
            .map(|i| i.namespace.as_str())
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| parent_name_of(name))
            .to_string();

        debug!(name = %name, "creating enclosing placeholder");
        let id = self.registry.alloc(name, &namespace, TypeKind::Enclosing);
        self.registry
            .slots
            .insert(name.to_string(), Slot::Placeholder(id));
        self.link(id, info.and_then(|i| i.enclosing.as_deref()));
        id
    }

    pub(super) fn attach(&mut self, parent: DescriptorId, child: DescriptorId) {
        let simple = self.registry[child].simple_name.clone();
        self.registry.descriptor_mut(child).enclosing = Some(parent);
        self.registry
            .descriptor_mut(parent)
            .nested
            .insert(simple, child);
    }

    /// Turn a placeholder into the real type discovered at the same identity.
    pub(super) fn upgrade(&mut self, id: DescriptorId, info: &TypeInfo, kind: TypeKind) {
        debug!(name = %info.name, kind = kind.label(), "upgrading enclosing placeholder");
        let desc = self.registry.descriptor_mut(id);
        desc.kind = kind;
        if !info.namespace.is_empty() {
            desc.namespace = info.namespace.clone();
        }
        self.registry
            .slots
            .insert(info.name.clone(), Slot::Resolved(id));
    }
}
