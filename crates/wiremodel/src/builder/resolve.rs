// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolution pass and dependency tracking.

use super::registry::Registry;
use crate::diagnostics::DiagnosticKind;
use crate::model::{DescriptorId, TypeKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Outcome of [`Registry::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveSummary {
    /// Fields bound by this pass.
    pub bound: usize,
    /// Non-ignored message fields still without a descriptor.
    pub unresolved: usize,
    /// Tags used by more than one field of the same message.
    pub duplicate_tags: usize,
}

impl Registry {
    /// Bind forward references, rebuild dependency edges and check tags.
    ///
    /// Idempotent: a second run binds nothing new and reports nothing new.
    pub fn resolve(&mut self) -> ResolveSummary {
        let mut summary = ResolveSummary::default();
        let ids: Vec<DescriptorId> = self.descriptors.iter().map(|d| d.id).collect();

        for &id in &ids {
            if self[id].is_template() || !self[id].is_message() {
                continue;
            }
            let pending: Vec<(usize, String)> = self[id]
                .fields()
                .iter()
                .enumerate()
                .filter(|(_, f)| f.type_id.is_none() && f.declared.is_concrete())
                .map(|(i, f)| (i, f.declared.to_string()))
                .collect();
            for (index, key) in pending {
                let Some(target) = self.id_of(&key) else {
                    continue;
                };
                if let Some(message) = self.descriptor_mut(id).message_mut() {
                    message.fields[index].type_id = Some(target);
                    summary.bound += 1;
                }
            }

            summary.unresolved += self[id]
                .fields()
                .iter()
                .filter(|f| !f.ignored && f.type_id.is_none())
                .count();
            summary.duplicate_tags += self.check_duplicate_tags(id);
        }

        self.rebuild_dependencies();
        info!(
            bound = summary.bound,
            unresolved = summary.unresolved,
            duplicate_tags = summary.duplicate_tags,
            "resolution pass complete"
        );
        summary
    }

    /// Count duplicate tags of one message, warning about each once.
    fn check_duplicate_tags(&mut self, id: DescriptorId) -> usize {
        let mut by_tag: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for field in self[id].fields() {
            by_tag.entry(field.tag).or_default().push(field.name.clone());
        }
        let owner = self[id].name.clone();
        let mut duplicates = 0;
        for (tag, names) in by_tag.into_iter().filter(|(_, names)| names.len() > 1) {
            duplicates += 1;
            if self.reported_tags.insert((id, tag)) {
                self.diagnostics.warn(
                    DiagnosticKind::DuplicateTag,
                    owner.clone(),
                    format!("tag {} used by {}", tag, names.join(", ")),
                );
            }
        }
        duplicates
    }

    /// Namespaces a bound type contributes to its user's imports.
    pub(crate) fn collect_namespaces(&self, id: DescriptorId, out: &mut BTreeSet<String>) {
        let Some(desc) = self.get(id) else {
            return;
        };
        match &desc.kind {
            TypeKind::Message(_) | TypeKind::Enum(_) | TypeKind::Enclosing => {
                out.insert(desc.namespace.clone());
            }
            TypeKind::List(c) | TypeKind::Set(c) => {
                if let Some(component) = c.component {
                    self.collect_namespaces(component, out);
                }
            }
            TypeKind::Map(m) => {
                for side in [m.key, m.value].into_iter().flatten() {
                    self.collect_namespaces(side, out);
                }
            }
            TypeKind::Primitive(_)
            | TypeKind::BoxedPrimitive(_)
            | TypeKind::String
            | TypeKind::Bytes { .. }
            | TypeKind::Date
            | TypeKind::Duration
            | TypeKind::Decimal
            | TypeKind::Unknown(_) => {}
        }
    }

    /// Add the namespaces referenced by a message's fields to its namespace.
    pub(crate) fn record_dependencies(&mut self, id: DescriptorId) {
        let desc = &self[id];
        if desc.is_template() {
            return;
        }
        let mut deps = BTreeSet::new();
        for field in desc.fields().iter().filter(|f| !f.ignored) {
            if let Some(type_id) = field.type_id {
                self.collect_namespaces(type_id, &mut deps);
            }
        }
        let namespace = desc.namespace.clone();
        deps.remove(&namespace);
        if deps.is_empty() {
            return;
        }
        self.namespace_mut(&namespace).depends_on.extend(deps);
    }

    fn rebuild_dependencies(&mut self) {
        for ns in self.namespaces.values_mut() {
            ns.depends_on.clear();
            ns.service_depends_on.clear();
        }

        let ids: Vec<DescriptorId> = self
            .descriptors
            .iter()
            .filter(|d| d.is_message())
            .map(|d| d.id)
            .collect();
        for id in ids {
            self.record_dependencies(id);
        }

        let mut service_deps: Vec<(String, BTreeSet<String>)> = Vec::new();
        for ns in self.namespaces.values() {
            let mut deps = BTreeSet::new();
            for action in ns.actions.values() {
                for id in [action.request, action.response].into_iter().flatten() {
                    self.collect_namespaces(id, &mut deps);
                }
            }
            deps.remove(&ns.name);
            service_deps.push((ns.name.clone(), deps));
        }
        for (name, deps) in service_deps {
            self.namespace_mut(&name).service_depends_on = deps;
        }
    }
}
