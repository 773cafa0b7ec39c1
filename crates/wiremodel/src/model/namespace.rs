// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::introspect::{MethodKind, RpcInfo};
use crate::model::DescriptorId;
use std::collections::{BTreeMap, BTreeSet};

/// A named grouping of types and actions; one schema file on export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamespaceDescriptor {
    pub name: String,
    /// Top-level declarations keyed by canonical name.
    pub types: BTreeMap<String, DescriptorId>,
    /// Actions keyed by handler.
    pub actions: BTreeMap<String, RpcActionDescriptor>,
    /// Namespaces referenced by this namespace's message fields.
    pub depends_on: BTreeSet<String>,
    /// Namespaces referenced by action payloads only.
    pub service_depends_on: BTreeSet<String>,
}

impl NamespaceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sorted dependency list, optionally including this namespace.
    pub fn dependencies(&self, include_self: bool, include_services: bool) -> BTreeSet<String> {
        let mut out = self.depends_on.clone();
        if include_services {
            out.extend(self.service_depends_on.iter().cloned());
        }
        if include_self {
            out.insert(self.name.clone());
        } else {
            out.remove(&self.name);
        }
        out
    }
}

/// A request/response pair served by one handler.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcActionDescriptor {
    pub handler: String,
    pub simple_name: String,
    pub namespace: String,
    pub request: Option<DescriptorId>,
    pub response: Option<DescriptorId>,
    pub kind: MethodKind,
    pub rpc: Option<RpcInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependencies_self_import() {
        let mut ns = NamespaceDescriptor::new("acme");
        ns.depends_on.insert("billing".into());
        ns.service_depends_on.insert("api".into());

        let without: Vec<String> = ns.dependencies(false, false).into_iter().collect();
        assert_eq!(without, vec!["billing"]);

        let with: Vec<String> = ns.dependencies(true, true).into_iter().collect();
        assert_eq!(with, vec!["acme", "api", "billing"]);
    }
}
