// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File-backed type catalog.
//!
//! A catalog lists types and RPC actions in JSON, YAML or TOML:
//!
//! ```yaml
//! types:
//!   - name: acme.Order
//!     members:
//!       - { name: id, type: i64, annotations: { tag: 5 } }
//!       - { name: items, type: "Vec<acme.Item>" }
//! actions:
//!   - handler: acme.PlaceOrder
//!     request: acme.Order
//!     response: acme.Receipt
//! ```
//!
//! The built-in `std` namespace is always present.

use super::{parent_name_of, ActionEntry, Entry, ParseTypeRefError, TypeClass, TypeInfo, TypeIntrospector};
use crate::model::ScalarKind;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Namespace holding the built-in types.
pub const STD_NAMESPACE: &str = "std";

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    TypeExpr(#[from] ParseTypeRefError),

    #[error("Unknown catalog format: {0}")]
    UnknownFormat(String),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// On-disk encoding of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
    Toml,
}

impl CatalogFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(CatalogError::UnknownFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<TypeInfo>,
    #[serde(default)]
    actions: Vec<ActionEntry>,
}

/// In-memory type catalog.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    types: HashMap<String, TypeInfo>,
    /// User types in declaration order.
    order: Vec<String>,
    /// Types whose namespace was computed rather than declared.
    derived: HashSet<String>,
    actions: Vec<ActionEntry>,
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCatalog {
    /// Empty catalog seeded with the built-in types.
    pub fn new() -> Self {
        let mut types = HashMap::new();
        for info in builtin_types() {
            types.insert(info.name.clone(), info);
        }
        Self {
            types,
            order: Vec::new(),
            derived: HashSet::new(),
            actions: Vec::new(),
        }
    }

    /// Load a catalog file, choosing the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse catalog text.
    pub fn parse(content: &str, format: CatalogFormat) -> Result<Self, CatalogError> {
        let file: CatalogFile = match format {
            CatalogFormat::Json => serde_json::from_str(content)?,
            CatalogFormat::Yaml => serde_yaml::from_str(content)?,
            CatalogFormat::Toml => toml::from_str(content)?,
        };

        let mut catalog = Self::new();
        for info in file.types {
            if catalog.order.contains(&info.name) {
                return Err(CatalogError::Invalid(format!(
                    "type {} declared twice",
                    info.name
                )));
            }
            catalog.insert(info);
        }
        for action in file.actions {
            catalog.add_action(action);
        }
        Ok(catalog)
    }

    /// Add or replace a user type.
    pub fn insert(&mut self, info: TypeInfo) {
        if !self.order.contains(&info.name) {
            self.order.push(info.name.clone());
        }
        self.types.insert(info.name.clone(), info);
        self.derive_namespaces();
    }

    pub fn with(mut self, info: TypeInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn add_action(&mut self, action: ActionEntry) {
        self.actions.push(action);
    }

    /// User types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> + '_ {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    pub fn actions(&self) -> &[ActionEntry] {
        &self.actions
    }

    /// Builder input: every user type, then every action.
    pub fn entries(&self) -> Vec<Entry> {
        self.order
            .iter()
            .map(|name| Entry::ty(name.clone()))
            .chain(self.actions.iter().cloned().map(Entry::Action))
            .collect()
    }

    /// Namespace a canonical name lives in, following the enclosing chain.
    pub fn namespace_of(&self, name: &str) -> String {
        let mut current = name;
        // Bounded by the number of described types so cycles terminate.
        for _ in 0..=self.types.len() {
            match self.types.get(current) {
                Some(info)
                    if current != name
                        && !info.namespace.is_empty()
                        && !self.derived.contains(current) =>
                {
                    return info.namespace.clone();
                }
                Some(TypeInfo {
                    enclosing: Some(parent),
                    ..
                }) => current = parent.as_str(),
                _ => break,
            }
        }
        parent_name_of(current).to_string()
    }

    /// Recompute every undeclared namespace; a later insert may complete an enclosing chain.
    fn derive_namespaces(&mut self) {
        let pending: Vec<String> = self
            .types
            .values()
            .filter(|info| info.namespace.is_empty() || self.derived.contains(&info.name))
            .map(|info| info.name.clone())
            .collect();
        let computed: Vec<(String, String)> = pending
            .into_iter()
            .map(|name| {
                let namespace = self.namespace_of(&name);
                (name, namespace)
            })
            .collect();
        for (name, namespace) in computed {
            if let Some(info) = self.types.get_mut(&name) {
                info.namespace = namespace;
            }
            self.derived.insert(name);
        }
    }
}

impl TypeIntrospector for TypeCatalog {
    fn describe(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }
}

fn builtin_types() -> Vec<TypeInfo> {
    use ScalarKind::*;

    let scalars = [
        ("Bool", Bool),
        ("Byte", Byte),
        ("Short", Short),
        ("Char", Char),
        ("Int", Int),
        ("Long", Long),
        ("Float", Float),
        ("Double", Double),
    ];

    let mut out = Vec::new();
    for (simple, kind) in scalars {
        out.push(TypeInfo::scalar(
            format!("{}.{}", STD_NAMESPACE, simple),
            TypeClass::Primitive,
            kind,
        ));
        out.push(TypeInfo::scalar(
            format!("{}.Boxed{}", STD_NAMESPACE, simple),
            TypeClass::Boxed,
            kind,
        ));
    }

    let leaves = [
        ("String", TypeClass::String),
        ("Bytes", TypeClass::Bytes),
        ("ByteBuffer", TypeClass::Buffer),
        ("Decimal", TypeClass::Decimal),
        ("Duration", TypeClass::Duration),
        ("Date", TypeClass::Date),
        ("DateTime", TypeClass::Date),
        ("Object", TypeClass::Opaque),
    ];
    for (simple, class) in leaves {
        out.push(TypeInfo::new(format!("{}.{}", STD_NAMESPACE, simple), class));
    }

    out.push(TypeInfo::new("std.List", TypeClass::List).params(&["E"]));
    out.push(TypeInfo::new("std.Queue", TypeClass::List).params(&["E"]));
    out.push(TypeInfo::new("std.Set", TypeClass::Set).params(&["E"]));
    out.push(TypeInfo::new("std.Map", TypeClass::Map).params(&["K", "V"]));

    for info in &mut out {
        info.namespace = STD_NAMESPACE.to_string();
    }
    out
}
