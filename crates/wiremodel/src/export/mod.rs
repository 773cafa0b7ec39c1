// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema exporter.
//!
//! Renders each generated namespace of a resolved [`Registry`] as one
//! `.proto` file. Per-file write failures are recorded and skipped; only an
//! output directory that cannot be created aborts the export.

mod compiler;
mod mapping;
mod target;
mod writer;

pub use compiler::{CompilerError, SchemaCompiler};
pub use mapping::{proto_type_of, qualify, ProtoType, UNKNOWN_TYPE};
pub use target::{DefaultTarget, FlattenTarget, Target, TargetStrategy};
pub use writer::{render_namespace, SchemaWriter};

use crate::builder::Registry;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::NamespaceDescriptor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Schema file extension.
pub const SCHEMA_EXTENSION: &str = "proto";

/// Field-label style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Non-repeated, non-map fields are labelled `optional`.
    #[default]
    Proto2,
    /// Only `repeated` is written.
    Proto3,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "proto2" => Ok(Self::Proto2),
            "proto3" => Ok(Self::Proto3),
            other => Err(format!("unknown dialect '{}' (expected proto2 or proto3)", other)),
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub dialect: Dialect,
    /// Prepended to every package and type reference.
    pub package_prefix: String,
    /// Every file imports itself.
    pub include_self_import: bool,
    pub target: Target,
    /// Namespaces that are never written nor imported.
    pub reserved_prefixes: Vec<String>,
    /// Render a `service` block per namespace with actions.
    pub emit_services: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            package_prefix: String::new(),
            include_self_import: true,
            target: Target::default(),
            reserved_prefixes: default_reserved_prefixes(),
            emit_services: false,
        }
    }
}

pub fn default_reserved_prefixes() -> Vec<String> {
    vec!["java".to_string(), "sun".to_string(), "std".to_string()]
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Namespace whose file could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedNamespace {
    pub namespace: String,
    pub error: String,
}

/// Outcome of [`export`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<FailedNamespace>,
    /// Type names that fell back to the unknown marker.
    pub unknown_mappings: Vec<String>,
    /// Registry diagnostics followed by the ones recorded while exporting.
    pub diagnostics: Diagnostics,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && !self.diagnostics.has_errors()
    }
}

/// File name of a namespace: dots become underscores.
pub fn file_name(namespace: &str) -> String {
    format!("{}.{}", namespace.replace('.', "_"), SCHEMA_EXTENSION)
}

/// Namespaces outside the reserved prefixes, and not empty, get their own file.
pub fn is_generated<S: AsRef<str>>(namespace: &str, reserved: &[S]) -> bool {
    !namespace.is_empty()
        && !reserved.iter().any(|prefix| {
            let prefix = prefix.as_ref();
            namespace == prefix
                || namespace
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
}

/// Generated namespace with at least one declaration, or with a service block to render.
pub fn is_exported(
    registry: &Registry,
    namespace: &NamespaceDescriptor,
    options: &ExportOptions,
) -> bool {
    is_generated(&namespace.name, &options.reserved_prefixes)
        && (writer::has_declarations(registry, namespace.types.values().copied())
            || (options.emit_services && !namespace.actions.is_empty()))
}

/// Write one schema file per exported namespace into `out_dir`.
///
/// Run [`Registry::resolve`] first; export only reads the registry.
pub fn export(
    registry: &Registry,
    out_dir: &Path,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ExportError::OutputDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut report = ExportReport {
        unknown_mappings: registry.unknown_mappings().iter().cloned().collect(),
        ..ExportReport::default()
    };
    report.diagnostics.extend(registry.diagnostics());

    for namespace in registry.namespaces() {
        if !is_exported(registry, namespace, options) {
            debug!(namespace = %namespace.name, "skipping namespace with nothing to declare");
            continue;
        }
        let path = out_dir.join(file_name(&namespace.name));
        let text = render_namespace(registry, namespace, options);
        match std::fs::write(&path, text) {
            Ok(()) => {
                info!(namespace = %namespace.name, path = %path.display(), "wrote schema file");
                report.written.push(path);
            }
            Err(e) => {
                report.diagnostics.error(
                    DiagnosticKind::Io,
                    namespace.name.clone(),
                    format!("cannot write {}: {}", path.display(), e),
                );
                report.failed.push(FailedNamespace {
                    namespace: namespace.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        unknown = report.unknown_mappings.len(),
        "export complete"
    );
    Ok(report)
}
