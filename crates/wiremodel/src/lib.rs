// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # wiremodel
//!
//! Builds a resolved, cross-language type model from introspected type
//! descriptions and renders it as protocol-buffer schema files.
//!
//! The pipeline has three strictly sequential phases:
//!
//! 1. [`ModelBuilder`] registers every type reachable from the input entries,
//!    monomorphizes generic templates and groups nested types.
//! 2. [`Registry::resolve`] binds forward references and rebuilds the
//!    namespace dependency graph.
//! 3. [`export()`] writes one `.proto` file per namespace.
//!
//! ```no_run
//! use wiremodel::{export, ExportOptions, ModelBuilder, OpenPolicy, TypeCatalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = TypeCatalog::from_file("types.yaml")?;
//! let mut builder = ModelBuilder::new(&catalog, &OpenPolicy);
//! builder.register_all(&catalog.entries());
//! let mut registry = builder.finish();
//! registry.resolve();
//! let report = export(&registry, "proto".as_ref(), &ExportOptions::default())?;
//! println!("{} files written", report.written.len());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod export;
pub mod introspect;
pub mod model;

pub use builder::{
    BuildOptions, ModelBuilder, Registry, Resolution, ResolveSummary, Slot, TagPolicy,
    TypeArgResolver, MAX_INSTANTIATION_DEPTH,
};
pub use config::{ConfigError, GeneratorConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use export::{
    export, file_name, render_namespace, CompilerError, Dialect, ExportError, ExportOptions,
    ExportReport, FailedNamespace, ProtoType, SchemaCompiler, Target, TargetStrategy,
};
pub use introspect::{
    ActionEntry, Annotations, CatalogError, CatalogFormat, Entry, MemberInfo, MethodInfo,
    MethodKind, OpenPolicy, PatternPolicy, RpcInfo, TypeCatalog, TypeClass, TypeInfo,
    TypeIntrospector, TypePolicy, TypeRef,
};
pub use model::{
    DescriptorId, FieldDescriptor, NamespaceDescriptor, RpcActionDescriptor, TypeDescriptor,
    TypeKind,
};
