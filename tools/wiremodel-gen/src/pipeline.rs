// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Build, resolve, export and compile in one run.

use crate::manifest::RunManifest;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wiremodel::export::is_exported;
use wiremodel::{
    export, DiagnosticKind, Dialect, ExportReport, GeneratorConfig, ModelBuilder, Registry,
    ResolveSummary, TypeCatalog,
};

/// Configured generator run over one catalog.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub config: GeneratorConfig,
    pub catalog: TypeCatalog,
}

/// Result of [`Pipeline::run`].
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ExportReport,
    pub manifest: RunManifest,
    pub manifest_path: PathBuf,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.report.diagnostics.has_errors() || !self.report.failed.is_empty()
    }
}

impl Pipeline {
    pub fn new(config: GeneratorConfig, catalog: TypeCatalog) -> Self {
        Self { config, catalog }
    }

    /// Load a catalog and an optional TOML configuration.
    pub fn load(catalog_path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let catalog = TypeCatalog::from_file(catalog_path)
            .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
        let config = match config_path {
            Some(path) => GeneratorConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        info!(types = catalog.types().count(), actions = catalog.actions().len(), "catalog loaded");
        Ok(Self::new(config, catalog))
    }

    /// Register every catalog entry and run the resolution pass.
    pub fn build(&self) -> Result<(Registry, ResolveSummary)> {
        let policy = self.config.policy().context("Invalid ancestor patterns")?;
        let mut builder =
            ModelBuilder::new(&self.catalog, &policy).with_options(self.config.build_options());
        let entries = self.catalog.entries();
        builder.register_all(&entries);
        let mut registry = builder.finish();
        let summary = registry.resolve();
        info!(
            descriptors = registry.len(),
            bound = summary.bound,
            unresolved = summary.unresolved,
            "model resolved"
        );
        Ok((registry, summary))
    }

    /// Build, export, write the manifest and run the configured compiler.
    ///
    /// Compiler failures are recorded as diagnostics, not returned.
    pub fn run(&self) -> Result<RunOutcome> {
        self.config.validate().context("Invalid configuration")?;
        let (registry, resolve) = self.build()?;
        let options = self.config.export_options();
        let out_dir = &self.config.output_dir;

        let mut report = export(&registry, out_dir, &options)
            .with_context(|| format!("Failed to export into {}", out_dir.display()))?;

        let compiler_ok = match &self.config.compiler {
            Some(compiler) if !report.written.is_empty() => {
                Some(match compiler.invoke(&report.written) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("schema compiler failed: {}", e);
                        report.diagnostics.error(
                            DiagnosticKind::Compiler,
                            compiler.program.clone(),
                            e.to_string(),
                        );
                        false
                    }
                })
            }
            _ => None,
        };

        let namespaces = registry
            .namespaces()
            .filter(|ns| is_exported(&registry, ns, &options))
            .map(|ns| ns.name.clone())
            .collect();
        let mut manifest =
            RunManifest::new(&report, namespaces, resolve, dialect_name(options.dialect));
        manifest.compiler_ok = compiler_ok;
        let manifest_path = manifest.write(out_dir)?;

        Ok(RunOutcome {
            report,
            manifest,
            manifest_path,
        })
    }
}

fn dialect_name(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Proto2 => "proto2",
        Dialect::Proto3 => "proto3",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremodel::{MemberInfo, TypeInfo};

    fn catalog() -> TypeCatalog {
        TypeCatalog::new().with(
            TypeInfo::message("acme.Point")
                .member(MemberInfo::new("x", "i32".parse().expect("type")))
                .member(MemberInfo::new("y", "i32".parse().expect("type"))),
        )
    }

    #[test]
    fn test_build_resolves_catalog() {
        let pipeline = Pipeline::new(GeneratorConfig::default(), catalog());
        let (registry, summary) = pipeline.build().expect("build");
        assert!(registry.lookup("acme.Point").is_some());
        assert_eq!(summary.unresolved, 0);
    }

    #[test]
    fn test_bad_pattern_fails_build() {
        let config = GeneratorConfig {
            exclude: vec!["(".into()],
            ..GeneratorConfig::default()
        };
        assert!(Pipeline::new(config, catalog()).build().is_err());
    }

    #[test]
    fn test_dialect_name() {
        assert_eq!(dialect_name(Dialect::Proto3), "proto3");
    }
}
