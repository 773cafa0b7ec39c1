// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `manifest.json`: machine-readable record of one generator run.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use wiremodel::export::FailedNamespace;
use wiremodel::{ExportReport, ResolveSummary};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticCounts {
    pub warnings: usize,
    pub errors: usize,
}

/// Manifest contents.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub generated_date: DateTime<Local>,
    pub tool_version: String,
    pub dialect: String,
    /// Schema file names, relative to the output directory.
    pub files: Vec<String>,
    pub namespaces: Vec<String>,
    pub failed: Vec<FailedNamespace>,
    pub unknown_mappings: Vec<String>,
    pub diagnostics: DiagnosticCounts,
    pub resolve: ResolveSummary,
    /// `None` when no compiler was configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_ok: Option<bool>,
}

impl RunManifest {
    pub fn new(
        report: &ExportReport,
        namespaces: Vec<String>,
        resolve: ResolveSummary,
        dialect: impl Into<String>,
    ) -> Self {
        let files = report
            .written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        Self {
            generated_date: Local::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            dialect: dialect.into(),
            files,
            namespaces,
            failed: report.failed.clone(),
            unknown_mappings: report.unknown_mappings.clone(),
            diagnostics: DiagnosticCounts {
                warnings: report.diagnostics.warning_count(),
                errors: report.diagnostics.error_count(),
            },
            resolve,
            compiler_ok: None,
        }
    }

    /// Write `manifest.json` into `dir`.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("[OK] Generated {}", MANIFEST_FILE);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lists_file_names() {
        let report = ExportReport {
            written: vec![PathBuf::from("/tmp/out/acme.proto")],
            unknown_mappings: vec!["std.Object".into()],
            ..ExportReport::default()
        };
        let manifest = RunManifest::new(
            &report,
            vec!["acme".into()],
            ResolveSummary::default(),
            "proto2",
        );
        assert_eq!(manifest.files, vec!["acme.proto"]);
        assert_eq!(manifest.diagnostics, DiagnosticCounts { warnings: 0, errors: 0 });

        let dir = tempfile::tempdir().expect("tempdir");
        let path = manifest.write(dir.path()).expect("write");
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).expect("read")).expect("json");
        assert_eq!(value["files"][0], "acme.proto");
        assert_eq!(value["unknown_mappings"][0], "std.Object");
        assert!(value["generated_date"].is_string());
        assert!(value.get("compiler_ok").is_none());
    }
}
