// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generator configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use crate::builder::{BuildOptions, TagPolicy};
use crate::export::{default_reserved_prefixes, Dialect, ExportOptions, SchemaCompiler, Target};
use crate::introspect::PatternPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory receiving one schema file per namespace.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub dialect: Dialect,

    /// Prepended to every package and type reference.
    #[serde(default)]
    pub package_prefix: String,

    #[serde(default = "default_true")]
    pub include_self_import: bool,

    #[serde(default)]
    pub target: Target,

    /// Namespaces never written nor imported.
    #[serde(default = "default_reserved_prefixes")]
    pub reserved_prefixes: Vec<String>,

    #[serde(default)]
    pub tag_policy: TagPolicy,

    #[serde(default)]
    pub emit_services: bool,

    /// Ancestors whose canonical name matches one of these are walked. Empty admits all.
    #[serde(default)]
    pub include: Vec<String>,

    /// Ancestors whose canonical name matches one of these are never walked.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<SchemaCompiler>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("proto")
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            dialect: Dialect::default(),
            package_prefix: String::new(),
            include_self_import: true,
            target: Target::default(),
            reserved_prefixes: default_reserved_prefixes(),
            tag_policy: TagPolicy::default(),
            emit_services: false,
            include: Vec::new(),
            exclude: Vec::new(),
            compiler: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir is empty".into()));
        }
        if let Some(compiler) = &self.compiler {
            if compiler.program.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "compiler.program is empty".into(),
                ));
            }
        }
        self.policy()?;
        Ok(())
    }

    /// Ancestor allow-list and deny-list.
    pub fn policy(&self) -> Result<PatternPolicy, ConfigError> {
        PatternPolicy::new(&self.include, &self.exclude)
            .map_err(|e| ConfigError::Invalid(format!("bad include/exclude pattern: {}", e)))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            tag_policy: self.tag_policy,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            dialect: self.dialect,
            package_prefix: self.package_prefix.clone(),
            include_self_import: self.include_self_import,
            target: self.target,
            reserved_prefixes: self.reserved_prefixes.clone(),
            emit_services: self.emit_services,
        }
    }

    /// Commented example file.
    pub fn example() -> Result<String, ConfigError> {
        let config = Self {
            package_prefix: "wire".into(),
            dialect: Dialect::Proto3,
            emit_services: true,
            exclude: vec!["^std\\.".into()],
            compiler: Some(SchemaCompiler::new("protoc").arg("--java_out=gen/java")),
            ..Self::default()
        };
        let body = toml::to_string_pretty(&config)?;
        Ok(format!(
            r#"# wiremodel-gen configuration
# Generated by wiremodel-gen gen-config
#
# dialect:    proto2 | proto3
# target:     default | flatten (dots become underscores)
# tag_policy: sequential | reserve-explicit

{}"#,
            body
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GeneratorConfig::parse("").expect("parse");
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.output_dir, PathBuf::from("proto"));
        assert_eq!(config.dialect, Dialect::Proto2);
        assert!(config.include_self_import);
        assert_eq!(config.reserved_prefixes, vec!["java", "sun", "std"]);
    }

    #[test]
    fn test_parse_overrides() {
        let config = GeneratorConfig::parse(
            r#"
output_dir = "out/schema"
dialect = "proto3"
target = "flatten"
tag_policy = "reserve-explicit"
include_self_import = false
exclude = ["^acme\\.internal\\."]

[compiler]
program = "protoc"
args = ["--dart_out=gen"]
"#,
        )
        .expect("parse");
        assert_eq!(config.dialect, Dialect::Proto3);
        assert_eq!(config.target, Target::Flatten);
        assert_eq!(config.tag_policy, TagPolicy::ReserveExplicit);
        assert!(!config.export_options().include_self_import);
        assert_eq!(
            config.compiler.as_ref().map(|c| c.args.len()),
            Some(1)
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = GeneratorConfig::parse("output_dir = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GeneratorConfig::parse("include = [\"(\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GeneratorConfig::parse("[compiler]\nprogram = \" \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        assert!(matches!(
            GeneratorConfig::parse("dialect = \"proto4\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_example_round_trips() {
        let text = GeneratorConfig::example().expect("example");
        assert!(text.starts_with("# wiremodel-gen configuration"));
        let config = GeneratorConfig::parse(&text).expect("parse example");
        assert_eq!(config.package_prefix, "wire");
        assert!(config.emit_services);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wiremodel.toml");
        std::fs::write(&path, "package_prefix = \"wire\"\n").expect("write");
        let config = GeneratorConfig::from_file(&path).expect("load");
        assert_eq!(config.export_options().package_prefix, "wire");
        assert!(GeneratorConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
