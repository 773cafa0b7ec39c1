// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-target naming strategies.
//!
//! Some binding generators reject dotted names. A [`TargetStrategy`] gets the
//! last word on the rendered package name, every rendered type reference and
//! the language-interop options written into the file header.

use super::mapping::ProtoType;
use serde::{Deserialize, Serialize};

/// Naming and option overrides applied while rendering one schema file.
pub trait TargetStrategy {
    /// Package name written after `package`.
    fn package_name(&self, package: &str) -> String {
        package.to_string()
    }

    /// Field type as written in the schema.
    fn type_name(&self, ty: &ProtoType) -> ProtoType {
        ty.clone()
    }

    /// Value of `option java_package`, or `None` to omit it.
    fn java_package(&self, package: &str) -> Option<String> {
        Some(format!("proto.{}", package))
    }

    /// Value of `option csharp_namespace`, or `None` to omit it.
    fn csharp_namespace(&self, package: &str) -> Option<String> {
        let parts: Vec<String> = package
            .split('.')
            .filter(|part| !part.is_empty())
            .map(capitalize)
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(format!("WireMessage.{}", parts.join(".")))
    }
}

/// Names pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTarget;

impl TargetStrategy for DefaultTarget {}

/// Replaces `.` with `_` in the package and in every non-scalar type,
/// including map keys and values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenTarget;

impl TargetStrategy for FlattenTarget {
    fn package_name(&self, package: &str) -> String {
        package.replace('.', "_")
    }

    fn type_name(&self, ty: &ProtoType) -> ProtoType {
        ty.flatten()
    }
}

/// Selectable strategy, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Default,
    Flatten,
}

impl Target {
    pub fn strategy(self) -> &'static dyn TargetStrategy {
        match self {
            Self::Default => &DefaultTarget,
            Self::Flatten => &FlattenTarget,
        }
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "flatten" => Ok(Self::Flatten),
            other => Err(format!("unknown target '{}' (expected default or flatten)", other)),
        }
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
