// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ancestor filtering and RPC metadata hooks.

use super::{RpcInfo, TypeInfo};
use regex::Regex;

/// Predicates consulted while walking a type's ancestors.
pub trait TypePolicy {
    /// Allow-list check for an ancestor's canonical name.
    fn include(&self, name: &str) -> bool;

    /// Deny-list check for an ancestor's canonical name.
    fn exclude(&self, name: &str) -> bool;

    /// Whether an ancestor's members are collected into its subtypes.
    fn walk_ancestor(&self, name: &str) -> bool {
        self.include(name) && !self.exclude(name)
    }

    /// RPC path metadata for a concrete type.
    fn rpc_info(&self, info: &TypeInfo) -> Option<RpcInfo> {
        info.rpc.clone()
    }
}

/// Walks every ancestor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPolicy;

impl TypePolicy for OpenPolicy {
    fn include(&self, _name: &str) -> bool {
        true
    }

    fn exclude(&self, _name: &str) -> bool {
        false
    }
}

/// Regular-expression allow-list and deny-list.
///
/// An empty allow-list admits everything.
#[derive(Debug, Clone, Default)]
pub struct PatternPolicy {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl PatternPolicy {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, regex::Error> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p.as_ref())).collect()
}

impl TypePolicy for PatternPolicy {
    fn include(&self, name: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|re| re.is_match(name))
    }

    fn exclude(&self, name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_policy_walks_everything() {
        assert!(OpenPolicy.walk_ancestor("std.Object"));
    }

    #[test]
    fn test_pattern_policy() {
        let policy = PatternPolicy::new(&["^acme\\."], &["Internal$"]).expect("regex");
        assert!(policy.walk_ancestor("acme.Base"));
        assert!(!policy.walk_ancestor("acme.BaseInternal"));
        assert!(!policy.walk_ancestor("other.Base"));
    }

    #[test]
    fn test_empty_allow_list_admits_all() {
        let empty: [&str; 0] = [];
        let policy = PatternPolicy::new(&empty, &["^std\\."]).expect("regex");
        assert!(policy.include("other.Base"));
        assert!(!policy.walk_ancestor("std.Object"));
    }

    #[test]
    fn test_bad_pattern() {
        assert!(PatternPolicy::new(&["("], &[]).is_err());
    }

    #[test]
    fn test_rpc_info_from_type() {
        let info = TypeInfo::message("acme.Create").with_rpc(&["/orders"]);
        let rpc = OpenPolicy.rpc_info(&info).expect("rpc");
        assert_eq!(rpc.paths, vec!["/orders".to_string()]);
    }
}
