// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Diagnostic collector.
//!
//! Recoverable problems found while building, resolving or exporting are
//! recorded here instead of being returned as errors. Every entry is also
//! emitted through `tracing` as it is recorded.

use serde::Serialize;
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Type variable or wildcard with no matching argument.
    UnresolvedGeneric,
    DuplicateMember,
    DuplicateTag,
    InvalidTag,
    /// Leaf type with no entry in the scalar table.
    UnsupportedKind,
    /// Referenced type the introspector does not describe.
    UnknownType,
    /// Generic type used without arguments.
    RawGeneric,
    Io,
    Compiler,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnresolvedGeneric => "unresolved-generic",
            Self::DuplicateMember => "duplicate-member",
            Self::DuplicateTag => "duplicate-tag",
            Self::InvalidTag => "invalid-tag",
            Self::UnsupportedKind => "unsupported-kind",
            Self::UnknownType => "unknown-type",
            Self::RawGeneric => "raw-generic",
            Self::Io => "io",
            Self::Compiler => "compiler",
        };
        f.write_str(s)
    }
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Type, field or namespace the problem is about.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}[{}] {}: {}",
            level, self.kind, self.subject, self.message
        )
    }
}

/// Ordered list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                kind = %diagnostic.kind,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
            Severity::Error => tracing::error!(
                kind = %diagnostic.kind,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
        }
        self.entries.push(diagnostic);
    }

    pub fn warn(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic {
            kind,
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn error(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic {
            kind,
            severity: Severity::Error,
            subject: subject.into(),
            message: message.into(),
        });
    }

    /// Append without logging again.
    pub fn extend(&mut self, other: &Diagnostics) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
