// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type expressions.
//!
//! A [`TypeRef`] is the declared shape of a member, superclass or action
//! payload as written in a type catalog:
//!
//! ```text
//! acme.Order                      named
//! std.Map<std.String, acme.Item>  named with arguments
//! T                               type variable
//! ? extends T                     wildcard
//! acme.Item[]                     array
//! ```
//!
//! Undotted identifiers are type variables unless they are one of the
//! Rust-style aliases (`i32`, `String`, `Vec`, ...), which are rewritten to
//! their `std` names while parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rust-style aliases accepted in type expressions.
pub const ALIASES: &[(&str, &str)] = &[
    ("bool", "std.Bool"),
    ("i8", "std.Byte"),
    ("u8", "std.Byte"),
    ("i16", "std.Short"),
    ("u16", "std.Short"),
    ("char", "std.Char"),
    ("i32", "std.Int"),
    ("u32", "std.Int"),
    ("i64", "std.Long"),
    ("u64", "std.Long"),
    ("f32", "std.Float"),
    ("f64", "std.Double"),
    ("str", "std.String"),
    ("String", "std.String"),
    ("Vec", "std.List"),
    ("VecDeque", "std.Queue"),
    ("HashSet", "std.Set"),
    ("BTreeSet", "std.Set"),
    ("HashMap", "std.Map"),
    ("BTreeMap", "std.Map"),
];

/// Look up the `std` name behind a Rust-style alias.
pub fn resolve_alias(ident: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == ident)
        .map(|(_, target)| *target)
}

/// Error raised for a malformed type expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid type expression `{input}`: {reason}")]
pub struct ParseTypeRefError {
    pub input: String,
    pub reason: String,
}

/// Wildcard bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Wildcard {
    Unbounded,
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

/// Parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named { name: String, args: Vec<TypeRef> },
    Var(String),
    Wildcard(Wildcard),
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Named type without arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Named type with arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    pub fn array(component: TypeRef) -> Self {
        Self::Array(Box::new(component))
    }

    /// Raw name of a named type.
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        match self {
            Self::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// True when no type variable or wildcard appears anywhere in the expression.
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Named { args, .. } => args.iter().all(TypeRef::is_concrete),
            Self::Var(_) | Self::Wildcard(_) => false,
            Self::Array(inner) => inner.is_concrete(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Var(name) => f.write_str(name),
            Self::Wildcard(Wildcard::Unbounded) => f.write_str("?"),
            Self::Wildcard(Wildcard::Extends(bound)) => write!(f, "? extends {}", bound),
            Self::Wildcard(Wildcard::Super(bound)) => write!(f, "? super {}", bound),
            Self::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

impl FromStr for TypeRef {
    type Err = ParseTypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            input: s,
            chars: s.char_indices().peekable(),
        };
        let parsed = parser.parse_type()?;
        parser.skip_ws();
        if let Some((pos, c)) = parser.chars.peek().copied() {
            return Err(parser.error(format!("unexpected `{}` at offset {}", c, pos)));
        }
        Ok(parsed)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ParseTypeRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: impl Into<String>) -> ParseTypeRefError {
        ParseTypeRefError {
            input: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if matches!(self.chars.peek(), Some((_, c)) if *c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<String, ParseTypeRefError> {
        self.skip_ws();
        let mut out = String::new();
        while let Some((_, c)) = self.chars.peek().copied() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                out.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.error("expected a type name"));
        }
        if out.starts_with('.') || out.ends_with('.') || out.contains("..") {
            return Err(self.error(format!("malformed name `{}`", out)));
        }
        Ok(out)
    }

    fn parse_type(&mut self) -> Result<TypeRef, ParseTypeRefError> {
        self.skip_ws();
        let mut ty = if self.eat('?') {
            self.parse_wildcard()?
        } else {
            let ident = self.ident()?;
            let mut args = Vec::new();
            if self.eat('<') {
                loop {
                    args.push(self.parse_type()?);
                    if self.eat(',') {
                        continue;
                    }
                    if self.eat('>') {
                        break;
                    }
                    return Err(self.error("expected `,` or `>`"));
                }
            }
            if let Some(target) = resolve_alias(&ident) {
                TypeRef::generic(target, args)
            } else if ident.contains('.') || !args.is_empty() {
                TypeRef::generic(ident, args)
            } else {
                TypeRef::Var(ident)
            }
        };

        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            ty = TypeRef::array(ty);
        }
        Ok(ty)
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, ParseTypeRefError> {
        self.skip_ws();
        let input: &'a str = self.input;
        let rest = &input[self.offset()..];
        if rest.starts_with("extends") {
            self.ident()?;
            let bound = self.parse_type()?;
            Ok(TypeRef::Wildcard(Wildcard::Extends(Box::new(bound))))
        } else if rest.starts_with("super") {
            self.ident()?;
            let bound = self.parse_type()?;
            Ok(TypeRef::Wildcard(Wildcard::Super(Box::new(bound))))
        } else {
            Ok(TypeRef::Wildcard(Wildcard::Unbounded))
        }
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(pos, _)| *pos)
            .unwrap_or(self.input.len())
    }
}
