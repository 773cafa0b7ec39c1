// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type model builder.
//!
//! [`ModelBuilder`] consumes [`crate::introspect::Entry`] values, registers
//! every distinct type once in a [`Registry`], instantiates generic
//! templates, files nested types under their enclosing types and records
//! namespace dependencies. [`Registry::resolve`] then binds forward
//! references before the registry is handed to the exporter.

mod core;
mod enclosing;
mod generics;
mod members;
mod registry;
mod resolve;

pub use core::{BuildOptions, ModelBuilder, TagPolicy};
pub use generics::{Resolution, TypeArgResolver, MAX_INSTANTIATION_DEPTH};
pub use registry::{Registry, Slot};
pub use resolve::ResolveSummary;
