// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Library side of the `wiremodel-gen` command-line tool.
//!
//! [`pipeline::Pipeline`] drives a full run: load a type catalog, build and
//! resolve the model, export schema files, write `manifest.json` and
//! optionally hand the files to an external schema compiler.

pub mod inspect;
pub mod manifest;
pub mod pipeline;

pub use inspect::ModelView;
pub use manifest::{RunManifest, MANIFEST_FILE};
pub use pipeline::{Pipeline, RunOutcome};
