// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptor model.
//!
//! Plain data: descriptors, fields, namespaces and actions. Descriptors live
//! in the [`crate::Registry`] arena and refer to each other by
//! [`DescriptorId`], so forward references and cycles need no shared
//! ownership.

mod field;
mod namespace;
mod types;

pub use field::{Accessor, FieldDescriptor, TagSource};
pub use namespace::{NamespaceDescriptor, RpcActionDescriptor};
pub use types::{
    CollectionRepr, CollectionType, DescriptorId, EnumConstant, Instance, MapType, MessageForm,
    MessageType, ScalarKind, Template, TypeDescriptor, TypeKind,
};
