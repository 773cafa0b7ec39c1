// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Core `ModelBuilder`: entry registration and type classification.

use super::generics::{Resolution, TypeArgResolver};
use super::registry::{Registry, Slot};
use crate::diagnostics::DiagnosticKind;
use crate::introspect::{
    parent_name_of, ActionEntry, Entry, TypeClass, TypeInfo, TypeIntrospector, TypePolicy,
    TypeRef,
};
use crate::model::{
    CollectionRepr, CollectionType, DescriptorId, EnumConstant, MapType, MessageType,
    RpcActionDescriptor, ScalarKind, TypeKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// How auto tags interact with explicit ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagPolicy {
    /// Auto tags count 1, 2, 3 over auto fields only; explicit tags are not avoided.
    #[default]
    Sequential,
    /// Auto tags skip every explicit tag of the message.
    ReserveExplicit,
}

/// Builder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub tag_policy: TagPolicy,
}

/// Stateful builder turning introspected types into a [`Registry`].
pub struct ModelBuilder<'a, I: TypeIntrospector + ?Sized, P: TypePolicy + ?Sized> {
    pub(super) introspector: &'a I,
    pub(super) policy: &'a P,
    pub(super) options: BuildOptions,
    pub(super) registry: Registry,
    /// Instantiations in progress, outermost first.
    pub(super) stack: Vec<String>,
}

impl<'a, I, P> ModelBuilder<'a, I, P>
where
    I: TypeIntrospector + ?Sized,
    P: TypePolicy + ?Sized,
{
    pub fn new(introspector: &'a I, policy: &'a P) -> Self {
        Self {
            introspector,
            policy,
            options: BuildOptions::default(),
            registry: Registry::new(),
            stack: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Hand over the registry. Run [`Registry::resolve`] before exporting.
    pub fn finish(self) -> Registry {
        self.registry
    }

    pub fn register_all<'e>(&mut self, entries: impl IntoIterator<Item = &'e Entry>) {
        for entry in entries {
            self.register_entry(entry);
        }
    }

    pub fn register_entry(&mut self, entry: &Entry) {
        match entry {
            Entry::Type { name } => {
                self.register_type(name);
            }
            Entry::Action(action) => self.register_action(action),
        }
    }

    /// Register a type by canonical name.
    pub fn register_type(&mut self, name: &str) -> Option<DescriptorId> {
        self.bind_named(name, &[], None)
    }

    /// Register a declared type expression on behalf of `owner`.
    ///
    /// Returns `None` when the expression cannot be made concrete.
    pub fn register(&mut self, ty: &TypeRef, owner: Option<DescriptorId>) -> Option<DescriptorId> {
        match TypeArgResolver::empty().resolve(ty) {
            Resolution::Concrete(t) => self.bind(&t, owner),
            Resolution::Symbolic(_) => {
                self.registry.diagnostics.error(
                    DiagnosticKind::UnresolvedGeneric,
                    ty.to_string(),
                    "type variables have no binding outside a template",
                );
                None
            }
            Resolution::Unresolved(reason) => {
                self.registry.diagnostics.error(
                    DiagnosticKind::UnresolvedGeneric,
                    ty.to_string(),
                    reason,
                );
                None
            }
        }
    }

    fn register_action(&mut self, action: &ActionEntry) {
        let introspector = self.introspector;
        let handler_info = introspector.describe(&action.handler);
        let namespace = handler_info
            .map(|info| info.namespace.clone())
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| parent_name_of(&action.handler).to_string());

        let exists = self
            .registry
            .namespace(&namespace)
            .is_some_and(|ns| ns.actions.contains_key(&action.handler));
        if exists {
            return;
        }

        let request = action.request.as_ref().and_then(|t| self.register(t, None));
        let response = action.response.as_ref().and_then(|t| self.register(t, None));

        let rpc = action
            .request
            .as_ref()
            .and_then(|t| t.raw_name())
            .and_then(|name| introspector.describe(name))
            .and_then(|info| self.policy.rpc_info(info))
            .or_else(|| handler_info.and_then(|info| self.policy.rpc_info(info)));

        debug!(handler = %action.handler, namespace = %namespace, "registering action");
        let descriptor = RpcActionDescriptor {
            handler: action.handler.clone(),
            simple_name: crate::introspect::simple_name_of(&action.handler).to_string(),
            namespace: namespace.clone(),
            request,
            response,
            kind: action.kind,
            rpc,
        };

        let mut deps = BTreeSet::new();
        for id in [request, response].into_iter().flatten() {
            self.registry.collect_namespaces(id, &mut deps);
        }
        deps.remove(&namespace);
        let ns = self.registry.namespace_mut(&namespace);
        ns.service_depends_on.extend(deps);
        ns.actions.insert(action.handler.clone(), descriptor);
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    /// Bind a concrete type expression to a descriptor, registering on demand.
    pub(super) fn bind(&mut self, ty: &TypeRef, owner: Option<DescriptorId>) -> Option<DescriptorId> {
        match ty {
            TypeRef::Named { name, args } => self.bind_named(name, args, owner),
            TypeRef::Array(component) => self.bind_array(component, owner),
            TypeRef::Var(_) | TypeRef::Wildcard(_) => {
                self.registry.diagnostics.error(
                    DiagnosticKind::UnresolvedGeneric,
                    ty.to_string(),
                    "symbolic type cannot be bound",
                );
                None
            }
        }
    }

    pub(super) fn bind_named(
        &mut self,
        name: &str,
        args: &[TypeRef],
        owner: Option<DescriptorId>,
    ) -> Option<DescriptorId> {
        let introspector = self.introspector;
        let Some(info) = introspector.describe(name) else {
            return Some(self.unknown_type(name));
        };

        match info.class {
            TypeClass::Primitive => Some(match info.scalar {
                Some(kind) => self.leaf(info, TypeKind::Primitive(kind)),
                None => self.unsupported(info),
            }),
            TypeClass::Boxed => Some(match info.scalar {
                Some(kind) => self.leaf(info, TypeKind::BoxedPrimitive(kind)),
                None => self.unsupported(info),
            }),
            TypeClass::Decimal => Some(self.leaf(info, TypeKind::Decimal)),
            TypeClass::Duration => Some(self.leaf(info, TypeKind::Duration)),
            TypeClass::Date => Some(self.leaf(info, TypeKind::Date)),
            TypeClass::Bytes => Some(self.leaf(info, TypeKind::Bytes { buffer: false })),
            TypeClass::Buffer => Some(self.leaf(info, TypeKind::Bytes { buffer: true })),
            TypeClass::String => Some(self.leaf(info, TypeKind::String)),
            TypeClass::Set => Some(self.bind_collection(info, args, owner, true)),
            TypeClass::Map => Some(self.bind_map(info, args, owner)),
            TypeClass::List => Some(self.bind_collection(info, args, owner, false)),
            TypeClass::Enum => Some(self.bind_enum(info)),
            TypeClass::Message | TypeClass::Interface => self.bind_message(info, args, owner),
            TypeClass::Opaque => Some(self.unsupported(info)),
        }
    }

    fn leaf(&mut self, info: &TypeInfo, kind: TypeKind) -> DescriptorId {
        if let Some(slot) = self.registry.slot(&info.name) {
            return slot.id();
        }
        let id = self.registry.alloc(&info.name, &info.namespace, kind);
        self.registry
            .slots
            .insert(info.name.clone(), Slot::Resolved(id));
        id
    }

    fn unknown_type(&mut self, name: &str) -> DescriptorId {
        if let Some(slot) = self.registry.slot(name) {
            return slot.id();
        }
        self.registry.diagnostics.warn(
            DiagnosticKind::UnknownType,
            name,
            "type is not described; mapped to the unknown marker",
        );
        self.registry.unknown.insert(name.to_string());
        let id = self
            .registry
            .alloc(name, "", TypeKind::Unknown(name.to_string()));
        self.registry.slots.insert(name.to_string(), Slot::Resolved(id));
        id
    }

    fn unsupported(&mut self, info: &TypeInfo) -> DescriptorId {
        if let Some(slot) = self.registry.slot(&info.name) {
            return slot.id();
        }
        let class = format!("{:?}", info.class).to_ascii_lowercase();
        self.registry.diagnostics.warn(
            DiagnosticKind::UnsupportedKind,
            info.name.clone(),
            format!("no wire mapping for {} type", class),
        );
        self.registry.unknown.insert(info.name.clone());
        let id = self
            .registry
            .alloc(&info.name, &info.namespace, TypeKind::Unknown(class));
        self.registry
            .slots
            .insert(info.name.clone(), Slot::Resolved(id));
        id
    }

    fn bind_array(&mut self, component: &TypeRef, owner: Option<DescriptorId>) -> Option<DescriptorId> {
        let introspector = self.introspector;
        let byte_array = component
            .raw_name()
            .and_then(|name| introspector.describe(name))
            .is_some_and(|info| {
                info.class == TypeClass::Primitive && info.scalar == Some(ScalarKind::Byte)
            });
        if byte_array {
            let name = format!("{}[]", component);
            if let Some(slot) = self.registry.slot(&name) {
                return Some(slot.id());
            }
            let namespace = parent_name_of(&name).to_string();
            let id = self
                .registry
                .alloc(&name, &namespace, TypeKind::Bytes { buffer: false });
            self.registry.slots.insert(name, Slot::Resolved(id));
            return Some(id);
        }

        let inner = self.bind(component, owner)?;
        let name = format!("{}[]", self.registry[inner].name);
        if let Some(slot) = self.registry.slot(&name) {
            return Some(slot.id());
        }
        let namespace = self.registry[inner].namespace.clone();
        let id = self.registry.alloc(
            &name,
            &namespace,
            TypeKind::List(CollectionType {
                component: Some(inner),
                repr: CollectionRepr::Array,
            }),
        );
        self.registry.slots.insert(name, Slot::Resolved(id));
        Some(id)
    }

    fn bind_collection(
        &mut self,
        info: &TypeInfo,
        args: &[TypeRef],
        owner: Option<DescriptorId>,
        set: bool,
    ) -> DescriptorId {
        let component = match args.first() {
            Some(arg) => self.bind(arg, owner),
            None => {
                self.raw_generic(info, owner);
                None
            }
        };
        let name = self.wrapper_name(&info.name, &[(component, args.first())]);
        if let Some(slot) = self.registry.slot(&name) {
            return slot.id();
        }
        let collection = CollectionType {
            component,
            repr: CollectionRepr::Collection,
        };
        let kind = if set {
            TypeKind::Set(collection)
        } else {
            TypeKind::List(collection)
        };
        let id = self.registry.alloc(&name, &info.namespace, kind);
        self.registry.slots.insert(name, Slot::Resolved(id));
        id
    }

    fn bind_map(&mut self, info: &TypeInfo, args: &[TypeRef], owner: Option<DescriptorId>) -> DescriptorId {
        if args.len() < 2 {
            self.raw_generic(info, owner);
        }
        let key = args.first().and_then(|arg| self.bind(arg, owner));
        let value = args.get(1).and_then(|arg| self.bind(arg, owner));
        let name = self.wrapper_name(&info.name, &[(key, args.first()), (value, args.get(1))]);
        if let Some(slot) = self.registry.slot(&name) {
            return slot.id();
        }
        let id = self
            .registry
            .alloc(&name, &info.namespace, TypeKind::Map(MapType { key, value }));
        self.registry.slots.insert(name, Slot::Resolved(id));
        id
    }

    /// Canonical identity of a wrapper: raw name plus its bound slots.
    fn wrapper_name(&self, raw: &str, slots: &[(Option<DescriptorId>, Option<&TypeRef>)]) -> String {
        if slots.iter().all(|(id, ty)| id.is_none() && ty.is_none()) {
            return raw.to_string();
        }
        let parts: Vec<String> = slots
            .iter()
            .map(|(id, ty)| match (id, ty) {
                (Some(id), _) => self.registry[*id].name.clone(),
                (None, Some(ty)) => ty.to_string(),
                (None, None) => "?".to_string(),
            })
            .collect();
        format!("{}<{}>", raw, parts.join(", "))
    }

    fn raw_generic(&mut self, info: &TypeInfo, owner: Option<DescriptorId>) {
        let subject = owner
            .map(|o| self.registry[o].name.clone())
            .unwrap_or_else(|| info.name.clone());
        self.registry.diagnostics.warn(
            DiagnosticKind::RawGeneric,
            subject,
            format!("`{}` used without type arguments", info.name),
        );
    }

    fn bind_enum(&mut self, info: &'a TypeInfo) -> DescriptorId {
        let constants: Vec<EnumConstant> = info
            .constants
            .iter()
            .zip(0u32..)
            .map(|(name, tag)| EnumConstant::new(name.clone(), tag))
            .collect();
        match self.registry.slot(&info.name) {
            Some(Slot::Resolved(id)) => id,
            Some(Slot::Placeholder(id)) => {
                self.upgrade(id, info, TypeKind::Enum(constants));
                id
            }
            None => self.alloc_declared(info, TypeKind::Enum(constants)),
        }
    }

    fn bind_message(
        &mut self,
        info: &'a TypeInfo,
        args: &[TypeRef],
        owner: Option<DescriptorId>,
    ) -> Option<DescriptorId> {
        let kind = if info.is_generic() {
            MessageType::template(info.type_params.clone())
        } else {
            MessageType::concrete()
        };

        let id = match self.registry.slot(&info.name) {
            Some(Slot::Resolved(id)) => id,
            Some(Slot::Placeholder(id)) => {
                self.upgrade(id, info, TypeKind::Message(kind));
                self.fill_message(id, info);
                id
            }
            None => {
                let id = self.alloc_declared(info, TypeKind::Message(kind));
                self.fill_message(id, info);
                id
            }
        };

        if self.registry[id].is_template() {
            if !args.is_empty() {
                return self.instantiate(id, info, args, owner);
            }
            if owner.is_some() {
                self.raw_generic(info, owner);
            }
        } else if !args.is_empty() {
            self.registry.diagnostics.warn(
                DiagnosticKind::UnresolvedGeneric,
                info.name.clone(),
                format!("{} type arguments given to a non-generic type", args.len()),
            );
        }
        Some(id)
    }

    fn fill_message(&mut self, id: DescriptorId, info: &'a TypeInfo) {
        debug!(name = %info.name, kind = self.registry[id].kind.label(), "registering message");
        self.registry.descriptor_mut(id).rpc = self.policy.rpc_info(info);
        let env = if info.is_generic() {
            TypeArgResolver::identity(&info.type_params)
        } else {
            TypeArgResolver::empty()
        };
        self.extract_members(id, info, &env);
    }

    pub(super) fn alloc_declared(&mut self, info: &TypeInfo, kind: TypeKind) -> DescriptorId {
        let id = self.registry.alloc(&info.name, &info.namespace, kind);
        self.registry
            .slots
            .insert(info.name.clone(), Slot::Resolved(id));
        self.link(id, info.enclosing.as_deref());
        id
    }
}
