// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic instantiation.
//!
//! [`TypeArgResolver`] substitutes positional type arguments into declared
//! member types. [`ModelBuilder::instantiate`] uses it to monomorphize a
//! template into an `Impl` descriptor.

use super::core::ModelBuilder;
use crate::diagnostics::DiagnosticKind;
use crate::introspect::{TypeInfo, TypeIntrospector, TypePolicy, TypeRef, Wildcard};
use crate::model::{DescriptorId, Instance, MessageForm, MessageType, TypeKind};
use tracing::debug;

/// Bound on instantiations nested inside instantiations.
pub const MAX_INSTANTIATION_DEPTH: usize = 32;

/// Outcome of substituting type arguments into a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Fully concrete, ready to bind.
    Concrete(TypeRef),
    /// Still mentions free variables; re-resolved by a later instantiation.
    Symbolic(TypeRef),
    Unresolved(String),
}

impl Resolution {
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Concrete(_))
    }
}

/// Positional binding of a template's type variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeArgResolver {
    bindings: Vec<(String, Option<TypeRef>)>,
}

impl TypeArgResolver {
    /// No variables in scope.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every variable bound to itself, as inside a template's own body.
    pub fn identity(vars: &[String]) -> Self {
        Self {
            bindings: vars
                .iter()
                .map(|v| (v.clone(), Some(TypeRef::Var(v.clone()))))
                .collect(),
        }
    }

    /// Bind `vars[i]` to `args[i]`. Variables past the end of `args` stay unbound.
    pub fn new(vars: &[String], args: Vec<TypeRef>) -> Self {
        Self::with_bindings(vars, args.into_iter().map(Some).collect())
    }

    pub fn with_bindings(vars: &[String], args: Vec<Option<TypeRef>>) -> Self {
        let mut args = args.into_iter();
        Self {
            bindings: vars
                .iter()
                .map(|v| (v.clone(), args.next().flatten()))
                .collect(),
        }
    }

    pub fn index_of(&self, var: &str) -> Option<usize> {
        self.bindings.iter().position(|(name, _)| name == var)
    }

    pub fn resolve(&self, ty: &TypeRef) -> Resolution {
        match ty {
            TypeRef::Var(name) => self.resolve_var(name),
            TypeRef::Wildcard(Wildcard::Unbounded) => {
                Resolution::Unresolved("unbounded wildcard has no binding".into())
            }
            TypeRef::Wildcard(Wildcard::Extends(bound)) | TypeRef::Wildcard(Wildcard::Super(bound)) => {
                self.resolve(bound)
            }
            TypeRef::Array(inner) => match self.resolve(inner) {
                Resolution::Concrete(t) => Resolution::Concrete(TypeRef::array(t)),
                Resolution::Symbolic(t) => Resolution::Symbolic(TypeRef::array(t)),
                unresolved => unresolved,
            },
            TypeRef::Named { name, args } => {
                let mut rebuilt = Vec::with_capacity(args.len());
                let mut symbolic = false;
                for arg in args {
                    match self.resolve(arg) {
                        Resolution::Concrete(t) => rebuilt.push(t),
                        Resolution::Symbolic(t) => {
                            symbolic = true;
                            rebuilt.push(t);
                        }
                        unresolved => return unresolved,
                    }
                }
                let ty = TypeRef::generic(name.clone(), rebuilt);
                if symbolic {
                    Resolution::Symbolic(ty)
                } else {
                    Resolution::Concrete(ty)
                }
            }
        }
    }

    fn resolve_var(&self, name: &str) -> Resolution {
        let Some(index) = self.index_of(name) else {
            return Resolution::Unresolved(format!("type variable `{}` is not declared", name));
        };
        match self.bindings.get(index).and_then(|(_, arg)| arg.as_ref()) {
            None => Resolution::Unresolved(format!(
                "no argument captured at index {} for `{}`",
                index, name
            )),
            Some(arg) if arg.is_concrete() => Resolution::Concrete(arg.clone()),
            Some(arg) => Resolution::Symbolic(arg.clone()),
        }
    }

    /// Substitute through this scope, keeping unresolvable slots empty.
    pub fn capture(&self, args: &[TypeRef]) -> Vec<Option<TypeRef>> {
        args.iter()
            .map(|arg| match self.resolve(arg) {
                Resolution::Concrete(t) | Resolution::Symbolic(t) => Some(t),
                Resolution::Unresolved(_) => None,
            })
            .collect()
    }
}

impl<'a, I, P> ModelBuilder<'a, I, P>
where
    I: TypeIntrospector + ?Sized,
    P: TypePolicy + ?Sized,
{
    /// Produce or reuse the `Impl` of `template` for `args`.
    pub(super) fn instantiate(
        &mut self,
        template: DescriptorId,
        info: &'a TypeInfo,
        args: &[TypeRef],
        owner: Option<DescriptorId>,
    ) -> Option<DescriptorId> {
        // Templates are never rendered, so their instantiations get no declaring context.
        let owner = owner.filter(|o| !self.registry[*o].is_template());
        let signature = args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let key = (template, owner, signature);
        if let Some(id) = self.registry.instances.get(&key) {
            return Some(*id);
        }
        if self.stack.len() >= MAX_INSTANTIATION_DEPTH {
            self.registry.diagnostics.error(
                DiagnosticKind::UnresolvedGeneric,
                info.name.clone(),
                format!(
                    "instantiation nested deeper than {} levels: {}",
                    MAX_INSTANTIATION_DEPTH,
                    self.stack.join(" -> ")
                ),
            );
            return None;
        }

        if args.len() != info.type_params.len() {
            self.registry.diagnostics.error(
                DiagnosticKind::UnresolvedGeneric,
                info.name.clone(),
                format!(
                    "expected {} type arguments, found {}",
                    info.type_params.len(),
                    args.len()
                ),
            );
        }

        let (base, namespace) = match owner {
            Some(o) => {
                let desc = &self.registry[o];
                (
                    format!("{}.{}Impl", desc.name, info.simple_name()),
                    desc.namespace.clone(),
                )
            }
            None => {
                let namespace = self.registry[template].namespace.clone();
                let base = if namespace.is_empty() {
                    format!("{}Impl", info.simple_name())
                } else {
                    format!("{}.{}Impl", namespace, info.simple_name())
                };
                (base, namespace)
            }
        };
        let name = self.unique_name(&base);

        let id = self.registry.alloc(
            &name,
            &namespace,
            TypeKind::Message(MessageType {
                fields: Vec::new(),
                form: MessageForm::Impl(Instance {
                    template,
                    impl_name: name.clone(),
                    arguments: args.to_vec(),
                    declaring: owner,
                }),
            }),
        );
        self.registry
            .slots
            .insert(name.clone(), super::Slot::Resolved(id));
        match owner {
            Some(o) => self.attach(o, id),
            None => {
                self.registry
                    .namespace_mut(&namespace)
                    .types
                    .insert(name.clone(), id);
            }
        }
        if let Some(m) = self.registry.descriptor_mut(template).message_mut() {
            if let MessageForm::Template(t) = &mut m.form {
                t.impls.push(id);
            }
        }
        self.registry.instances.insert(key, id);
        self.registry.descriptor_mut(id).rpc = self.policy.rpc_info(info);

        debug!(template = %info.name, instance = %name, "instantiating template");
        let env = TypeArgResolver::new(&info.type_params, args.to_vec());
        self.stack.push(name);
        self.extract_members(id, info, &env);
        self.stack.pop();
        Some(id)
    }

    /// Skips names already registered and names the catalog describes, so a
    /// real type registered later never binds to an impl.
    fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| {
            self.registry.slots.contains_key(name) || self.introspector.describe(name).is_some()
        };
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}
