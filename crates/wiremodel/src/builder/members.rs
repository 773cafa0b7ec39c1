// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Member extraction, accessor discovery and tag assignment.

use super::core::{ModelBuilder, TagPolicy};
use super::generics::{Resolution, TypeArgResolver};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::introspect::{
    Annotations, MemberInfo, MethodInfo, TypeClass, TypeInfo, TypeIntrospector, TypePolicy,
};
use crate::model::{Accessor, DescriptorId, FieldDescriptor, TagSource};
use std::collections::{BTreeSet, HashMap};

/// Methods that never count as accessors.
const NOT_ACCESSORS: &[&str] = &["toString", "equals", "clone", "hashCode"];

struct Collected<'a> {
    member: &'a MemberInfo,
    declaring: &'a str,
    resolution: Resolution,
}

impl<'a, I, P> ModelBuilder<'a, I, P>
where
    I: TypeIntrospector + ?Sized,
    P: TypePolicy + ?Sized,
{
    /// Collect the fields of `info` (and its walked ancestors) into message `id`.
    pub(super) fn extract_members(&mut self, id: DescriptorId, info: &'a TypeInfo, env: &TypeArgResolver) {
        if !info.has_members() {
            return;
        }
        let introspector = self.introspector;
        let owner_name = self.registry[id].name.clone();

        // Nearest first, each level with the scope its members resolve in.
        let mut levels: Vec<(&'a TypeInfo, TypeArgResolver)> = vec![(info, env.clone())];
        for ancestor in introspector.ancestors(info) {
            if !self.policy.walk_ancestor(&ancestor.info.name) {
                break;
            }
            let captured = match levels.last() {
                Some((_, scope)) => scope.capture(ancestor.reference.args()),
                None => Vec::new(),
            };
            if !ancestor.reference.args().is_empty() && captured.iter().any(Option::is_none) {
                self.registry.diagnostics.error(
                    DiagnosticKind::UnresolvedGeneric,
                    owner_name.clone(),
                    format!("superclass `{}` has unresolvable arguments", ancestor.reference),
                );
            }
            if ancestor.info.class == TypeClass::Message {
                self.bind_named(&ancestor.info.name, &[], None);
            }
            levels.push((
                ancestor.info,
                TypeArgResolver::with_bindings(&ancestor.info.type_params, captured),
            ));
        }

        // Most distant ancestor first; redeclared names keep their first position.
        let mut collected: Vec<Collected<'a>> = Vec::new();
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        for (level, scope) in levels.iter().rev() {
            let level: &'a TypeInfo = *level;
            for member in level.members.iter().filter(|m| !m.is_static) {
                let entry = Collected {
                    member,
                    declaring: level.name.as_str(),
                    resolution: scope.resolve(&member.ty),
                };
                match positions.get(member.name.as_str()) {
                    Some(&pos) => {
                        self.registry.diagnostics.warn(
                            DiagnosticKind::DuplicateMember,
                            owner_name.clone(),
                            format!(
                                "member `{}` of {} overrides the one declared by {}",
                                member.name, entry.declaring, collected[pos].declaring
                            ),
                        );
                        collected[pos] = entry;
                    }
                    None => {
                        positions.insert(member.name.as_str(), collected.len());
                        collected.push(entry);
                    }
                }
            }
        }

        // Instantiations found in an Impl's fields share the Impl's declaring context.
        let nest_owner = match self.registry[id].instance() {
            Some(instance) => instance.declaring,
            None => Some(id),
        };
        let methods = introspector.methods(info);

        let mut fields = Vec::with_capacity(collected.len());
        let mut explicit = Vec::with_capacity(collected.len());
        for (index, entry) in collected.into_iter().enumerate() {
            let member = entry.member;
            let (getter, setter) = find_accessors(&methods, &member.name);
            let annotations = merge_annotations(
                &member.annotations,
                getter.as_ref().map(|(_, m)| &m.annotations),
                setter.as_ref().map(|(_, m)| &m.annotations),
            );

            let (declared, type_id) = match entry.resolution {
                Resolution::Concrete(ty) => {
                    let type_id = self.bind(&ty, nest_owner);
                    (ty, type_id)
                }
                Resolution::Symbolic(ty) => (ty, None),
                Resolution::Unresolved(reason) => {
                    self.registry.diagnostics.error(
                        DiagnosticKind::UnresolvedGeneric,
                        format!("{}.{}", owner_name, member.name),
                        reason,
                    );
                    (member.ty.clone(), None)
                }
            };

            explicit.push(annotations.tag);
            fields.push(FieldDescriptor {
                name: member.name.clone(),
                external_name: annotations.name.unwrap_or_else(|| member.name.clone()),
                declared,
                type_id,
                declaring_type: entry.declaring.to_string(),
                tag: 0,
                tag_source: TagSource::Auto,
                index,
                ignored: annotations.ignore.unwrap_or(false),
                getter: getter.map(|(a, _)| a),
                setter: setter.map(|(a, _)| a),
                offset: member.offset,
            });
        }

        assign_tags(
            &mut fields,
            &explicit,
            self.options.tag_policy,
            &owner_name,
            &mut self.registry.diagnostics,
        );

        if let Some(message) = self.registry.descriptor_mut(id).message_mut() {
            message.fields = fields;
        }
        self.registry.record_dependencies(id);
    }
}

/// Getter and setter for `member`, each with the method it came from.
pub(super) fn find_accessors<'m>(
    methods: &[&'m MethodInfo],
    member: &str,
) -> (
    Option<(Accessor, &'m MethodInfo)>,
    Option<(Accessor, &'m MethodInfo)>,
) {
    let find = |name: &str, params: usize| {
        methods
            .iter()
            .copied()
            .find(|m| {
                m.name == name && m.params == params && !NOT_ACCESSORS.contains(&m.name.as_str())
            })
    };
    let cap = capitalize(member);

    let mut getter = find(format!("get{}", cap).as_str(), 0)
        .or_else(|| find(format!("is{}", cap).as_str(), 0))
        .map(|m| (Accessor::prefixed(m.name.clone()), m));

    // Same-name fluent accessors: one argument sets, zero arguments gets.
    if getter.is_none() {
        getter = find(member, 0).map(|m| (Accessor::fluent(m.name.clone()), m));
    }
    let setter = find(member, 1)
        .map(|m| (Accessor::fluent(m.name.clone()), m))
        .or_else(|| {
            find(format!("set{}", cap).as_str(), 1)
                .map(|m| (Accessor::prefixed(m.name.clone()), m))
        });
    (getter, setter)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First present value wins: member, then getter, then setter.
fn merge_annotations(
    member: &Annotations,
    getter: Option<&Annotations>,
    setter: Option<&Annotations>,
) -> Annotations {
    let layers: Vec<&Annotations> = [Some(member), getter, setter]
        .into_iter()
        .flatten()
        .collect();
    Annotations {
        tag: layers.iter().find_map(|a| a.tag),
        name: layers.iter().find_map(|a| a.name.clone()),
        ignore: layers.iter().find_map(|a| a.ignore),
    }
}

/// Give every field a positive tag. Explicit tags always win.
pub(super) fn assign_tags(
    fields: &mut [FieldDescriptor],
    explicit: &[Option<u32>],
    policy: TagPolicy,
    owner: &str,
    diagnostics: &mut Diagnostics,
) {
    let mut explicit = explicit.to_vec();
    for (field, tag) in fields.iter().zip(explicit.iter_mut()) {
        if *tag == Some(0) {
            diagnostics.warn(
                DiagnosticKind::InvalidTag,
                format!("{}.{}", owner, field.name),
                "explicit tag 0 is not a valid field number; assigning one",
            );
            *tag = None;
        }
    }

    let reserved: BTreeSet<u32> = match policy {
        TagPolicy::Sequential => BTreeSet::new(),
        TagPolicy::ReserveExplicit => explicit.iter().flatten().copied().collect(),
    };

    let mut next = 0u32;
    for (field, tag) in fields.iter_mut().zip(explicit) {
        match tag {
            Some(tag) => {
                field.tag = tag;
                field.tag_source = TagSource::Explicit;
            }
            None => {
                next += 1;
                while reserved.contains(&next) {
                    next += 1;
                }
                field.tag = next;
                field.tag_source = TagSource::Auto;
            }
        }
    }
}
