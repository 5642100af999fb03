//! Per-library index of extension and inline-container interop members.
//!
//! Extension and inline-container members are compiled to top-level
//! procedures; the index maps each such procedure back to the descriptor that
//! says what it was declared as. The index is built eagerly, in one scan,
//! when the traversal enters a library and is never mutated afterwards.

use crate::program_facts::ProgramFacts;
use indexmap::{IndexMap, IndexSet};
use jsil_ir::annotations::trusts_static_types;
use jsil_ir::{
    ExtensionMemberDescriptor, ExtensionMemberKind, InlineClassId, InlineClassMemberDescriptor,
    InlineClassMemberKind, Library, Member, MemberId, MemberKind, Type,
};

/// How an indexed member was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDescriptor {
    Extension(ExtensionMemberDescriptor),
    Inline {
        descriptor: InlineClassMemberDescriptor,
        container: InlineClassId,
    },
}

/// Declared kind of a member, unified across the descriptor universes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclaredKind {
    Getter,
    Setter,
    Method,
    Operator,
    TearOff,
    Constructor,
    Factory,
}

impl MemberDescriptor {
    pub fn kind(&self) -> DeclaredKind {
        match self {
            Self::Extension(descriptor) => match descriptor.kind {
                ExtensionMemberKind::Getter => DeclaredKind::Getter,
                ExtensionMemberKind::Setter => DeclaredKind::Setter,
                ExtensionMemberKind::Method => DeclaredKind::Method,
                ExtensionMemberKind::Operator => DeclaredKind::Operator,
                ExtensionMemberKind::TearOff => DeclaredKind::TearOff,
            },
            Self::Inline { descriptor, .. } => match descriptor.kind {
                InlineClassMemberKind::Constructor => DeclaredKind::Constructor,
                InlineClassMemberKind::Factory => DeclaredKind::Factory,
                InlineClassMemberKind::Getter => DeclaredKind::Getter,
                InlineClassMemberKind::Setter => DeclaredKind::Setter,
                InlineClassMemberKind::Method => DeclaredKind::Method,
                InlineClassMemberKind::Operator => DeclaredKind::Operator,
                InlineClassMemberKind::TearOff => DeclaredKind::TearOff,
            },
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Self::Extension(descriptor) => descriptor.is_static,
            Self::Inline { descriptor, .. } => descriptor.is_static,
        }
    }
}

impl DeclaredKind {
    /// Kind of a member that has no descriptor.
    pub const fn of_member(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Getter => Self::Getter,
            MemberKind::Setter => Self::Setter,
            MemberKind::Method => Self::Method,
            MemberKind::Operator => Self::Operator,
            MemberKind::Constructor => Self::Constructor,
            MemberKind::Factory => Self::Factory,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemberIndex {
    extension_members: IndexMap<MemberId, ExtensionMemberDescriptor>,
    trust_types_members: IndexSet<MemberId>,
    inline_members: IndexMap<MemberId, (InlineClassMemberDescriptor, InlineClassId)>,
}

impl MemberIndex {
    pub fn build(library: &Library, facts: &ProgramFacts) -> Self {
        let mut index = Self::default();

        for extension in &library.extensions {
            // The on-type decides whether an extension binds to JS.
            let (is_interop, trusts_types) = match &extension.on_type {
                Type::Interface(interface) => match facts.class(interface.class) {
                    Some(class) => (
                        class.is_interop_container(),
                        trusts_static_types(&class.annotations),
                    ),
                    None => (false, false),
                },
                Type::Inline(inline) => match facts.inline_class(inline.inline_class) {
                    Some(inline_class) => (
                        inline_class.is_interop_container()
                            || jsil_ir::annotations::is_native(&inline_class.annotations),
                        trusts_static_types(&inline_class.annotations),
                    ),
                    None => (false, false),
                },
                _ => (false, false),
            };
            if !is_interop {
                continue;
            }
            for descriptor in &extension.members {
                index
                    .extension_members
                    .insert(descriptor.member, descriptor.clone());
                if trusts_types {
                    index.trust_types_members.insert(descriptor.member);
                }
            }
        }

        for inline_class in &library.inline_classes {
            let Some(facts) = facts.inline_class(inline_class.id) else {
                continue;
            };
            if !facts.is_interop_container() {
                continue;
            }
            for descriptor in &inline_class.members {
                index
                    .inline_members
                    .insert(descriptor.member, (descriptor.clone(), inline_class.id));
            }
        }

        tracing::trace!(
            library = %library.import_uri,
            extension_members = index.extension_members.len(),
            inline_members = index.inline_members.len(),
            "[interop] built member index"
        );
        index
    }

    pub fn descriptor_of(&self, member: MemberId) -> Option<MemberDescriptor> {
        if let Some(descriptor) = self.extension_members.get(&member) {
            return Some(MemberDescriptor::Extension(descriptor.clone()));
        }
        self.inline_members
            .get(&member)
            .map(|(descriptor, container)| MemberDescriptor::Inline {
                descriptor: descriptor.clone(),
                container: *container,
            })
    }

    /// Whether the member's on-type asks for its static type to be trusted.
    pub fn trusts_types(&self, member: MemberId) -> bool {
        self.trust_types_members.contains(&member)
    }

    /// The inline container owning `member`.
    pub fn container_of(&self, member: MemberId) -> Option<InlineClassId> {
        self.inline_members
            .get(&member)
            .map(|(_, container)| *container)
    }

    /// A non-static extension member, or a non-static inline-container member
    /// that is not a constructor or factory.
    pub fn is_instance_interop_member(&self, member: &Member) -> bool {
        if member.is_extension_member {
            if let Some(descriptor) = self.extension_members.get(&member.id) {
                return !descriptor.is_static;
            }
        }
        if member.is_inline_class_member {
            if let Some((descriptor, _)) = self.inline_members.get(&member.id) {
                return !descriptor.is_static
                    && !matches!(
                        descriptor.kind,
                        InlineClassMemberKind::Constructor | InlineClassMemberKind::Factory
                    );
            }
        }
        false
    }

    pub fn extension_member_count(&self) -> usize {
        self.extension_members.len()
    }

    pub fn inline_member_count(&self) -> usize {
        self.inline_members.len()
    }
}

#[cfg(test)]
#[path = "tests/member_index_tests.rs"]
mod tests;
