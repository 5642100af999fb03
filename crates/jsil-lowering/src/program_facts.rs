//! Read-only facts about the whole program.
//!
//! A library is rewritten in place while the pass still needs the
//! signatures and annotations of declarations anywhere in the program,
//! including the library being rewritten. [`ProgramFacts`] is collected once
//! before any mutation and shared (behind an `Arc`) by every library
//! traversal.

use jsil_ir::annotations::{is_internal_js_interop, is_js_interop, is_native};
use jsil_ir::{
    Annotations, ClassId, InlineClassId, LibraryId, MemberId, MemberKind, Program, Type,
    TypeParameterId,
};
use rustc_hash::FxHashMap;

/// Signature of a member as seen by callers.
#[derive(Debug, Clone)]
pub struct MemberSignature {
    pub kind: MemberKind,
    pub is_static: bool,
    pub type_parameters: Vec<TypeParameterId>,
    pub positional: Vec<Type>,
    pub return_type: Type,
    pub enclosing_class: Option<ClassId>,
}

impl MemberSignature {
    /// Type of a tear-off of this member.
    pub fn function_type(&self) -> Type {
        let mut ty = Type::function(self.positional.clone(), self.return_type.clone());
        if let Type::Function(function) = &mut ty {
            function.type_parameters = self.type_parameters.clone();
        }
        ty
    }
}

#[derive(Debug, Clone)]
pub struct ClassFacts {
    pub name: String,
    pub library: LibraryId,
    pub annotations: Annotations,
    pub type_parameters: Vec<TypeParameterId>,
}

impl ClassFacts {
    /// Whether members added to this class by extensions bind to JS.
    pub fn is_interop_container(&self) -> bool {
        is_js_interop(&self.annotations)
            || is_internal_js_interop(&self.annotations)
            || is_native(&self.annotations)
    }
}

#[derive(Debug, Clone)]
pub struct InlineClassFacts {
    pub name: String,
    pub library: LibraryId,
    pub annotations: Annotations,
}

impl InlineClassFacts {
    pub fn is_interop_container(&self) -> bool {
        is_js_interop(&self.annotations) || is_internal_js_interop(&self.annotations)
    }
}

#[derive(Debug, Clone)]
pub struct LibraryFacts {
    pub import_uri: String,
    pub annotations: Annotations,
}

#[derive(Debug, Default)]
pub struct ProgramFacts {
    members: FxHashMap<MemberId, MemberSignature>,
    classes: FxHashMap<ClassId, ClassFacts>,
    inline_classes: FxHashMap<InlineClassId, InlineClassFacts>,
    libraries: FxHashMap<LibraryId, LibraryFacts>,
}

impl ProgramFacts {
    pub fn collect(program: &Program) -> Self {
        let mut facts = Self::default();
        for library in &program.libraries {
            facts.libraries.insert(
                library.id,
                LibraryFacts {
                    import_uri: library.import_uri.clone(),
                    annotations: library.annotations.clone(),
                },
            );
            for class in &library.classes {
                facts.classes.insert(
                    class.id,
                    ClassFacts {
                        name: class.name.clone(),
                        library: library.id,
                        annotations: class.annotations.clone(),
                        type_parameters: class.type_parameters.iter().map(|tp| tp.id).collect(),
                    },
                );
            }
            for inline_class in &library.inline_classes {
                facts.inline_classes.insert(
                    inline_class.id,
                    InlineClassFacts {
                        name: inline_class.name.clone(),
                        library: library.id,
                        annotations: inline_class.annotations.clone(),
                    },
                );
            }
            for member in library.all_members() {
                let function = &member.function;
                facts.members.insert(
                    member.id,
                    MemberSignature {
                        kind: member.kind,
                        is_static: member.is_static,
                        type_parameters: function.type_parameters.iter().map(|tp| tp.id).collect(),
                        positional: function
                            .positional_parameters
                            .iter()
                            .map(|parameter| parameter.ty.clone())
                            .collect(),
                        return_type: function.return_type.clone(),
                        enclosing_class: member.enclosing_class,
                    },
                );
            }
        }

        tracing::debug!(
            libraries = facts.libraries.len(),
            classes = facts.classes.len(),
            members = facts.members.len(),
            "[interop] collected program facts"
        );
        facts
    }

    pub fn member(&self, id: MemberId) -> Option<&MemberSignature> {
        self.members.get(&id)
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassFacts> {
        self.classes.get(&id)
    }

    pub fn inline_class(&self, id: InlineClassId) -> Option<&InlineClassFacts> {
        self.inline_classes.get(&id)
    }

    pub fn library(&self, id: LibraryId) -> Option<&LibraryFacts> {
        self.libraries.get(&id)
    }

    /// Type of `this` inside an instance member of `class`.
    pub fn this_type(&self, class: ClassId) -> Type {
        let arguments = self
            .class(class)
            .map(|facts| {
                facts
                    .type_parameters
                    .iter()
                    .map(|tp| Type::parameter(*tp))
                    .collect()
            })
            .unwrap_or_default();
        Type::generic_interface(class, arguments)
    }
}
