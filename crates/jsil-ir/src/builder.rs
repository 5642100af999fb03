//! Programmatic construction of IR programs.
//!
//! The front end normally produces the IR; hosts, benchmarks and tests use
//! [`ProgramBuilder`] to assemble programs directly. The builder owns id
//! allocation so every declaration gets a program-unique identity.

use crate::annotations::Annotations;
use crate::expr::Statement;
use crate::ids::{
    ClassId, ExtensionId, InlineClassId, LibraryId, MemberId, TypeParameterId, VariableId,
};
use crate::node::{
    Class, Extension, ExtensionMemberDescriptor, ExtensionMemberKind, FunctionNode, InlineClass,
    InlineClassMemberDescriptor, InlineClassMemberKind, Library, Member, MemberKind, Program,
    TypeParameter, VariableDeclaration,
};
use crate::types::Type;

/// Declaration of a member to be added by [`ProgramBuilder`].
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
    pub is_external: bool,
    pub annotations: Annotations,
    pub type_parameters: Vec<TypeParameter>,
    pub positional_parameters: Vec<VariableDeclaration>,
    pub return_type: Option<Type>,
    pub body: Option<Statement>,
}

impl MemberSpec {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_static: false,
            is_external: false,
            annotations: Annotations::default(),
            type_parameters: Vec::new(),
            positional_parameters: Vec::new(),
            return_type: None,
            body: None,
        }
    }

    pub fn getter(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Getter)
    }

    pub fn setter(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Setter)
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Method)
    }

    pub fn constructor(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Constructor)
    }

    pub fn factory(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Factory)
    }

    pub fn external(mut self) -> Self {
        self.is_external = true;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn annotated(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn type_parameters(mut self, type_parameters: Vec<TypeParameter>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn parameters(mut self, parameters: Vec<VariableDeclaration>) -> Self {
        self.positional_parameters = parameters;
        self
    }

    pub fn returns(mut self, return_type: Type) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn body(mut self, body: Statement) -> Self {
        self.body = Some(body);
        self
    }
}

/// Assembles a [`Program`], allocating ids as declarations are added.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    next_library: u32,
    next_class: u32,
    next_extension: u32,
    next_inline_class: u32,
    next_member: u32,
    next_variable: u32,
    next_type_parameter: u32,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_library(
        &mut self,
        import_uri: impl Into<String>,
        annotations: Annotations,
    ) -> LibraryId {
        let id = LibraryId(self.next_library);
        self.next_library += 1;
        self.program.libraries.push(Library {
            id,
            import_uri: import_uri.into(),
            annotations,
            classes: Vec::new(),
            extensions: Vec::new(),
            inline_classes: Vec::new(),
            members: Vec::new(),
        });
        id
    }

    pub fn add_class(
        &mut self,
        library: LibraryId,
        name: impl Into<String>,
        annotations: Annotations,
    ) -> ClassId {
        self.add_generic_class(library, name, annotations, Vec::new())
    }

    pub fn add_generic_class(
        &mut self,
        library: LibraryId,
        name: impl Into<String>,
        annotations: Annotations,
        type_parameters: Vec<TypeParameter>,
    ) -> ClassId {
        let id = ClassId(self.next_class);
        self.next_class += 1;
        self.library_mut(library).classes.push(Class {
            id,
            name: name.into(),
            annotations,
            type_parameters,
            members: Vec::new(),
        });
        id
    }

    pub fn add_extension(
        &mut self,
        library: LibraryId,
        name: impl Into<String>,
        on_type: Type,
    ) -> ExtensionId {
        let id = ExtensionId(self.next_extension);
        self.next_extension += 1;
        self.library_mut(library).extensions.push(Extension {
            id,
            name: name.into(),
            type_parameters: Vec::new(),
            on_type,
            members: Vec::new(),
        });
        id
    }

    pub fn add_inline_class(
        &mut self,
        library: LibraryId,
        name: impl Into<String>,
        annotations: Annotations,
        representation_type: Type,
    ) -> InlineClassId {
        let id = InlineClassId(self.next_inline_class);
        self.next_inline_class += 1;
        self.library_mut(library).inline_classes.push(InlineClass {
            id,
            name: name.into(),
            annotations,
            type_parameters: Vec::new(),
            representation_type,
            members: Vec::new(),
        });
        id
    }

    /// Add a top-level procedure.
    pub fn add_top_level(&mut self, library: LibraryId, spec: MemberSpec) -> MemberId {
        let member = self.make_member(library, None, spec, Type::Dynamic);
        let id = member.id;
        self.library_mut(library).members.push(member);
        id
    }

    /// Add a member to an ordinary class. Constructors and factories default
    /// to returning the class type.
    pub fn add_class_member(&mut self, class: ClassId, spec: MemberSpec) -> MemberId {
        let (library, class_type) = {
            let (library, class_node) = self.find_class(class);
            let arguments = class_node
                .type_parameters
                .iter()
                .map(|tp| Type::parameter(tp.id))
                .collect();
            (library, Type::generic_interface(class, arguments))
        };
        let default_return = match spec.kind {
            MemberKind::Constructor | MemberKind::Factory => class_type,
            _ => Type::Dynamic,
        };
        let member = self.make_member(library, Some(class), spec, default_return);
        let id = member.id;
        self.class_mut(class).members.push(member);
        id
    }

    /// Add an extension member. The implementing procedure is placed at the
    /// top level of the extension's library, as the front end does.
    pub fn add_extension_member(&mut self, extension: ExtensionId, spec: MemberSpec) -> MemberId {
        let kind = match spec.kind {
            MemberKind::Getter => ExtensionMemberKind::Getter,
            MemberKind::Setter => ExtensionMemberKind::Setter,
            MemberKind::Method => ExtensionMemberKind::Method,
            MemberKind::Operator => ExtensionMemberKind::Operator,
            MemberKind::Constructor | MemberKind::Factory => {
                panic!("extensions cannot declare constructors: {}", spec.name)
            }
        };
        let library = self.find_extension_library(extension);
        let name = spec.name.clone();
        let is_static = spec.is_static;
        let mut member = self.make_member(library, None, spec, Type::Dynamic);
        member.is_extension_member = true;
        let id = member.id;
        self.library_mut(library).members.push(member);
        self.extension_mut(extension)
            .members
            .push(ExtensionMemberDescriptor {
                name,
                kind,
                is_static,
                member: id,
            });
        id
    }

    /// Add an inline-container member. Constructors and factories are static
    /// and default to returning the inline type.
    pub fn add_inline_member(&mut self, inline_class: InlineClassId, spec: MemberSpec) -> MemberId {
        let kind = match spec.kind {
            MemberKind::Getter => InlineClassMemberKind::Getter,
            MemberKind::Setter => InlineClassMemberKind::Setter,
            MemberKind::Method => InlineClassMemberKind::Method,
            MemberKind::Operator => InlineClassMemberKind::Operator,
            MemberKind::Constructor => InlineClassMemberKind::Constructor,
            MemberKind::Factory => InlineClassMemberKind::Factory,
        };
        let is_static = spec.is_static
            || matches!(
                kind,
                InlineClassMemberKind::Constructor | InlineClassMemberKind::Factory
            );
        let default_return = match kind {
            InlineClassMemberKind::Constructor | InlineClassMemberKind::Factory => {
                Type::inline(inline_class)
            }
            _ => Type::Dynamic,
        };
        let library = self.find_inline_class_library(inline_class);
        let name = spec.name.clone();
        let mut member = self.make_member(library, None, spec, default_return);
        member.is_inline_class_member = true;
        member.is_static = is_static;
        let id = member.id;
        self.library_mut(library).members.push(member);
        self.inline_class_mut(inline_class)
            .members
            .push(InlineClassMemberDescriptor {
                name,
                kind,
                is_static,
                member: id,
            });
        id
    }

    /// Declare a fresh variable (parameter or local).
    pub fn variable(&mut self, name: impl Into<String>, ty: Type) -> VariableDeclaration {
        let id = VariableId(self.next_variable);
        self.next_variable += 1;
        VariableDeclaration {
            id,
            name: name.into(),
            ty,
            initializer: None,
        }
    }

    /// Declare a fresh type parameter bounded by `dynamic`.
    pub fn type_parameter(&mut self, name: impl Into<String>) -> TypeParameter {
        let id = TypeParameterId(self.next_type_parameter);
        self.next_type_parameter += 1;
        TypeParameter {
            id,
            name: name.into(),
            bound: Type::Dynamic,
        }
    }

    /// The program built so far.
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn finish(self) -> Program {
        self.program
    }

    fn make_member(
        &mut self,
        library: LibraryId,
        enclosing_class: Option<ClassId>,
        spec: MemberSpec,
        default_return: Type,
    ) -> Member {
        let id = MemberId(self.next_member);
        self.next_member += 1;
        Member {
            id,
            name: spec.name,
            kind: spec.kind,
            is_static: spec.is_static,
            is_external: spec.is_external,
            is_extension_member: false,
            is_inline_class_member: false,
            enclosing_library: library,
            enclosing_class,
            annotations: spec.annotations,
            function: FunctionNode {
                type_parameters: spec.type_parameters,
                positional_parameters: spec.positional_parameters,
                return_type: spec.return_type.unwrap_or(default_return),
                body: spec.body,
            },
        }
    }

    fn library_mut(&mut self, id: LibraryId) -> &mut Library {
        match self.program.library_mut(id) {
            Some(library) => library,
            None => panic!("unknown library {id:?}"),
        }
    }

    fn find_class(&self, id: ClassId) -> (LibraryId, &Class) {
        for library in &self.program.libraries {
            if let Some(class) = library.class(id) {
                return (library.id, class);
            }
        }
        panic!("unknown class {id:?}")
    }

    fn class_mut(&mut self, id: ClassId) -> &mut Class {
        self.program
            .libraries
            .iter_mut()
            .flat_map(|library| library.classes.iter_mut())
            .find(|class| class.id == id)
            .unwrap_or_else(|| panic!("unknown class {id:?}"))
    }

    fn find_extension_library(&self, id: ExtensionId) -> LibraryId {
        self.program
            .libraries
            .iter()
            .find(|library| library.extensions.iter().any(|e| e.id == id))
            .map(|library| library.id)
            .unwrap_or_else(|| panic!("unknown extension {id:?}"))
    }

    fn extension_mut(&mut self, id: ExtensionId) -> &mut Extension {
        self.program
            .libraries
            .iter_mut()
            .flat_map(|library| library.extensions.iter_mut())
            .find(|extension| extension.id == id)
            .unwrap_or_else(|| panic!("unknown extension {id:?}"))
    }

    fn find_inline_class_library(&self, id: InlineClassId) -> LibraryId {
        self.program
            .libraries
            .iter()
            .find(|library| library.inline_classes.iter().any(|c| c.id == id))
            .map(|library| library.id)
            .unwrap_or_else(|| panic!("unknown inline class {id:?}"))
    }

    fn inline_class_mut(&mut self, id: InlineClassId) -> &mut InlineClass {
        self.program
            .libraries
            .iter_mut()
            .flat_map(|library| library.inline_classes.iter_mut())
            .find(|inline_class| inline_class.id == id)
            .unwrap_or_else(|| panic!("unknown inline class {id:?}"))
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
