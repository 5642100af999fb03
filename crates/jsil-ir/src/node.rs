//! Declaration nodes: program, libraries, containers and members.

use crate::annotations::{Annotated, Annotations};
use crate::expr::{Expression, Statement};
use crate::ids::{
    ClassId, ExtensionId, InlineClassId, LibraryId, MemberId, TypeParameterId, VariableId,
};
use crate::types::Type;

// =============================================================================
// Program & Library
// =============================================================================

/// A whole program: an ordered forest of libraries.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub libraries: Vec<Library>,
}

impl Program {
    pub fn library(&self, id: LibraryId) -> Option<&Library> {
        self.libraries.iter().find(|library| library.id == id)
    }

    pub fn library_mut(&mut self, id: LibraryId) -> Option<&mut Library> {
        self.libraries.iter_mut().find(|library| library.id == id)
    }

    pub fn find_library(&self, import_uri: &str) -> Option<&Library> {
        self.libraries
            .iter()
            .find(|library| library.import_uri == import_uri)
    }

    /// Every member of the program, top-level members before class members
    /// within each library.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.libraries.iter().flat_map(Library::all_members)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members().find(|member| member.id == id)
    }
}

/// One unit of compilation.
#[derive(Debug, Clone)]
pub struct Library {
    pub id: LibraryId,
    pub import_uri: String,
    pub annotations: Annotations,
    pub classes: Vec<Class>,
    pub extensions: Vec<Extension>,
    pub inline_classes: Vec<InlineClass>,
    /// Top-level procedures, including the procedures that implement
    /// extension and inline-container members.
    pub members: Vec<Member>,
}

impl Library {
    /// Top-level members followed by the members of every class.
    pub fn all_members(&self) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .chain(self.classes.iter().flat_map(|class| class.members.iter()))
    }

    pub fn class(&self, id: ClassId) -> Option<&Class> {
        self.classes.iter().find(|class| class.id == id)
    }

    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|class| class.name == name)
    }

    pub fn find_member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }
}

impl Annotated for Library {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

// =============================================================================
// Containers
// =============================================================================

/// An ordinary class.
#[derive(Debug, Clone)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub annotations: Annotations,
    pub type_parameters: Vec<TypeParameter>,
    pub members: Vec<Member>,
}

impl Class {
    pub fn find_member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }
}

impl Annotated for Class {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Adds members to an existing type without subclassing it.
#[derive(Debug, Clone)]
pub struct Extension {
    pub id: ExtensionId,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub on_type: Type,
    pub members: Vec<ExtensionMemberDescriptor>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionMemberKind {
    Getter,
    Setter,
    Method,
    Operator,
    TearOff,
}

/// Links an extension member name to the top-level procedure implementing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMemberDescriptor {
    pub name: String,
    pub kind: ExtensionMemberKind,
    pub is_static: bool,
    pub member: MemberId,
}

/// A zero-cost wrapper around a representation type.
#[derive(Debug, Clone)]
pub struct InlineClass {
    pub id: InlineClassId,
    pub name: String,
    pub annotations: Annotations,
    pub type_parameters: Vec<TypeParameter>,
    pub representation_type: Type,
    pub members: Vec<InlineClassMemberDescriptor>,
}

impl Annotated for InlineClass {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InlineClassMemberKind {
    Constructor,
    Factory,
    Getter,
    Setter,
    Method,
    Operator,
    TearOff,
}

/// Links an inline-container member name to the top-level procedure
/// implementing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineClassMemberDescriptor {
    pub name: String,
    pub kind: InlineClassMemberKind,
    pub is_static: bool,
    pub member: MemberId,
}

// =============================================================================
// Members
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Getter,
    Setter,
    Method,
    Operator,
    Constructor,
    Factory,
}

/// A procedure or constructor.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
    /// Body is supplied outside the IR.
    pub is_external: bool,
    /// Implements a member of an extension container.
    pub is_extension_member: bool,
    /// Implements a member of an inline container.
    pub is_inline_class_member: bool,
    pub enclosing_library: LibraryId,
    pub enclosing_class: Option<ClassId>,
    pub annotations: Annotations,
    pub function: FunctionNode,
}

impl Member {
    pub fn is_factory(&self) -> bool {
        self.kind == MemberKind::Factory
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MemberKind::Constructor
    }
}

impl Annotated for Member {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Signature and body of a member or function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub type_parameters: Vec<TypeParameter>,
    pub positional_parameters: Vec<VariableDeclaration>,
    pub return_type: Type,
    pub body: Option<Statement>,
}

impl FunctionNode {
    /// The function type of this signature.
    pub fn function_type(&self) -> Type {
        let mut ty = Type::function(
            self.positional_parameters
                .iter()
                .map(|parameter| parameter.ty.clone())
                .collect(),
            self.return_type.clone(),
        );
        if let Type::Function(function) = &mut ty {
            function.type_parameters = self.type_parameters.iter().map(|tp| tp.id).collect();
        }
        ty
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub id: VariableId,
    pub name: String,
    pub ty: Type,
    pub initializer: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub id: TypeParameterId,
    pub name: String,
    pub bound: Type,
}
