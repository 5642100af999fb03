//! Typed whole-program IR consumed by the jsil interop lowering pass.
//!
//! This crate provides the program model the pass operates on:
//! - Declaration ids (`LibraryId`, `ClassId`, `MemberId`, ...)
//! - Static types (`Type`) and annotation metadata (`Annotations`)
//! - Declaration nodes, expressions and statements
//! - A program builder and the SDK libraries hosting the interop primitives
//! - A read-only walker and a textual printer

// Declaration identities
pub mod ids;
pub use ids::{
    ClassId, ExtensionId, InlineClassId, LibraryId, MemberId, TypeParameterId, VariableId,
};

// Static types
pub mod types;
pub use types::{
    FunctionType, InlineType, InterfaceType, Type, TypeParameterType, TypeSubstitution,
};

// Interop annotation metadata and queries
pub mod annotations;
pub use annotations::{Annotated, Annotations};

// Declarations
pub mod node;
pub use node::{
    Class, Extension, ExtensionMemberDescriptor, ExtensionMemberKind, FunctionNode, InlineClass,
    InlineClassMemberDescriptor, InlineClassMemberKind, Library, Member, MemberKind, Program,
    TypeParameter, VariableDeclaration,
};

// Expressions, statements and constants
pub mod expr;
pub use expr::{Arguments, Constant, Expression, Statement, StaticInvocation};

// Read-only traversal
pub mod visit;
pub use visit::{IrVisitor, for_each_variable};

// Programmatic construction
pub mod builder;
pub use builder::{MemberSpec, ProgramBuilder};

// SDK libraries and primitive names
pub mod sdk;
pub use sdk::{Sdk, install_sdk};

// Textual rendering for debugging and tests
pub mod printer;
pub use printer::IrPrinter;
