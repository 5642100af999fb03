//! Stable identities for IR declarations.
//!
//! Declarations reference each other by id rather than by pointer so that a
//! library can be mutated in place while the rest of the program is read.
//! Ids are allocated by [`crate::ProgramBuilder`] and are unique per program.

/// Identity of a library (one unit of compilation).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryId(pub u32);

/// Identity of an ordinary class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

/// Identity of an extension container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionId(pub u32);

/// Identity of an inline container (zero-cost wrapper type).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InlineClassId(pub u32);

/// Identity of a member: getter, setter, method, operator, constructor or factory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

/// Identity of a variable declaration (parameter or local).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

/// Identity of a declared type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParameterId(pub u32);

