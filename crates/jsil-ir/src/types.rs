//! Static types of the IR.
//!
//! Types are plain values compared structurally. Class identities are carried
//! by [`ClassId`], so "is this the universal `Object` type" is an id comparison
//! against the core catalog rather than a name lookup.

use crate::ids::{ClassId, InlineClassId, TypeParameterId};
use rustc_hash::FxHashMap;

/// A static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// The dynamic type: any value, no static guarantees.
    Dynamic,
    /// The void type.
    Void,
    /// The bottom type.
    Never,
    /// The type whose only value is `null`.
    Null,
    /// A class type with type arguments.
    Interface(InterfaceType),
    /// An inline container type. Erases to its representation at runtime.
    Inline(InlineType),
    /// A structural function type.
    Function(Box<FunctionType>),
    /// A reference to a type parameter in scope.
    TypeParameter(TypeParameterType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceType {
    pub class: ClassId,
    pub type_arguments: Vec<Type>,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InlineType {
    pub inline_class: InlineClassId,
    pub type_arguments: Vec<Type>,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub type_parameters: Vec<TypeParameterId>,
    pub positional: Vec<Type>,
    pub return_type: Type,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameterType {
    pub parameter: TypeParameterId,
    pub nullable: bool,
}

/// Mapping from type parameters to the types that replace them.
pub type TypeSubstitution = FxHashMap<TypeParameterId, Type>;

impl Type {
    /// Non-nullable class type without type arguments.
    pub fn interface(class: ClassId) -> Self {
        Self::Interface(InterfaceType {
            class,
            type_arguments: Vec::new(),
            nullable: false,
        })
    }

    /// Nullable class type without type arguments.
    pub fn nullable_interface(class: ClassId) -> Self {
        Self::Interface(InterfaceType {
            class,
            type_arguments: Vec::new(),
            nullable: true,
        })
    }

    /// Non-nullable class type with type arguments.
    pub fn generic_interface(class: ClassId, type_arguments: Vec<Self>) -> Self {
        Self::Interface(InterfaceType {
            class,
            type_arguments,
            nullable: false,
        })
    }

    /// Non-nullable inline container type.
    pub fn inline(inline_class: InlineClassId) -> Self {
        Self::Inline(InlineType {
            inline_class,
            type_arguments: Vec::new(),
            nullable: false,
        })
    }

    /// Reference to a type parameter.
    pub fn parameter(parameter: TypeParameterId) -> Self {
        Self::TypeParameter(TypeParameterType {
            parameter,
            nullable: false,
        })
    }

    /// Function type with the given positional parameters and return type.
    pub fn function(positional: Vec<Self>, return_type: Self) -> Self {
        Self::Function(Box::new(FunctionType {
            type_parameters: Vec::new(),
            positional,
            return_type,
            nullable: false,
        }))
    }

    /// The class of an interface type.
    pub fn interface_class(&self) -> Option<ClassId> {
        match self {
            Self::Interface(interface) => Some(interface.class),
            _ => None,
        }
    }

    /// Whether the type admits `null`.
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Dynamic | Self::Void | Self::Null => true,
            Self::Never => false,
            Self::Interface(t) => t.nullable,
            Self::Inline(t) => t.nullable,
            Self::Function(t) => t.nullable,
            Self::TypeParameter(t) => t.nullable,
        }
    }

    /// Replace type parameters according to `substitution`.
    ///
    /// Parameters not in the map are kept. Nullability of a substituted
    /// parameter reference is joined with the replacement's.
    pub fn substitute(&self, substitution: &TypeSubstitution) -> Self {
        if substitution.is_empty() {
            return self.clone();
        }
        match self {
            Self::Dynamic | Self::Void | Self::Never | Self::Null => self.clone(),
            Self::Interface(t) => Self::Interface(InterfaceType {
                class: t.class,
                type_arguments: substitute_all(&t.type_arguments, substitution),
                nullable: t.nullable,
            }),
            Self::Inline(t) => Self::Inline(InlineType {
                inline_class: t.inline_class,
                type_arguments: substitute_all(&t.type_arguments, substitution),
                nullable: t.nullable,
            }),
            Self::Function(t) => Self::Function(Box::new(FunctionType {
                type_parameters: t.type_parameters.clone(),
                positional: substitute_all(&t.positional, substitution),
                return_type: t.return_type.substitute(substitution),
                nullable: t.nullable,
            })),
            Self::TypeParameter(t) => match substitution.get(&t.parameter) {
                Some(replacement) if t.nullable => replacement.as_nullable(),
                Some(replacement) => replacement.clone(),
                None => self.clone(),
            },
        }
    }

    /// Nullable copy of this type.
    pub fn as_nullable(&self) -> Self {
        let mut result = self.clone();
        match &mut result {
            Self::Interface(t) => t.nullable = true,
            Self::Inline(t) => t.nullable = true,
            Self::Function(t) => t.nullable = true,
            Self::TypeParameter(t) => t.nullable = true,
            Self::Dynamic | Self::Void | Self::Never | Self::Null => {}
        }
        result
    }

    /// Visit every type parameter referenced by this type.
    pub fn for_each_type_parameter(&self, f: &mut impl FnMut(TypeParameterId)) {
        match self {
            Self::Dynamic | Self::Void | Self::Never | Self::Null => {}
            Self::Interface(InterfaceType { type_arguments, .. })
            | Self::Inline(InlineType { type_arguments, .. }) => {
                for argument in type_arguments {
                    argument.for_each_type_parameter(f);
                }
            }
            Self::Function(t) => {
                for positional in &t.positional {
                    positional.for_each_type_parameter(f);
                }
                t.return_type.for_each_type_parameter(f);
            }
            Self::TypeParameter(t) => f(t.parameter),
        }
    }
}

fn substitute_all(types: &[Type], substitution: &TypeSubstitution) -> Vec<Type> {
    types.iter().map(|t| t.substitute(substitution)).collect()
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
