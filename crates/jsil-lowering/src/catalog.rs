//! The primitive-operation catalog and core type identities.
//!
//! Both are resolved by name once, when the pass is constructed. After that
//! the pass dispatches on [`Primitive`] and compares class ids; it never
//! looks anything up by name again.

use jsil_ir::sdk::{self, names};
use jsil_ir::{ClassId, Library, MemberId, Program};
use rustc_hash::FxHashMap;

/// A primitive interop operation or helper the pass recognizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    GlobalThis,
    GetProperty,
    GetPropertyTrustType,
    SetProperty,
    SetPropertyUnchecked,
    CallMethod,
    CallMethodTrustType,
    CallConstructor,
    Jsify,
    NewObject,
    AllowInterop,
    ForeignJs,
    ListEmpty,
}

impl Primitive {
    pub const ALL: [Self; 13] = [
        Self::GlobalThis,
        Self::GetProperty,
        Self::GetPropertyTrustType,
        Self::SetProperty,
        Self::SetPropertyUnchecked,
        Self::CallMethod,
        Self::CallMethodTrustType,
        Self::CallConstructor,
        Self::Jsify,
        Self::NewObject,
        Self::AllowInterop,
        Self::ForeignJs,
        Self::ListEmpty,
    ];

    /// Where the primitive is declared: library, optional class, name.
    const fn location(self) -> (&'static str, Option<&'static str>, &'static str) {
        match self {
            Self::GlobalThis => (sdk::JS_UTIL_LIBRARY, None, names::GLOBAL_THIS),
            Self::GetProperty => (sdk::JS_UTIL_LIBRARY, None, names::GET_PROPERTY),
            Self::GetPropertyTrustType => {
                (sdk::JS_UTIL_LIBRARY, None, names::GET_PROPERTY_TRUST_TYPE)
            }
            Self::SetProperty => (sdk::JS_UTIL_LIBRARY, None, names::SET_PROPERTY),
            Self::SetPropertyUnchecked => {
                (sdk::JS_UTIL_LIBRARY, None, names::SET_PROPERTY_UNCHECKED)
            }
            Self::CallMethod => (sdk::JS_UTIL_LIBRARY, None, names::CALL_METHOD),
            Self::CallMethodTrustType => {
                (sdk::JS_UTIL_LIBRARY, None, names::CALL_METHOD_TRUST_TYPE)
            }
            Self::CallConstructor => (sdk::JS_UTIL_LIBRARY, None, names::CALL_CONSTRUCTOR),
            Self::Jsify => (sdk::JS_UTIL_LIBRARY, None, names::JSIFY),
            Self::NewObject => (sdk::JS_UTIL_LIBRARY, None, names::NEW_OBJECT),
            Self::AllowInterop => (sdk::JS_INTEROP_LIBRARY, None, names::ALLOW_INTEROP),
            Self::ForeignJs => (sdk::FOREIGN_HELPER_LIBRARY, None, names::FOREIGN_JS),
            Self::ListEmpty => (sdk::CORE_LIBRARY, Some(names::LIST), names::LIST_EMPTY),
        }
    }

    /// The checked call this primitive performs, if the optimizer may
    /// specialize it.
    pub const fn checked_call(self) -> Option<CheckedCall> {
        match self {
            Self::SetProperty => Some(CheckedCall::SetProperty),
            Self::CallMethod => Some(CheckedCall::CallMethod),
            Self::CallMethodTrustType => Some(CheckedCall::CallMethodTrustType),
            Self::CallConstructor => Some(CheckedCall::CallConstructor),
            Self::GlobalThis
            | Self::GetProperty
            | Self::GetPropertyTrustType
            | Self::SetPropertyUnchecked
            | Self::Jsify
            | Self::NewObject
            | Self::AllowInterop
            | Self::ForeignJs
            | Self::ListEmpty => None,
        }
    }

    /// Whether a call to this primitive always yields a value that can cross
    /// the interop boundary without wrapping.
    pub const fn produces_interop_safe_value(self) -> bool {
        match self {
            Self::AllowInterop
            | Self::ForeignJs
            | Self::CallConstructor
            | Self::CallMethod
            | Self::GetProperty
            | Self::Jsify
            | Self::NewObject
            | Self::SetProperty => true,
            Self::GlobalThis
            | Self::GetPropertyTrustType
            | Self::SetPropertyUnchecked
            | Self::CallMethodTrustType
            | Self::ListEmpty => false,
        }
    }
}

/// The four checked primitives the optimizer rewrites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CheckedCall {
    SetProperty,
    CallMethod,
    CallMethodTrustType,
    CallConstructor,
}

impl CheckedCall {
    /// Positional arguments the checked primitive takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::SetProperty | Self::CallMethod | Self::CallMethodTrustType => 3,
            Self::CallConstructor => 2,
        }
    }

    /// Leading arguments passed through unchanged to the unchecked variant.
    pub const fn fixed_arguments(self) -> usize {
        match self {
            Self::SetProperty => 3,
            Self::CallMethod | Self::CallMethodTrustType => 2,
            Self::CallConstructor => 1,
        }
    }

    const fn family_name(self) -> Option<&'static str> {
        match self {
            Self::SetProperty => None,
            Self::CallMethod => Some(names::CALL_METHOD_UNCHECKED),
            Self::CallMethodTrustType => Some(names::CALL_METHOD_UNCHECKED_TRUST_TYPE),
            Self::CallConstructor => Some(names::CALL_CONSTRUCTOR_UNCHECKED),
        }
    }
}

/// Arity-indexed unchecked variants of one checked call.
pub type UncheckedFamily = [MemberId; sdk::UNCHECKED_VARIANTS];

/// Resolved member ids of every primitive.
#[derive(Debug, Clone)]
pub struct InteropCatalog {
    targets: FxHashMap<Primitive, MemberId>,
    by_member: FxHashMap<MemberId, Primitive>,
    call_method_unchecked: UncheckedFamily,
    call_method_unchecked_trust_type: UncheckedFamily,
    call_constructor_unchecked: UncheckedFamily,
}

impl InteropCatalog {
    pub fn resolve(program: &Program) -> Result<Self, CatalogError> {
        let mut targets = FxHashMap::default();
        let mut by_member = FxHashMap::default();
        for primitive in Primitive::ALL {
            let (library, class, name) = primitive.location();
            let member = find_member(program, library, class, name)?;
            targets.insert(primitive, member);
            by_member.insert(member, primitive);
        }

        Ok(Self {
            targets,
            by_member,
            call_method_unchecked: resolve_family(program, CheckedCall::CallMethod)?,
            call_method_unchecked_trust_type: resolve_family(
                program,
                CheckedCall::CallMethodTrustType,
            )?,
            call_constructor_unchecked: resolve_family(program, CheckedCall::CallConstructor)?,
        })
    }

    pub fn target(&self, primitive: Primitive) -> MemberId {
        match self.targets.get(&primitive) {
            Some(member) => *member,
            None => panic!("primitive {primitive:?} missing from a resolved catalog"),
        }
    }

    /// The primitive a call target refers to, if any.
    pub fn classify(&self, member: MemberId) -> Option<Primitive> {
        self.by_member.get(&member).copied()
    }

    /// The unchecked variants for a call-method or call-constructor call.
    ///
    /// Set-property has a single unchecked form and no family.
    pub fn unchecked_family(&self, call: CheckedCall) -> Option<&UncheckedFamily> {
        match call {
            CheckedCall::SetProperty => None,
            CheckedCall::CallMethod => Some(&self.call_method_unchecked),
            CheckedCall::CallMethodTrustType => Some(&self.call_method_unchecked_trust_type),
            CheckedCall::CallConstructor => Some(&self.call_constructor_unchecked),
        }
    }

    /// Whether `member` is one of the unchecked variants.
    pub fn is_unchecked_target(&self, member: MemberId) -> bool {
        member == self.target(Primitive::SetPropertyUnchecked)
            || self.call_method_unchecked.contains(&member)
            || self.call_method_unchecked_trust_type.contains(&member)
            || self.call_constructor_unchecked.contains(&member)
    }
}

fn resolve_family(program: &Program, call: CheckedCall) -> Result<UncheckedFamily, CatalogError> {
    let Some(family) = call.family_name() else {
        panic!("{call:?} has no unchecked family");
    };
    let mut members = [MemberId(0); sdk::UNCHECKED_VARIANTS];
    for (arity, slot) in members.iter_mut().enumerate() {
        let name = sdk::unchecked_variant_name(family, arity);
        *slot = find_member(program, sdk::JS_UTIL_LIBRARY, None, &name)?;
    }
    Ok(members)
}

fn find_member(
    program: &Program,
    library_uri: &str,
    class: Option<&str>,
    name: &str,
) -> Result<MemberId, CatalogError> {
    let missing = || CatalogError::MissingMember {
        library: library_uri.to_string(),
        name: match class {
            Some(class) => format!("{class}.{name}"),
            None => name.to_string(),
        },
    };
    let library = program.find_library(library_uri).ok_or_else(missing)?;
    let member = match class {
        Some(class) => library
            .find_class(class)
            .and_then(|class| class.find_member(name)),
        None => library.find_member(name),
    };
    member.map(|member| member.id).ok_or_else(missing)
}

// =============================================================================
// Core types
// =============================================================================

/// Class identities of the core library the pass reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreTypes {
    pub object: ClassId,
    pub function: ClassId,
    pub boolean: ClassId,
    pub int: ClassId,
    pub double: ClassId,
    pub string: ClassId,
    pub list: ClassId,
}

impl CoreTypes {
    pub fn resolve(program: &Program) -> Result<Self, CatalogError> {
        let core = program
            .find_library(sdk::CORE_LIBRARY)
            .ok_or_else(|| CatalogError::MissingClass {
                library: sdk::CORE_LIBRARY.to_string(),
                name: names::OBJECT.to_string(),
            })?;
        Ok(Self {
            object: find_class(core, names::OBJECT)?,
            function: find_class(core, names::FUNCTION)?,
            boolean: find_class(core, names::BOOL)?,
            int: find_class(core, names::INT)?,
            double: find_class(core, names::DOUBLE)?,
            string: find_class(core, names::STRING)?,
            list: find_class(core, names::LIST)?,
        })
    }
}

fn find_class(library: &Library, name: &str) -> Result<ClassId, CatalogError> {
    library
        .find_class(name)
        .map(|class| class.id)
        .ok_or_else(|| CatalogError::MissingClass {
            library: library.import_uri.clone(),
            name: name.to_string(),
        })
}

/// A declaration the pass depends on is missing from the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    MissingMember { library: String, name: String },
    MissingClass { library: String, name: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMember { library, name } => {
                write!(f, "interop primitive {name} not found in {library}")
            }
            Self::MissingClass { library, name } => {
                write!(f, "core class {name} not found in {library}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
