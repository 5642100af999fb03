//! The SDK libraries the interop pass depends on.
//!
//! [`install_sdk`] declares the core library (with the classes the type
//! system treats specially) and the interop libraries that host the
//! primitive operations. Names here are the lookup keys used when the pass
//! resolves its catalog, so they must stay in sync with the real SDK.

use crate::annotations::Annotations;
use crate::builder::{MemberSpec, ProgramBuilder};
use crate::ids::{ClassId, LibraryId, MemberId};
use crate::types::Type;

pub const CORE_LIBRARY: &str = "sdk:core";
pub const JS_UTIL_LIBRARY: &str = "sdk:js_util";
pub const JS_INTEROP_LIBRARY: &str = "sdk:js_interop";
pub const FOREIGN_HELPER_LIBRARY: &str = "sdk:foreign_helper";

/// Number of arity-indexed unchecked variants in each family (arities 0 to 4).
pub const UNCHECKED_VARIANTS: usize = 5;

/// Member and class names declared by the SDK.
pub mod names {
    pub const OBJECT: &str = "Object";
    pub const FUNCTION: &str = "Function";
    pub const BOOL: &str = "bool";
    pub const INT: &str = "int";
    pub const DOUBLE: &str = "double";
    pub const STRING: &str = "String";
    pub const LIST: &str = "List";
    pub const LIST_EMPTY: &str = "empty";

    pub const GLOBAL_THIS: &str = "globalThis";
    pub const GET_PROPERTY: &str = "getProperty";
    pub const GET_PROPERTY_TRUST_TYPE: &str = "getPropertyTrustType";
    pub const SET_PROPERTY: &str = "setProperty";
    pub const SET_PROPERTY_UNCHECKED: &str = "setPropertyUnchecked";
    pub const CALL_METHOD: &str = "callMethod";
    pub const CALL_METHOD_TRUST_TYPE: &str = "callMethodTrustType";
    pub const CALL_CONSTRUCTOR: &str = "callConstructor";
    pub const CALL_METHOD_UNCHECKED: &str = "callMethodUnchecked";
    pub const CALL_METHOD_UNCHECKED_TRUST_TYPE: &str = "callMethodUncheckedTrustType";
    pub const CALL_CONSTRUCTOR_UNCHECKED: &str = "callConstructorUnchecked";
    pub const JSIFY: &str = "jsify";
    pub const NEW_OBJECT: &str = "newObject";
    pub const ALLOW_INTEROP: &str = "allowInterop";
    pub const FOREIGN_JS: &str = "JS";
}

/// Name of the unchecked variant of `family` taking `arity` arguments.
pub fn unchecked_variant_name(family: &str, arity: usize) -> String {
    format!("{family}{arity}")
}

/// Ids of the SDK declarations, for building types and calls against them.
#[derive(Debug, Clone)]
pub struct Sdk {
    pub core: LibraryId,
    pub js_util: LibraryId,
    pub js_interop: LibraryId,
    pub foreign_helper: LibraryId,
    pub object: ClassId,
    pub function: ClassId,
    pub boolean: ClassId,
    pub int: ClassId,
    pub double: ClassId,
    pub string: ClassId,
    pub list: ClassId,
    pub list_empty: MemberId,
    pub global_this: MemberId,
    pub allow_interop: MemberId,
    pub foreign_js: MemberId,
}

impl Sdk {
    pub fn object_type(&self) -> Type {
        Type::interface(self.object)
    }

    pub fn nullable_object_type(&self) -> Type {
        Type::nullable_interface(self.object)
    }

    pub fn function_type(&self) -> Type {
        Type::interface(self.function)
    }

    pub fn string_type(&self) -> Type {
        Type::interface(self.string)
    }

    pub fn int_type(&self) -> Type {
        Type::interface(self.int)
    }

    pub fn list_of(&self, element: Type) -> Type {
        Type::generic_interface(self.list, vec![element])
    }
}

/// Declare the SDK libraries in `builder`.
pub fn install_sdk(builder: &mut ProgramBuilder) -> Sdk {
    let core = builder.add_library(CORE_LIBRARY, Annotations::default());
    let object = builder.add_class(core, names::OBJECT, Annotations::default());
    let function = builder.add_class(core, names::FUNCTION, Annotations::default());
    let boolean = builder.add_class(core, names::BOOL, Annotations::default());
    let int = builder.add_class(core, names::INT, Annotations::default());
    let double = builder.add_class(core, names::DOUBLE, Annotations::default());
    let string = builder.add_class(core, names::STRING, Annotations::default());
    let list_element = builder.type_parameter("E");
    let list = builder.add_generic_class(
        core,
        names::LIST,
        Annotations::default(),
        vec![list_element],
    );

    let empty_element = builder.type_parameter("E");
    let empty_element_type = Type::parameter(empty_element.id);
    let list_empty = builder.add_class_member(
        list,
        MemberSpec::factory(names::LIST_EMPTY)
            .external()
            .type_parameters(vec![empty_element])
            .returns(Type::generic_interface(list, vec![empty_element_type])),
    );

    let object_type = Type::interface(object);
    let nullable_object = Type::nullable_interface(object);
    let string_type = Type::interface(string);
    let argument_list = Type::generic_interface(list, vec![nullable_object.clone()]);

    let js_util = builder.add_library(JS_UTIL_LIBRARY, Annotations::default());
    let global_this = builder.add_top_level(
        js_util,
        MemberSpec::getter(names::GLOBAL_THIS)
            .external()
            .static_member()
            .returns(object_type.clone()),
    );

    let receiver_and_name = [
        ("o", object_type.clone()),
        ("name", string_type.clone()),
    ];
    for name in [names::GET_PROPERTY, names::GET_PROPERTY_TRUST_TYPE] {
        declare_generic(builder, js_util, name, &receiver_and_name, None);
    }
    for name in [names::SET_PROPERTY, names::SET_PROPERTY_UNCHECKED] {
        declare_generic(builder, js_util, name, &receiver_and_name, Some("value"));
    }
    for name in [names::CALL_METHOD, names::CALL_METHOD_TRUST_TYPE] {
        let parameters = [
            ("o", object_type.clone()),
            ("method", string_type.clone()),
            ("args", argument_list.clone()),
        ];
        declare_generic(builder, js_util, name, &parameters, None);
    }
    declare_generic(
        builder,
        js_util,
        names::CALL_CONSTRUCTOR,
        &[
            ("constr", object_type.clone()),
            ("arguments", argument_list.as_nullable()),
        ],
        None,
    );

    for arity in 0..UNCHECKED_VARIANTS {
        let arguments: Vec<(String, Type)> = (1..=arity)
            .map(|i| (format!("arg{i}"), nullable_object.clone()))
            .collect();
        for family in [
            names::CALL_METHOD_UNCHECKED,
            names::CALL_METHOD_UNCHECKED_TRUST_TYPE,
        ] {
            let mut parameters = vec![
                ("o".to_string(), object_type.clone()),
                ("method".to_string(), string_type.clone()),
            ];
            parameters.extend(arguments.iter().cloned());
            declare_generic_owned(
                builder,
                js_util,
                &unchecked_variant_name(family, arity),
                parameters,
            );
        }
        let mut parameters = vec![("constr".to_string(), object_type.clone())];
        parameters.extend(arguments.iter().cloned());
        declare_generic_owned(
            builder,
            js_util,
            &unchecked_variant_name(names::CALL_CONSTRUCTOR_UNCHECKED, arity),
            parameters,
        );
    }

    let jsify_parameter = builder.variable("object", nullable_object.clone());
    builder.add_top_level(
        js_util,
        MemberSpec::method(names::JSIFY)
            .external()
            .static_member()
            .parameters(vec![jsify_parameter])
            .returns(Type::Dynamic),
    );
    declare_generic(builder, js_util, names::NEW_OBJECT, &[], None);

    let js_interop = builder.add_library(JS_INTEROP_LIBRARY, Annotations::default());
    let mut callback_parameter = builder.type_parameter("F");
    callback_parameter.bound = Type::interface(function);
    let callback_type = Type::parameter(callback_parameter.id);
    let callback = builder.variable("f", callback_type.clone());
    let allow_interop = builder.add_top_level(
        js_interop,
        MemberSpec::method(names::ALLOW_INTEROP)
            .external()
            .static_member()
            .type_parameters(vec![callback_parameter])
            .parameters(vec![callback])
            .returns(callback_type),
    );

    let foreign_helper = builder.add_library(FOREIGN_HELPER_LIBRARY, Annotations::default());
    let foreign_js = declare_generic(
        builder,
        foreign_helper,
        names::FOREIGN_JS,
        &[("codeTemplate", string_type)],
        None,
    );

    Sdk {
        core,
        js_util,
        js_interop,
        foreign_helper,
        object,
        function,
        boolean,
        int,
        double,
        string,
        list,
        list_empty,
        global_this,
        allow_interop,
        foreign_js,
    }
}

/// Declare `external T name<T>(parameters..., [value: T])`.
fn declare_generic(
    builder: &mut ProgramBuilder,
    library: LibraryId,
    name: &str,
    parameters: &[(&str, Type)],
    value_parameter: Option<&str>,
) -> MemberId {
    let type_parameter = builder.type_parameter("T");
    let result_type = Type::parameter(type_parameter.id);
    let mut declarations: Vec<_> = parameters
        .iter()
        .map(|(name, ty)| builder.variable(*name, ty.clone()))
        .collect();
    if let Some(value) = value_parameter {
        declarations.push(builder.variable(value, result_type.clone()));
    }
    builder.add_top_level(
        library,
        MemberSpec::method(name)
            .external()
            .static_member()
            .type_parameters(vec![type_parameter])
            .parameters(declarations)
            .returns(result_type),
    )
}

fn declare_generic_owned(
    builder: &mut ProgramBuilder,
    library: LibraryId,
    name: &str,
    parameters: Vec<(String, Type)>,
) -> MemberId {
    let borrowed: Vec<(&str, Type)> = parameters
        .iter()
        .map(|(name, ty)| (name.as_str(), ty.clone()))
        .collect();
    declare_generic(builder, library, name, &borrowed, None)
}
