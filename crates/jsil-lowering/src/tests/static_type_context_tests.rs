use super::*;
use jsil_ir::{Annotations, MemberSpec, Program, ProgramBuilder, Sdk, Statement, install_sdk};

struct Fixture {
    program: Program,
    sdk: Sdk,
    member: MemberId,
    parameter: VariableId,
    local: VariableId,
    type_parameter: TypeParameterId,
}

fn fixture() -> Fixture {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:app", Annotations::default());
    let t = builder.type_parameter("T");
    let type_parameter = t.id;
    let class = builder.add_generic_class(library, "Box", Annotations::default(), vec![t]);

    let parameter = builder.variable("value", sdk.string_type());
    let parameter_id = parameter.id;
    let local = builder.variable("count", sdk.int_type());
    let local_id = local.id;
    let member = builder.add_class_member(
        class,
        MemberSpec::method("run")
            .parameters(vec![parameter])
            .body(Statement::block(vec![Statement::VariableDeclaration(local)])),
    );

    Fixture {
        program: builder.finish(),
        sdk,
        member,
        parameter: parameter_id,
        local: local_id,
        type_parameter,
    }
}

fn context_for(fixture: &Fixture) -> StaticTypeContext {
    let facts = Arc::new(ProgramFacts::collect(&fixture.program));
    let core = CoreTypes::resolve(&fixture.program).expect("core types in test");
    StaticTypeContext::new(facts, core)
}

fn member<'a>(fixture: &'a Fixture) -> &'a Member {
    fixture.program.member(fixture.member).expect("member in test")
}

#[test]
fn test_literal_types() {
    let fixture = fixture();
    let mut context = context_for(&fixture);
    let member = member(&fixture);
    context.enter_library(member.enclosing_library);
    context.enter_member(member);

    assert_eq!(context.static_type_of(&Expression::NullLiteral), Type::Null);
    assert_eq!(
        context.static_type_of(&Expression::string("x")),
        fixture.sdk.string_type()
    );
    assert_eq!(
        context.static_type_of(&Expression::IntLiteral(3)),
        fixture.sdk.int_type()
    );
    assert_eq!(
        context.static_type_of(&Expression::list(Type::Dynamic, Vec::new())),
        fixture.sdk.list_of(Type::Dynamic)
    );

    context.leave_member(member.id);
    context.leave_library(member.enclosing_library);
}

#[test]
fn test_variables_and_promotion() {
    let fixture = fixture();
    let mut context = context_for(&fixture);
    let member = member(&fixture);
    context.enter_library(member.enclosing_library);
    context.enter_member(member);

    assert_eq!(
        context.static_type_of(&Expression::get(fixture.parameter)),
        fixture.sdk.string_type()
    );
    assert_eq!(
        context.static_type_of(&Expression::get(fixture.local)),
        fixture.sdk.int_type()
    );
    let promoted = Expression::VariableGet {
        variable: fixture.local,
        promoted_type: Some(Type::Null),
    };
    assert_eq!(context.static_type_of(&promoted), Type::Null);
}

#[test]
fn test_this_type_uses_class_type_parameters() {
    let fixture = fixture();
    let mut context = context_for(&fixture);
    let member = member(&fixture);
    context.enter_library(member.enclosing_library);
    context.enter_member(member);

    let this_type = context.static_type_of(&Expression::This);
    assert_eq!(this_type.interface_class(), member.enclosing_class);
    assert!(context.is_in_scope(&Type::parameter(fixture.type_parameter)));
    assert!(!context.is_in_scope(&Type::parameter(TypeParameterId(9999))));
}

#[test]
fn test_generic_invocation_substitutes_type_arguments() {
    let fixture = fixture();
    let mut context = context_for(&fixture);
    let member = member(&fixture);
    let catalog = crate::catalog::InteropCatalog::resolve(&fixture.program)
        .expect("catalog in test");
    let get_property = catalog.target(crate::catalog::Primitive::GetProperty);
    context.enter_library(member.enclosing_library);
    context.enter_member(member);

    let typed = Expression::call_generic(
        get_property,
        vec![fixture.sdk.string_type()],
        vec![Expression::NullLiteral, Expression::string("name")],
    );
    assert_eq!(context.static_type_of(&typed), fixture.sdk.string_type());

    let untyped = Expression::call(
        get_property,
        vec![Expression::NullLiteral, Expression::string("name")],
    );
    assert_eq!(context.static_type_of(&untyped), Type::Dynamic);
}

#[test]
fn test_constant_types() {
    let fixture = fixture();
    let context = context_for(&fixture);

    assert_eq!(context.constant_type(&Constant::Null), Type::Null);
    assert_eq!(
        context.constant_type(&Constant::String("a".into())),
        fixture.sdk.string_type()
    );
    assert_eq!(
        context.constant_type(&Constant::List {
            type_argument: fixture.sdk.int_type(),
            entries: vec![Constant::Int(1)],
        }),
        fixture.sdk.list_of(fixture.sdk.int_type())
    );
}

#[test]
#[should_panic(expected = "outside a member scope")]
fn test_query_outside_member_scope_panics() {
    let fixture = fixture();
    let mut context = context_for(&fixture);
    context.enter_library(member(&fixture).enclosing_library);
    context.static_type_of(&Expression::NullLiteral);
}

#[test]
#[should_panic(expected = "leaving member")]
fn test_unbalanced_leave_panics() {
    let fixture = fixture();
    let mut context = context_for(&fixture);
    context.enter_library(member(&fixture).enclosing_library);
    context.leave_member(fixture.member);
}
