use super::*;
use crate::annotations::Annotations;
use crate::builder::{MemberSpec, ProgramBuilder};
use crate::sdk::install_sdk;

#[test]
fn test_prints_generic_static_call_with_list_argument() {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:app", Annotations::default());
    let receiver = builder.variable("receiver", sdk.object_type());
    let receiver_id = receiver.id;
    let run = builder.add_top_level(
        library,
        MemberSpec::method("run").parameters(vec![receiver]),
    );
    let program = builder.finish();
    let call_method = program
        .find_library(crate::sdk::JS_UTIL_LIBRARY)
        .and_then(|library| library.find_member(crate::sdk::names::CALL_METHOD))
        .expect("callMethod in test")
        .id;

    let printer = IrPrinter::new(&program);
    let call = Expression::call_generic(
        call_method,
        vec![Type::Dynamic],
        vec![
            Expression::get(receiver_id),
            Expression::string("run"),
            Expression::list(Type::Dynamic, vec![Expression::IntLiteral(1)]),
        ],
    );

    let output = printer.expression_to_string(&call);
    assert_eq!(
        output, "callMethod<dynamic>(receiver, \"run\", <dynamic>[1])",
        "unexpected rendering: {}",
        output
    );
    assert!(program.member(run).is_some());
}

#[test]
fn test_prints_types_with_nullability() {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let program = builder.finish();
    let printer = IrPrinter::new(&program);

    assert_eq!(
        printer.type_to_string(&sdk.list_of(sdk.nullable_object_type())),
        "List<Object?>"
    );
    assert_eq!(
        printer.type_to_string(&Type::function(vec![sdk.int_type()], Type::Void)),
        "void Function(int)"
    );
}

#[test]
fn test_prints_member_with_block_body() {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:app", Annotations::default());
    let value = builder.variable("value", sdk.string_type());
    let value_id = value.id;
    let member = builder.add_top_level(
        library,
        MemberSpec::method("echo")
            .static_member()
            .parameters(vec![value])
            .returns(sdk.string_type())
            .body(Statement::block(vec![Statement::ret(Expression::get(
                value_id,
            ))])),
    );
    let program = builder.finish();
    let printer = IrPrinter::new(&program);

    let output = printer.member_to_string(program.member(member).expect("member in test"));
    assert_eq!(output, "static echo(String value) {\n  return value;\n}");
}

#[test]
fn test_escapes_string_literals_and_marks_unknown_ids() {
    let program = Program::default();
    let printer = IrPrinter::new(&program);

    assert_eq!(
        printer.expression_to_string(&Expression::string("a\"b")),
        "\"a\\\"b\""
    );
    assert_eq!(
        printer.expression_to_string(&Expression::StaticGet {
            target: MemberId(42)
        }),
        "#member42"
    );
}
