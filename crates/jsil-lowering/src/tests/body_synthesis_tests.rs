use super::*;
use crate::catalog::CoreTypes;
use crate::options::LoweringOptions;
use crate::program_facts::ProgramFacts;
use jsil_ir::{
    Annotations, IrPrinter, MemberId, MemberSpec, Program, ProgramBuilder, Sdk, install_sdk,
};
use std::sync::Arc;

/// Synthesize a body for `member` and render it.
fn synthesize(program: &Program, member: MemberId, optimize: bool) -> Option<(String, Option<bool>)> {
    let member = program.member(member).expect("member in test");
    let library = program
        .library(member.enclosing_library)
        .expect("library in test");
    let facts = Arc::new(ProgramFacts::collect(program));
    let catalog = InteropCatalog::resolve(program).expect("catalog in test");
    let core = CoreTypes::resolve(program).expect("core types in test");
    let options = LoweringOptions::default();
    let index = MemberIndex::build(library, &facts);
    let optimizer = UncheckedCallOptimizer::new(&catalog, &core);
    let synthesizer = BodySynthesizer::new(
        &catalog,
        &index,
        JsNameResolver::new(&facts, &index, &options),
        optimize.then_some(&optimizer),
    );

    let mut context = StaticTypeContext::new(Arc::clone(&facts), core);
    context.enter_library(library.id);
    context.enter_member(member);
    let result = synthesizer.synthesize(member, &context);
    context.leave_member(member.id);
    context.leave_library(library.id);

    let printer = IrPrinter::new(program);
    result.map(|synthesized| {
        (
            printer.statement_to_string(&synthesized.body),
            synthesized.optimized,
        )
    })
}

struct Dom {
    builder: ProgramBuilder,
    sdk: Sdk,
    extension: jsil_ir::ExtensionId,
}

fn dom(on_type_annotations: Annotations) -> Dom {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:dom", Annotations::default());
    let window = builder.add_class(library, "Window", on_type_annotations);
    let extension = builder.add_extension(library, "WindowExt", Type::interface(window));
    Dom {
        builder,
        sdk,
        extension,
    }
}

#[test]
fn test_instance_getter_reads_property_of_receiver() {
    let mut dom = dom(Annotations::js(""));
    let receiver = dom.builder.variable("w", Type::Dynamic);
    let getter = dom.builder.add_extension_member(
        dom.extension,
        MemberSpec::getter("title")
            .external()
            .parameters(vec![receiver])
            .returns(dom.sdk.string_type()),
    );
    let program = dom.builder.finish();

    let (body, optimized) = synthesize(&program, getter, true).expect("getter should lower");
    assert_eq!(body, "return getProperty<String>(w, \"title\");");
    assert_eq!(optimized, None);
}

#[test]
fn test_trust_types_on_type_selects_trust_type_variants() {
    let mut dom = dom(Annotations::js("").with_trust_types());
    let receiver = dom.builder.variable("w", Type::Dynamic);
    let getter = dom.builder.add_extension_member(
        dom.extension,
        MemberSpec::getter("title")
            .external()
            .parameters(vec![receiver])
            .returns(dom.sdk.string_type()),
    );
    let receiver = dom.builder.variable("w", Type::Dynamic);
    let method = dom.builder.add_extension_member(
        dom.extension,
        MemberSpec::method("focus")
            .external()
            .parameters(vec![receiver])
            .returns(Type::Void),
    );
    let program = dom.builder.finish();

    let (body, _) = synthesize(&program, getter, true).expect("getter should lower");
    assert!(body.contains("getPropertyTrustType<String>"), "{}", body);

    let (body, optimized) = synthesize(&program, method, true).expect("method should lower");
    assert_eq!(body, "return callMethodUncheckedTrustType0<void>(w, \"focus\");");
    assert_eq!(optimized, Some(true));
}

#[test]
fn test_instance_setter_uses_last_parameter_as_value() {
    let mut dom = dom(Annotations::js(""));
    let receiver = dom.builder.variable("w", Type::Dynamic);
    let value = dom.builder.variable("value", dom.sdk.string_type());
    let setter = dom.builder.add_extension_member(
        dom.extension,
        MemberSpec::setter("title")
            .external()
            .parameters(vec![receiver, value])
            .returns(Type::Void),
    );
    let program = dom.builder.finish();

    let (body, optimized) = synthesize(&program, setter, true).expect("setter should lower");
    assert_eq!(
        body,
        "return setPropertyUnchecked<String>(w, \"title\", value);"
    );
    assert_eq!(optimized, Some(true));

    let (body, optimized) = synthesize(&program, setter, false).expect("setter should lower");
    assert_eq!(body, "return setProperty<String>(w, \"title\", value);");
    assert_eq!(optimized, None);
}

#[test]
fn test_instance_method_drops_receiver_from_arguments() {
    let mut dom = dom(Annotations::js(""));
    let receiver = dom.builder.variable("w", Type::Dynamic);
    let url = dom.builder.variable("url", dom.sdk.string_type());
    let target = dom.builder.variable("target", dom.sdk.object_type());
    let method = dom.builder.add_extension_member(
        dom.extension,
        MemberSpec::method("open")
            .external()
            .parameters(vec![receiver, url, target])
            .returns(Type::Dynamic)
            .annotated(Annotations::js("openWindow")),
    );
    let program = dom.builder.finish();

    let (body, optimized) = synthesize(&program, method, true).expect("method should lower");
    // `Object` arguments keep the checked call.
    assert_eq!(
        body,
        "return callMethod<dynamic>(w, \"openWindow\", <dynamic>[url, target]);"
    );
    assert_eq!(optimized, Some(false));
}

#[test]
#[should_panic(expected = "has no receiver parameter")]
fn test_instance_member_without_receiver_is_fatal() {
    let mut dom = dom(Annotations::js(""));
    let getter = dom
        .builder
        .add_extension_member(dom.extension, MemberSpec::getter("title").external());
    let program = dom.builder.finish();

    synthesize(&program, getter, true);
}

#[test]
#[should_panic(expected = "has no value parameter")]
fn test_static_setter_without_value_is_fatal() {
    let mut builder = ProgramBuilder::new();
    install_sdk(&mut builder);
    let library = builder.add_library("package:ui", Annotations::js("ui"));
    let class = builder.add_class(
        library,
        "Widget",
        Annotations::js("").with_static_interop(),
    );
    let setter = builder.add_class_member(
        class,
        MemberSpec::setter("label").external().static_member(),
    );
    let program = builder.finish();

    synthesize(&program, setter, true);
}

#[test]
fn test_static_interop_factory_calls_constructor_off_global_path() {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:ui", Annotations::js("ui"));
    let class = builder.add_class(
        library,
        "Widget",
        Annotations::js("").with_static_interop(),
    );
    let label = builder.variable("label", sdk.string_type());
    let factory = builder.add_class_member(
        class,
        MemberSpec::factory("").external().parameters(vec![label]),
    );
    let program = builder.finish();

    let (body, optimized) = synthesize(&program, factory, true).expect("factory should lower");
    assert_eq!(
        body,
        "return callConstructorUnchecked1<Widget>(\
         getPropertyTrustType<dynamic>(getPropertyTrustType<dynamic>(globalThis, \"ui\"), \"Widget\"), \
         label);"
    );
    assert_eq!(optimized, Some(true));
}

#[test]
fn test_anonymous_factory_is_left_external() {
    let mut builder = ProgramBuilder::new();
    install_sdk(&mut builder);
    let library = builder.add_library("package:ui", Annotations::default());
    let class = builder.add_class(
        library,
        "Options",
        Annotations::js("")
            .with_static_interop()
            .with_anonymous(),
    );
    let factory = builder.add_class_member(class, MemberSpec::factory("").external());
    let program = builder.finish();

    assert_eq!(synthesize(&program, factory, true), None);
}

#[test]
fn test_top_level_getter_with_empty_prefix_reads_global() {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:app", Annotations::internal_js(""));
    let getter = builder.add_top_level(
        library,
        MemberSpec::getter("document")
            .external()
            .static_member()
            .returns(sdk.object_type()),
    );
    let program = builder.finish();

    let (body, _) = synthesize(&program, getter, true).expect("getter should lower");
    assert_eq!(body, "return getProperty<Object>(globalThis, \"document\");");
}

#[test]
fn test_static_member_of_trust_types_class_trusts_types() {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:app", Annotations::default());
    let class = builder.add_class(
        library,
        "Math",
        Annotations::js("")
            .with_static_interop()
            .with_trust_types(),
    );
    let value = builder.variable("x", sdk.int_type());
    let method = builder.add_class_member(
        class,
        MemberSpec::method("abs")
            .external()
            .static_member()
            .parameters(vec![value])
            .returns(sdk.int_type()),
    );
    let program = builder.finish();

    let (body, _) = synthesize(&program, method, true).expect("method should lower");
    assert_eq!(
        body,
        "return callMethodUncheckedTrustType1<int>(getPropertyTrustType<dynamic>(globalThis, \"Math\"), \"abs\", x);"
    );
}

#[test]
fn test_inline_constructor_and_getter() {
    let mut builder = ProgramBuilder::new();
    let sdk = install_sdk(&mut builder);
    let library = builder.add_library("package:app", Annotations::default());
    let inline_class =
        builder.add_inline_class(library, "Point", Annotations::js(""), Type::Dynamic);
    let x = builder.variable("x", sdk.int_type());
    let y = builder.variable("y", sdk.int_type());
    let constructor = builder.add_inline_member(
        inline_class,
        MemberSpec::constructor("").external().parameters(vec![x, y]),
    );
    let receiver = builder.variable("p", Type::inline(inline_class));
    let getter = builder.add_inline_member(
        inline_class,
        MemberSpec::getter("x")
            .external()
            .parameters(vec![receiver])
            .returns(sdk.int_type()),
    );
    let program = builder.finish();

    let (body, _) = synthesize(&program, constructor, true).expect("constructor should lower");
    assert_eq!(
        body,
        "return callConstructorUnchecked2<Point>(getPropertyTrustType<dynamic>(globalThis, \"Point\"), x, y);"
    );

    let (body, _) = synthesize(&program, getter, true).expect("getter should lower");
    assert_eq!(body, "return getProperty<int>(p, \"x\");");
}

#[test]
fn test_non_interop_members_are_not_lowered() {
    let mut builder = ProgramBuilder::new();
    install_sdk(&mut builder);
    let library = builder.add_library("package:app", Annotations::default());
    let class = builder.add_class(library, "Plain", Annotations::default());
    let external_instance = builder.add_class_member(class, MemberSpec::method("run").external());
    let concrete = builder.add_top_level(library, MemberSpec::method("main"));
    let program = builder.finish();

    assert_eq!(synthesize(&program, external_instance, true), None);
    assert_eq!(synthesize(&program, concrete, true), None);
}
