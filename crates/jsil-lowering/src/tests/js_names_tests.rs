use super::*;
use jsil_ir::{Annotations, LibraryId, MemberId, MemberSpec, Program, ProgramBuilder, Type};

fn resolve(program: &Program, library: LibraryId, member: MemberId) -> Option<String> {
    resolve_with(program, library, member, &LoweringOptions::default())
}

fn resolve_with(
    program: &Program,
    library: LibraryId,
    member: MemberId,
    options: &LoweringOptions,
) -> Option<String> {
    let facts = ProgramFacts::collect(program);
    let index = MemberIndex::build(program.library(library).expect("library in test"), &facts);
    let resolver = JsNameResolver::new(&facts, &index, options);
    resolver.dotted_prefix(program.member(member).expect("member in test"))
}

#[test]
fn test_concat_skips_empty_sides() {
    assert_eq!(concat("", ""), "");
    assert_eq!(concat("lib", ""), "lib");
    assert_eq!(concat("", "foo"), "foo");
    assert_eq!(concat("lib", "foo.bar"), "lib.foo.bar");
}

#[test]
fn test_top_level_member_splits_at_last_dot() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::internal_js("lib"));
    let member = builder.add_top_level(
        library,
        MemberSpec::getter("x")
            .external()
            .static_member()
            .annotated(Annotations::js("foo.bar")),
    );
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member).as_deref(), Some("lib.foo"));
    let member = program.member(member).expect("member in test");
    assert_eq!(member_js_name(member, None), "bar");
}

#[test]
fn test_top_level_member_without_dots_uses_library_prefix() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::default());
    let member = builder.add_top_level(
        library,
        MemberSpec::method("alert")
            .external()
            .static_member()
            .annotated(Annotations::internal_js("")),
    );
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member).as_deref(), Some(""));
    let member = program.member(member).expect("member in test");
    assert_eq!(member_js_name(member, None), "alert");
}

#[test]
fn test_deeply_dotted_top_level_name() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::internal_js(""));
    let member = builder.add_top_level(
        library,
        MemberSpec::method("f")
            .external()
            .annotated(Annotations::js("a.b.c")),
    );
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member).as_deref(), Some("a.b"));
    let member = program.member(member).expect("member in test");
    assert_eq!(member_js_name(member, None), "c");
}

#[test]
fn test_legacy_library_top_level_is_not_resolvable() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("sdk:html", Annotations::internal_js("dom"));
    let member = builder.add_top_level(library, MemberSpec::getter("window").external());
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member), None);

    let options = LoweringOptions {
        legacy_js_annotation_libraries: Vec::new(),
        ..LoweringOptions::default()
    };
    assert_eq!(
        resolve_with(&program, library, member, &options).as_deref(),
        Some("dom")
    );
}

#[test]
fn test_public_annotation_alone_does_not_resolve_top_level() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::js("lib"));
    let member = builder.add_top_level(
        library,
        MemberSpec::getter("x")
            .external()
            .annotated(Annotations::js("foo.bar")),
    );
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member), None);
}

#[test]
fn test_non_external_member_is_not_resolvable() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::internal_js("lib"));
    let member = builder.add_top_level(library, MemberSpec::getter("x"));
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member), None);
}

#[test]
fn test_static_interop_class_member() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:ui", Annotations::js("ui"));
    let class = builder.add_class(
        library,
        "WidgetImpl",
        Annotations::js("Widget").with_static_interop(),
    );
    let static_method = builder.add_class_member(
        class,
        MemberSpec::method("create").external().static_member(),
    );
    let factory = builder.add_class_member(class, MemberSpec::factory("").external());
    let instance = builder.add_class_member(class, MemberSpec::method("render").external());
    let program = builder.finish();

    assert_eq!(
        resolve(&program, library, static_method).as_deref(),
        Some("ui.Widget")
    );
    assert_eq!(
        resolve(&program, library, factory).as_deref(),
        Some("ui.Widget")
    );
    assert_eq!(resolve(&program, library, instance), None);
}

#[test]
fn test_unnamed_static_interop_class_uses_declared_name() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:ui", Annotations::default());
    let class = builder.add_class(library, "Canvas", Annotations::js("").with_static_interop());
    let member = builder.add_class_member(
        class,
        MemberSpec::getter("count").external().static_member(),
    );
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member).as_deref(), Some("Canvas"));
}

#[test]
fn test_class_without_static_interop_is_not_resolvable() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:ui", Annotations::js("ui"));
    let class = builder.add_class(library, "Panel", Annotations::js("Panel"));
    let member = builder.add_class_member(
        class,
        MemberSpec::method("open").external().static_member(),
    );
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member), None);
}

#[test]
fn test_inline_container_static_and_constructor_members() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::js("lib"));
    let inline_class =
        builder.add_inline_class(library, "Counter", Annotations::js("my.Counter"), Type::Dynamic);
    let constructor =
        builder.add_inline_member(inline_class, MemberSpec::constructor("").external());
    let static_getter = builder.add_inline_member(
        inline_class,
        MemberSpec::getter("instances").external().static_member(),
    );
    let instance_method =
        builder.add_inline_member(inline_class, MemberSpec::method("increment").external());
    let program = builder.finish();

    // Container members use the whole container name.
    assert_eq!(
        resolve(&program, library, constructor).as_deref(),
        Some("lib.my.Counter")
    );
    assert_eq!(
        resolve(&program, library, static_getter).as_deref(),
        Some("lib.my.Counter")
    );
    assert_eq!(resolve(&program, library, instance_method), None);
}

#[test]
fn test_static_extension_member_resolves_like_top_level() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::internal_js("lib"));
    let class = builder.add_class(library, "Host", Annotations::js(""));
    let extension = builder.add_extension(library, "HostExt", Type::interface(class));
    let member = builder.add_extension_member(
        extension,
        MemberSpec::method("ping").external().static_member(),
    );
    let program = builder.finish();

    assert_eq!(resolve(&program, library, member).as_deref(), Some("lib"));
}
