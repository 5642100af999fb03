use super::*;
use jsil_ir::{Annotations, LibraryId, MemberSpec, Program, ProgramBuilder};

fn index_for(program: &Program, library: LibraryId) -> MemberIndex {
    let facts = ProgramFacts::collect(program);
    let library = program.library(library).expect("library in test");
    MemberIndex::build(library, &facts)
}

#[test]
fn test_extension_on_interop_class_is_indexed() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::default());
    let class = builder.add_class(library, "Window", Annotations::js(""));
    let extension = builder.add_extension(library, "WindowExt", Type::interface(class));
    let getter = builder.add_extension_member(extension, MemberSpec::getter("title").external());
    let program = builder.finish();

    let index = index_for(&program, library);
    let member = program.member(getter).expect("getter in test");

    assert_eq!(index.extension_member_count(), 1);
    assert_eq!(
        index.descriptor_of(getter).map(|d| d.kind()),
        Some(DeclaredKind::Getter)
    );
    assert!(index.is_instance_interop_member(member));
    assert!(!index.trusts_types(getter));
    assert_eq!(index.container_of(getter), None);
}

#[test]
fn test_extension_on_plain_class_is_ignored() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::default());
    let class = builder.add_class(library, "Plain", Annotations::default());
    let extension = builder.add_extension(library, "PlainExt", Type::interface(class));
    let method = builder.add_extension_member(extension, MemberSpec::method("go").external());
    let program = builder.finish();

    let index = index_for(&program, library);

    assert_eq!(index.descriptor_of(method), None);
    assert!(!index.is_instance_interop_member(program.member(method).expect("member in test")));
}

#[test]
fn test_native_and_trust_types_on_type() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::default());
    let class = builder.add_class(
        library,
        "Element",
        Annotations::native().with_trust_types(),
    );
    let extension = builder.add_extension(library, "ElementExt", Type::interface(class));
    let method = builder.add_extension_member(extension, MemberSpec::method("click").external());
    let program = builder.finish();

    let index = index_for(&program, library);

    assert!(index.descriptor_of(method).is_some());
    assert!(index.trusts_types(method));
}

#[test]
fn test_extension_on_class_from_another_library() {
    let mut builder = ProgramBuilder::new();
    let dom = builder.add_library("package:dom", Annotations::default());
    let class = builder.add_class(dom, "Node", Annotations::internal_js(""));
    let app = builder.add_library("package:app", Annotations::default());
    let extension = builder.add_extension(app, "NodeExt", Type::interface(class));
    let setter = builder.add_extension_member(extension, MemberSpec::setter("text").external());
    let program = builder.finish();

    let index = index_for(&program, app);

    assert_eq!(
        index.descriptor_of(setter).map(|d| d.kind()),
        Some(DeclaredKind::Setter)
    );
}

#[test]
fn test_inline_members_record_container() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::default());
    let inline_class =
        builder.add_inline_class(library, "Handle", Annotations::js(""), Type::Dynamic);
    let factory = builder.add_inline_member(inline_class, MemberSpec::factory("create").external());
    let getter = builder.add_inline_member(inline_class, MemberSpec::getter("id").external());
    let static_method = builder.add_inline_member(
        inline_class,
        MemberSpec::method("lookup").static_member().external(),
    );
    let program = builder.finish();

    let index = index_for(&program, library);
    let is_instance = |id| {
        index.is_instance_interop_member(program.member(id).expect("member in test"))
    };

    assert_eq!(index.inline_member_count(), 3);
    assert_eq!(index.container_of(factory), Some(inline_class));
    assert!(!is_instance(factory));
    assert!(is_instance(getter));
    assert!(!is_instance(static_method));
    assert!(matches!(
        index.descriptor_of(factory),
        Some(MemberDescriptor::Inline { container, .. }) if container == inline_class
    ));
}

#[test]
fn test_inline_class_without_interop_annotation_is_ignored() {
    let mut builder = ProgramBuilder::new();
    let library = builder.add_library("package:app", Annotations::default());
    let inline_class =
        builder.add_inline_class(library, "Meters", Annotations::default(), Type::Dynamic);
    let getter = builder.add_inline_member(inline_class, MemberSpec::getter("value"));
    let program = builder.finish();

    let index = index_for(&program, library);

    assert_eq!(index.inline_member_count(), 0);
    assert_eq!(index.container_of(getter), None);
}
