//! JS names of statically resolvable interop members.
//!
//! A statically resolvable member is reached through a fixed path from the
//! global object rather than through a receiver. The path is composed from
//! the JS names of the library, the container and the member:
//!
//! ```text
//! library "lib", top-level member "foo.bar"                =>  prefix "lib.foo", name "bar"
//! library "ui", static-interop class "Widget", static "create"
//!                                                          =>  prefix "ui.Widget", name "create"
//! ```
//!
//! Top-level members split their own JS name at the last `.`; container
//! members contribute the container's whole JS name.

use crate::member_index::{DeclaredKind, MemberDescriptor, MemberIndex};
use crate::options::LoweringOptions;
use crate::program_facts::ProgramFacts;
use jsil_ir::annotations::{is_internal_js_interop, is_static_interop, js_name};
use jsil_ir::node::Member;

pub struct JsNameResolver<'a> {
    facts: &'a ProgramFacts,
    index: &'a MemberIndex,
    options: &'a LoweringOptions,
}

impl<'a> JsNameResolver<'a> {
    pub fn new(facts: &'a ProgramFacts, index: &'a MemberIndex, options: &'a LoweringOptions) -> Self {
        Self {
            facts,
            index,
            options,
        }
    }

    /// Dotted path from the global object to the object hosting `member`,
    /// or `None` when the member is not statically resolvable. An empty
    /// path means the global object itself.
    pub fn dotted_prefix(&self, member: &Member) -> Option<String> {
        if !member.is_external {
            return None;
        }
        let library = self.facts.library(member.enclosing_library);
        let mut prefix = library
            .map(|library| js_name(&library.annotations).to_string())
            .unwrap_or_default();

        if self.is_top_level_interop_member(member) {
            let name = js_name(member);
            if let Some(dot) = name.rfind('.') {
                prefix = concat(&prefix, &name[..dot]);
            }
            return Some(prefix);
        }

        if member.is_inline_class_member {
            let descriptor = self.index.descriptor_of(member.id)?;
            let resolvable = descriptor.is_static()
                || matches!(
                    descriptor.kind(),
                    DeclaredKind::Constructor | DeclaredKind::Factory
                );
            if !resolvable {
                return None;
            }
            let container = self.index.container_of(member.id)?;
            let container = self.facts.inline_class(container)?;
            let container_name = match js_name(&container.annotations) {
                "" => container.name.as_str(),
                name => name,
            };
            return Some(concat(&prefix, container_name));
        }

        if let Some(class) = member.enclosing_class.and_then(|id| self.facts.class(id)) {
            if is_static_interop(&class.annotations) && (member.is_static || member.is_factory()) {
                let class_name = match js_name(&class.annotations) {
                    "" => class.name.as_str(),
                    name => name,
                };
                return Some(concat(&prefix, class_name));
            }
        }

        None
    }

    /// A member outside any class or inline container using internal
    /// interop, outside the legacy libraries.
    fn is_top_level_interop_member(&self, member: &Member) -> bool {
        if member.is_inline_class_member {
            return false;
        }
        if member.enclosing_class.is_some() {
            return false;
        }
        let Some(library) = self.facts.library(member.enclosing_library) else {
            return false;
        };
        (is_internal_js_interop(member) || is_internal_js_interop(&library.annotations))
            && !self.options.is_legacy_library(&library.import_uri)
    }
}

/// Property or method name used to reach `member` on its host object: the
/// part of its JS name after the last `.`, or its declared name.
pub fn member_js_name(member: &Member, descriptor: Option<&MemberDescriptor>) -> String {
    let name = js_name(member);
    if !name.is_empty() {
        return match name.rfind('.') {
            Some(dot) => name[dot + 1..].to_string(),
            None => name.to_string(),
        };
    }
    match descriptor {
        Some(MemberDescriptor::Extension(descriptor)) => descriptor.name.clone(),
        Some(MemberDescriptor::Inline { descriptor, .. }) => descriptor.name.clone(),
        None => member.name.clone(),
    }
}

/// Join two JS name fragments with `.`. An empty side yields the other.
pub fn concat(prefix: &str, part: &str) -> String {
    match (prefix.is_empty(), part.is_empty()) {
        (true, _) => part.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{prefix}.{part}"),
    }
}

#[cfg(test)]
#[path = "tests/js_names_tests.rs"]
mod tests;
