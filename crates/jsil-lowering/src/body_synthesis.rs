//! Bodies for external interop members.
//!
//! An external interop member has no body in the IR. The synthesizer gives
//! it one that forwards to a primitive interop operation:
//!
//! | declared as | body                                                        |
//! |-------------|-------------------------------------------------------------|
//! | getter      | `return getProperty[TrustType]<R>(receiver, "name")`        |
//! | setter      | `return setProperty<V>(receiver, "name", value)`            |
//! | method      | `return callMethod[TrustType]<R>(receiver, "name", [args])` |
//! | constructor | `return callConstructor<R>(constructor, [args])`            |
//!
//! Instance members of interop extensions and inline containers use their
//! leading parameter as the receiver. Statically resolvable members reach
//! their receiver (or constructor) from the global object through a chain
//! of `getPropertyTrustType` calls, one per segment of the dotted prefix.

use crate::catalog::{InteropCatalog, Primitive};
use crate::js_names::{JsNameResolver, member_js_name};
use crate::member_index::{DeclaredKind, MemberDescriptor, MemberIndex};
use crate::static_type_context::StaticTypeContext;
use crate::unchecked_calls::UncheckedCallOptimizer;
use jsil_ir::annotations::{is_anonymous_literal_container, trusts_static_types};
use jsil_ir::node::Member;
use jsil_ir::{Arguments, Expression, Statement, StaticInvocation, Type, VariableDeclaration};

/// A body produced for an external member.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedBody {
    pub body: Statement,
    /// Whether the forwarding call was specialized, when it was a checked
    /// call offered to the optimizer.
    pub optimized: Option<bool>,
}

pub struct BodySynthesizer<'a> {
    catalog: &'a InteropCatalog,
    index: &'a MemberIndex,
    names: JsNameResolver<'a>,
    /// `None` when unchecked-call optimization is disabled.
    optimizer: Option<&'a UncheckedCallOptimizer<'a>>,
}

/// Where the forwarding call gets its receiver from.
enum Receiver<'m> {
    /// The member's leading parameter; the rest are its arguments.
    Parameter {
        receiver: &'m VariableDeclaration,
        rest: &'m [VariableDeclaration],
    },
    /// A path from the global object; all parameters are arguments.
    Global {
        receiver: Expression,
        parameters: &'m [VariableDeclaration],
    },
}

impl<'a> BodySynthesizer<'a> {
    pub fn new(
        catalog: &'a InteropCatalog,
        index: &'a MemberIndex,
        names: JsNameResolver<'a>,
        optimizer: Option<&'a UncheckedCallOptimizer<'a>>,
    ) -> Self {
        Self {
            catalog,
            index,
            names,
            optimizer,
        }
    }

    /// Body for `member`, or `None` if it is not an external interop member
    /// this pass lowers.
    pub fn synthesize(
        &self,
        member: &Member,
        context: &StaticTypeContext,
    ) -> Option<SynthesizedBody> {
        if !member.is_external {
            return None;
        }
        let descriptor = self.index.descriptor_of(member.id);
        let kind = descriptor
            .as_ref()
            .map_or(DeclaredKind::of_member(member.kind), MemberDescriptor::kind);
        let name = member_js_name(member, descriptor.as_ref());
        let parameters = member.function.positional_parameters.as_slice();

        if self.index.is_instance_interop_member(member) {
            let Some((receiver, rest)) = parameters.split_first() else {
                panic!(
                    "instance interop member {} has no receiver parameter",
                    member.name
                );
            };
            let trust_type = self.index.trusts_types(member.id);
            let receiver = Receiver::Parameter { receiver, rest };
            return match kind {
                DeclaredKind::Getter => Some(self.getter(member, receiver, name, trust_type)),
                DeclaredKind::Setter => Some(self.setter(member, receiver, name, context)),
                DeclaredKind::Method => {
                    Some(self.method(member, receiver, name, trust_type, context))
                }
                DeclaredKind::Operator
                | DeclaredKind::TearOff
                | DeclaredKind::Constructor
                | DeclaredKind::Factory => None,
            };
        }

        let prefix = self.names.dotted_prefix(member)?;
        let receiver = Receiver::Global {
            receiver: self.global_path(&prefix),
            parameters,
        };
        let trust_type = self.enclosing_class_trusts_types(member, context);
        match kind {
            DeclaredKind::Getter => Some(self.getter(member, receiver, name, trust_type)),
            DeclaredKind::Setter => Some(self.setter(member, receiver, name, context)),
            DeclaredKind::Method => Some(self.method(member, receiver, name, trust_type, context)),
            DeclaredKind::Constructor | DeclaredKind::Factory
                if !self.is_anonymous_container(member, context) =>
            {
                Some(self.constructor(member, receiver, context))
            }
            DeclaredKind::Constructor
            | DeclaredKind::Factory
            | DeclaredKind::Operator
            | DeclaredKind::TearOff => None,
        }
    }

    fn getter(
        &self,
        member: &Member,
        receiver: Receiver<'_>,
        name: String,
        trust_type: bool,
    ) -> SynthesizedBody {
        let target = if trust_type {
            Primitive::GetPropertyTrustType
        } else {
            Primitive::GetProperty
        };
        let (receiver, _) = receiver.split();
        let call = StaticInvocation {
            target: self.catalog.target(target),
            arguments: Arguments::with_types(
                vec![member.function.return_type.clone()],
                vec![receiver, Expression::string(name)],
            ),
        };
        SynthesizedBody {
            body: Statement::ret(Expression::StaticInvocation(call)),
            optimized: None,
        }
    }

    fn setter(
        &self,
        member: &Member,
        receiver: Receiver<'_>,
        name: String,
        context: &StaticTypeContext,
    ) -> SynthesizedBody {
        let (receiver, parameters) = receiver.split();
        let Some(value) = parameters.last() else {
            panic!("interop setter {} has no value parameter", member.name);
        };
        let call = StaticInvocation {
            target: self.catalog.target(Primitive::SetProperty),
            arguments: Arguments::with_types(
                vec![value.ty.clone()],
                vec![receiver, Expression::string(name), Expression::get(value.id)],
            ),
        };
        self.finish(call, context)
    }

    fn method(
        &self,
        member: &Member,
        receiver: Receiver<'_>,
        name: String,
        trust_type: bool,
        context: &StaticTypeContext,
    ) -> SynthesizedBody {
        let target = if trust_type {
            Primitive::CallMethodTrustType
        } else {
            Primitive::CallMethod
        };
        let (receiver, parameters) = receiver.split();
        let call = StaticInvocation {
            target: self.catalog.target(target),
            arguments: Arguments::with_types(
                vec![member.function.return_type.clone()],
                vec![receiver, Expression::string(name), argument_list(parameters)],
            ),
        };
        self.finish(call, context)
    }

    fn constructor(
        &self,
        member: &Member,
        receiver: Receiver<'_>,
        context: &StaticTypeContext,
    ) -> SynthesizedBody {
        let (constructor, parameters) = receiver.split();
        let call = StaticInvocation {
            target: self.catalog.target(Primitive::CallConstructor),
            arguments: Arguments::with_types(
                vec![member.function.return_type.clone()],
                vec![constructor, argument_list(parameters)],
            ),
        };
        self.finish(call, context)
    }

    /// Offer a synthesized checked call to the optimizer and wrap it in a
    /// return.
    fn finish(&self, call: StaticInvocation, context: &StaticTypeContext) -> SynthesizedBody {
        debug_assert!(
            call.arguments.types.iter().all(|ty| context.is_in_scope(ty)),
            "synthesized type argument references a type parameter out of scope"
        );
        let (call, optimized) = match self.optimizer {
            Some(optimizer) => {
                let result = optimizer.optimize(call, context);
                let optimized = result.is_unchecked();
                (result.into_invocation(), Some(optimized))
            }
            None => (call, None),
        };
        SynthesizedBody {
            body: Statement::ret(Expression::StaticInvocation(call)),
            optimized,
        }
    }

    /// `globalThis`, then one `getPropertyTrustType` per dotted segment.
    fn global_path(&self, prefix: &str) -> Expression {
        let mut receiver = Expression::StaticGet {
            target: self.catalog.target(Primitive::GlobalThis),
        };
        if prefix.is_empty() {
            return receiver;
        }
        let get_property = self.catalog.target(Primitive::GetPropertyTrustType);
        for segment in prefix.split('.') {
            receiver = Expression::call_generic(
                get_property,
                vec![Type::Dynamic],
                vec![receiver, Expression::string(segment)],
            );
        }
        receiver
    }

    fn enclosing_class_trusts_types(&self, member: &Member, context: &StaticTypeContext) -> bool {
        member
            .enclosing_class
            .and_then(|class| context.facts().class(class))
            .is_some_and(|class| trusts_static_types(&class.annotations))
    }

    /// Members of anonymous object-literal containers construct plain
    /// objects and keep their external declaration.
    fn is_anonymous_container(&self, member: &Member, context: &StaticTypeContext) -> bool {
        let facts = context.facts();
        if let Some(container) = self.index.container_of(member.id) {
            return facts
                .inline_class(container)
                .is_some_and(|inline_class| is_anonymous_literal_container(&inline_class.annotations));
        }
        member
            .enclosing_class
            .and_then(|class| facts.class(class))
            .is_some_and(|class| is_anonymous_literal_container(&class.annotations))
    }
}

impl<'m> Receiver<'m> {
    /// The receiver expression and the parameters passed as arguments.
    fn split(self) -> (Expression, &'m [VariableDeclaration]) {
        match self {
            Self::Parameter { receiver, rest } => (Expression::get(receiver.id), rest),
            Self::Global {
                receiver,
                parameters,
            } => (receiver, parameters),
        }
    }
}

/// `<dynamic>[p1, p2, ...]`
fn argument_list(parameters: &[VariableDeclaration]) -> Expression {
    Expression::list(
        Type::Dynamic,
        parameters
            .iter()
            .map(|parameter| Expression::get(parameter.id))
            .collect(),
    )
}

#[cfg(test)]
#[path = "tests/body_synthesis_tests.rs"]
mod tests;
