//! Stack-scoped static typing of expressions.
//!
//! The context holds one library scope and, inside it, at most one member
//! scope. A member scope snapshots the member's variables and type parameters
//! on entry, so queries never need to borrow the (mutable) library.
//!
//! Querying a type outside a member scope, or leaving a scope that is not
//! the innermost one, means the traversal driving the context is broken.
//! Both panic.

use crate::catalog::CoreTypes;
use crate::program_facts::ProgramFacts;
use jsil_ir::node::Member;
use jsil_ir::{
    Constant, Expression, LibraryId, MemberId, StaticInvocation, Type, TypeParameterId,
    TypeSubstitution, VariableId,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

#[derive(Debug)]
enum Scope {
    Library(LibraryId),
    Member(MemberScope),
}

#[derive(Debug)]
struct MemberScope {
    member: MemberId,
    variables: FxHashMap<VariableId, Type>,
    type_parameters: FxHashSet<TypeParameterId>,
    this_type: Option<Type>,
}

#[derive(Debug)]
pub struct StaticTypeContext {
    facts: Arc<ProgramFacts>,
    core: CoreTypes,
    scopes: Vec<Scope>,
}

impl StaticTypeContext {
    pub fn new(facts: Arc<ProgramFacts>, core: CoreTypes) -> Self {
        Self {
            facts,
            core,
            scopes: Vec::new(),
        }
    }

    pub fn facts(&self) -> &ProgramFacts {
        &self.facts
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    pub fn enter_library(&mut self, library: LibraryId) {
        assert!(
            self.scopes.is_empty(),
            "entering library {library:?} inside another scope"
        );
        self.scopes.push(Scope::Library(library));
    }

    pub fn leave_library(&mut self, library: LibraryId) {
        match self.scopes.pop() {
            Some(Scope::Library(id)) if id == library => {}
            other => panic!("leaving library {library:?} but innermost scope is {other:?}"),
        }
    }

    pub fn enter_member(&mut self, member: &Member) {
        let Some(Scope::Library(library)) = self.scopes.last() else {
            panic!("entering member {} outside a library scope", member.name);
        };
        debug_assert_eq!(*library, member.enclosing_library);

        let mut variables = FxHashMap::default();
        let mut type_parameters = FxHashSet::default();
        jsil_ir::for_each_variable(&member.function, |declaration| {
            variables.insert(declaration.id, declaration.ty.clone());
        });
        collect_type_parameters(&member.function, &mut type_parameters);

        let mut this_type = None;
        if let Some(class) = member.enclosing_class {
            if let Some(facts) = self.facts.class(class) {
                type_parameters.extend(facts.type_parameters.iter().copied());
            }
            // Factories and static members have no receiver.
            if !member.is_static && !member.is_factory() {
                this_type = Some(self.facts.this_type(class));
            }
        }

        self.scopes.push(Scope::Member(MemberScope {
            member: member.id,
            variables,
            type_parameters,
            this_type,
        }));
    }

    pub fn leave_member(&mut self, member: MemberId) {
        match self.scopes.pop() {
            Some(Scope::Member(scope)) if scope.member == member => {}
            other => panic!("leaving member {member:?} but innermost scope is {other:?}"),
        }
    }

    fn member_scope(&self) -> &MemberScope {
        match self.scopes.last() {
            Some(Scope::Member(scope)) => scope,
            _ => panic!("static type queried outside a member scope"),
        }
    }

    /// Whether every type parameter `ty` mentions is in scope.
    pub fn is_in_scope(&self, ty: &Type) -> bool {
        let scope = self.member_scope();
        let mut in_scope = true;
        ty.for_each_type_parameter(&mut |parameter| {
            in_scope &= scope.type_parameters.contains(&parameter);
        });
        in_scope
    }

    // =========================================================================
    // Typing
    // =========================================================================

    /// Static type of `expression` in the active member scope.
    pub fn static_type_of(&self, expression: &Expression) -> Type {
        let scope = self.member_scope();
        match expression {
            Expression::NullLiteral => Type::Null,
            Expression::BoolLiteral(_) | Expression::Not(_) => Type::interface(self.core.boolean),
            Expression::IntLiteral(_) => Type::interface(self.core.int),
            Expression::DoubleLiteral(_) => Type::interface(self.core.double),
            Expression::StringLiteral(_) => Type::interface(self.core.string),
            Expression::VariableGet {
                variable,
                promoted_type,
            } => match promoted_type {
                Some(promoted) => promoted.clone(),
                None => self.variable_type(scope, *variable),
            },
            Expression::VariableSet { value, .. } => self.static_type_of(value),
            Expression::StaticInvocation(invocation) => self.invocation_type(invocation),
            Expression::StaticGet { target } => match self.facts.member(*target) {
                Some(signature) if signature.kind == jsil_ir::MemberKind::Getter => {
                    signature.return_type.clone()
                }
                Some(signature) => signature.function_type(),
                None => Type::Dynamic,
            },
            Expression::InstanceGet { result_type, .. }
            | Expression::InstanceInvocation { result_type, .. } => result_type.clone(),
            Expression::ConstructorInvocation {
                class, arguments, ..
            } => Type::generic_interface(*class, arguments.types.clone()),
            Expression::ListLiteral { type_argument, .. } => {
                Type::generic_interface(self.core.list, vec![type_argument.clone()])
            }
            Expression::ConstantExpression { ty, .. } => ty.clone(),
            Expression::This => match &scope.this_type {
                Some(ty) => ty.clone(),
                None => panic!("`this` in member {:?} without a receiver", scope.member),
            },
            Expression::FunctionExpression(function) => function.function_type(),
            Expression::AsExpression { ty, .. } => ty.clone(),
            Expression::Conditional { static_type, .. } => static_type.clone(),
        }
    }

    /// Type of an evaluated constant.
    pub fn constant_type(&self, constant: &Constant) -> Type {
        match constant {
            Constant::Null => Type::Null,
            Constant::Bool(_) => Type::interface(self.core.boolean),
            Constant::Int(_) => Type::interface(self.core.int),
            Constant::Double(_) => Type::interface(self.core.double),
            Constant::String(_) => Type::interface(self.core.string),
            Constant::List { type_argument, .. } => {
                Type::generic_interface(self.core.list, vec![type_argument.clone()])
            }
            Constant::TearOff { member } => match self.facts.member(*member) {
                Some(signature) => signature.function_type(),
                None => Type::Dynamic,
            },
            Constant::Instance {
                class,
                type_arguments,
            } => Type::generic_interface(*class, type_arguments.clone()),
        }
    }

    fn variable_type(&self, scope: &MemberScope, variable: VariableId) -> Type {
        match scope.variables.get(&variable) {
            Some(ty) => ty.clone(),
            None => panic!(
                "variable {variable:?} is not declared in member {:?}",
                scope.member
            ),
        }
    }

    /// Return type of a static call with its type arguments substituted.
    /// Omitted type arguments default to `dynamic`.
    fn invocation_type(&self, invocation: &StaticInvocation) -> Type {
        let Some(signature) = self.facts.member(invocation.target) else {
            return Type::Dynamic;
        };
        if signature.type_parameters.is_empty() {
            return signature.return_type.clone();
        }
        let types = &invocation.arguments.types;
        let substitution: TypeSubstitution = signature
            .type_parameters
            .iter()
            .enumerate()
            .map(|(i, parameter)| (*parameter, types.get(i).cloned().unwrap_or(Type::Dynamic)))
            .collect();
        signature.return_type.substitute(&substitution)
    }
}

fn collect_type_parameters(
    function: &jsil_ir::FunctionNode,
    type_parameters: &mut FxHashSet<TypeParameterId>,
) {
    struct TypeParameters<'a>(&'a mut FxHashSet<TypeParameterId>);

    impl jsil_ir::IrVisitor for TypeParameters<'_> {
        fn visit_type_parameter(&mut self, parameter: &jsil_ir::TypeParameter) {
            self.0.insert(parameter.id);
        }
    }

    jsil_ir::visit::walk_function(&mut TypeParameters(type_parameters), function);
}

#[cfg(test)]
#[path = "tests/static_type_context_tests.rs"]
mod tests;
