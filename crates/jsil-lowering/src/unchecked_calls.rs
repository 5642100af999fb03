//! Arity specialization of checked interop calls.
//!
//! `setProperty`, `callMethod`, `callMethodTrustType` and `callConstructor`
//! check and convert their arguments at runtime. When every argument is
//! statically known to be interop-safe and the argument list is a literal of
//! at most four elements, the call is rewritten to an unchecked variant that
//! takes the arguments directly:
//!
//! ```text
//! callMethod<R>(o, "run", <dynamic>[a, b])   =>   callMethodUnchecked2<R>(o, "run", a, b)
//! setProperty<V>(o, "x", v)                  =>   setPropertyUnchecked<V>(o, "x", v)
//! ```
//!
//! An unchecked target never matches the checked set, so running the
//! optimizer again over its own output changes nothing.

use crate::catalog::{CheckedCall, CoreTypes, InteropCatalog, Primitive};
use crate::static_type_context::StaticTypeContext;
use jsil_ir::sdk::UNCHECKED_VARIANTS;
use jsil_ir::{Constant, Expression, StaticInvocation, Type};

/// Result of offering a call to the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Optimized {
    /// Rewritten to an unchecked variant.
    Unchecked(StaticInvocation),
    /// Returned as given.
    Unchanged(StaticInvocation),
}

impl Optimized {
    pub fn is_unchecked(&self) -> bool {
        matches!(self, Self::Unchecked(_))
    }

    pub fn into_invocation(self) -> StaticInvocation {
        match self {
            Self::Unchecked(invocation) | Self::Unchanged(invocation) => invocation,
        }
    }
}

pub struct UncheckedCallOptimizer<'a> {
    catalog: &'a InteropCatalog,
    core: &'a CoreTypes,
}

impl<'a> UncheckedCallOptimizer<'a> {
    pub fn new(catalog: &'a InteropCatalog, core: &'a CoreTypes) -> Self {
        Self { catalog, core }
    }

    /// The checked call `invocation` performs, if any.
    pub fn checked_call(&self, invocation: &StaticInvocation) -> Option<CheckedCall> {
        self.catalog
            .classify(invocation.target)
            .and_then(Primitive::checked_call)
    }

    pub fn optimize(
        &self,
        invocation: StaticInvocation,
        context: &StaticTypeContext,
    ) -> Optimized {
        let Some(call) = self.checked_call(&invocation) else {
            return Optimized::Unchanged(invocation);
        };
        let positional = invocation.arguments.positional.len();
        assert_eq!(
            positional,
            call.arity(),
            "{call:?} called with {positional} positional arguments"
        );

        match call {
            CheckedCall::SetProperty => self.lower_set_property(invocation, context),
            CheckedCall::CallMethod
            | CheckedCall::CallMethodTrustType
            | CheckedCall::CallConstructor => self.lower_to_call_unchecked(call, invocation, context),
        }
    }

    fn lower_set_property(
        &self,
        mut invocation: StaticInvocation,
        context: &StaticTypeContext,
    ) -> Optimized {
        let value = &invocation.arguments.positional[2];
        if !self.is_interop_safe(value, context) {
            tracing::trace!("[interop] setProperty value is not interop-safe");
            return Optimized::Unchanged(invocation);
        }
        invocation.target = self.catalog.target(Primitive::SetPropertyUnchecked);
        Optimized::Unchecked(invocation)
    }

    fn lower_to_call_unchecked(
        &self,
        call: CheckedCall,
        mut invocation: StaticInvocation,
        context: &StaticTypeContext,
    ) -> Optimized {
        let Some(family) = self.catalog.unchecked_family(call) else {
            return Optimized::Unchanged(invocation);
        };
        let fixed = call.fixed_arguments();
        let Some(arity) = self.eligible_arity(&invocation.arguments.positional[fixed], context)
        else {
            return Optimized::Unchanged(invocation);
        };
        debug_assert!(arity < UNCHECKED_VARIANTS);

        let Some(arguments_list) = invocation.arguments.positional.pop() else {
            return Optimized::Unchanged(invocation);
        };
        let elements = self.unpack(arguments_list, context);
        invocation.target = family[arity];
        invocation.arguments.positional.extend(elements);
        Optimized::Unchecked(invocation)
    }

    /// Number of arguments in `arguments_list` if it can be passed to an
    /// unchecked variant.
    fn eligible_arity(
        &self,
        arguments_list: &Expression,
        context: &StaticTypeContext,
    ) -> Option<usize> {
        match arguments_list {
            Expression::StaticInvocation(inner) if self.is_list_empty(inner) => Some(0),
            Expression::ListLiteral {
                type_argument,
                expressions,
            } => {
                if expressions.len() >= UNCHECKED_VARIANTS {
                    tracing::trace!(
                        arguments = expressions.len(),
                        "[interop] argument list too long for an unchecked variant"
                    );
                    return None;
                }
                let safe = self.is_interop_safe_type(type_argument)
                    || expressions
                        .iter()
                        .all(|element| self.is_interop_safe(element, context));
                safe.then_some(expressions.len())
            }
            Expression::ConstantExpression {
                constant:
                    Constant::List {
                        type_argument,
                        entries,
                    },
                ..
            } => {
                if entries.len() >= UNCHECKED_VARIANTS {
                    return None;
                }
                let safe = self.is_interop_safe_type(type_argument)
                    || entries
                        .iter()
                        .all(|entry| self.is_interop_safe_type(&context.constant_type(entry)));
                safe.then_some(entries.len())
            }
            _ => {
                tracing::trace!("[interop] argument list is not a literal");
                None
            }
        }
    }

    /// Elements of an argument list accepted by [`Self::eligible_arity`].
    fn unpack(&self, arguments_list: Expression, context: &StaticTypeContext) -> Vec<Expression> {
        match arguments_list {
            Expression::StaticInvocation(_) => Vec::new(),
            Expression::ListLiteral { expressions, .. } => expressions,
            Expression::ConstantExpression {
                constant: Constant::List { entries, .. },
                ..
            } => entries
                .into_iter()
                .map(|entry| {
                    let ty = context.constant_type(&entry);
                    Expression::constant(entry, ty)
                })
                .collect(),
            other => panic!("unpacking an argument list that is not a literal: {other:?}"),
        }
    }

    fn is_list_empty(&self, invocation: &StaticInvocation) -> bool {
        self.catalog.classify(invocation.target) == Some(Primitive::ListEmpty)
    }

    /// A call to an allow-listed helper, or an expression whose static type
    /// is interop-safe.
    pub fn is_interop_safe(&self, expression: &Expression, context: &StaticTypeContext) -> bool {
        if let Expression::StaticInvocation(invocation) = expression {
            if self
                .catalog
                .classify(invocation.target)
                .is_some_and(Primitive::produces_interop_safe_value)
            {
                return true;
            }
        }
        self.is_interop_safe_type(&context.static_type_of(expression))
    }

    /// `Null`, or a class type other than `Object` and `Function`. Either of
    /// those two may hold a callable that must be wrapped.
    pub fn is_interop_safe_type(&self, ty: &Type) -> bool {
        match ty {
            Type::Null => true,
            Type::Interface(interface) => {
                interface.class != self.core.function && interface.class != self.core.object
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/unchecked_calls_tests.rs"]
mod tests;
