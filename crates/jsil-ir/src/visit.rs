//! Read-only traversal of function bodies.
//!
//! [`IrVisitor`] has a default no-op hook per interesting node; the `walk_*`
//! functions drive it depth-first, children after the node itself.

use crate::expr::{Expression, Statement};
use crate::node::{FunctionNode, TypeParameter, VariableDeclaration};

pub trait IrVisitor {
    fn visit_variable(&mut self, _declaration: &VariableDeclaration) {}

    fn visit_type_parameter(&mut self, _parameter: &TypeParameter) {}

    fn visit_expression(&mut self, _expression: &Expression) {}
}

pub fn walk_function<V: IrVisitor + ?Sized>(visitor: &mut V, function: &FunctionNode) {
    for parameter in &function.type_parameters {
        visitor.visit_type_parameter(parameter);
    }
    for parameter in &function.positional_parameters {
        walk_variable(visitor, parameter);
    }
    if let Some(body) = &function.body {
        walk_statement(visitor, body);
    }
}

fn walk_variable<V: IrVisitor + ?Sized>(visitor: &mut V, declaration: &VariableDeclaration) {
    visitor.visit_variable(declaration);
    if let Some(initializer) = &declaration.initializer {
        walk_expression(visitor, initializer);
    }
}

pub fn walk_statement<V: IrVisitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    match statement {
        Statement::Block(statements) => {
            for statement in statements {
                walk_statement(visitor, statement);
            }
        }
        Statement::Expression(expression) => walk_expression(visitor, expression),
        Statement::Return(expression) => {
            if let Some(expression) = expression {
                walk_expression(visitor, expression);
            }
        }
        Statement::VariableDeclaration(declaration) => walk_variable(visitor, declaration),
        Statement::If {
            condition,
            then,
            otherwise,
        } => {
            walk_expression(visitor, condition);
            walk_statement(visitor, then);
            if let Some(otherwise) = otherwise {
                walk_statement(visitor, otherwise);
            }
        }
        Statement::While { condition, body } => {
            walk_expression(visitor, condition);
            walk_statement(visitor, body);
        }
        Statement::Empty => {}
    }
}

pub fn walk_expression<V: IrVisitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    visitor.visit_expression(expression);
    match expression {
        Expression::NullLiteral
        | Expression::BoolLiteral(_)
        | Expression::IntLiteral(_)
        | Expression::DoubleLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::VariableGet { .. }
        | Expression::StaticGet { .. }
        | Expression::ConstantExpression { .. }
        | Expression::This => {}
        Expression::VariableSet { value, .. } => walk_expression(visitor, value),
        Expression::StaticInvocation(invocation) => {
            for argument in &invocation.arguments.positional {
                walk_expression(visitor, argument);
            }
        }
        Expression::InstanceGet { receiver, .. } => walk_expression(visitor, receiver),
        Expression::InstanceInvocation {
            receiver,
            arguments,
            ..
        } => {
            walk_expression(visitor, receiver);
            for argument in &arguments.positional {
                walk_expression(visitor, argument);
            }
        }
        Expression::ConstructorInvocation { arguments, .. } => {
            for argument in &arguments.positional {
                walk_expression(visitor, argument);
            }
        }
        Expression::ListLiteral { expressions, .. } => {
            for element in expressions {
                walk_expression(visitor, element);
            }
        }
        Expression::FunctionExpression(function) => walk_function(visitor, function),
        Expression::AsExpression { operand, .. } | Expression::Not(operand) => {
            walk_expression(visitor, operand);
        }
        Expression::Conditional {
            condition,
            then,
            otherwise,
            ..
        } => {
            walk_expression(visitor, condition);
            walk_expression(visitor, then);
            walk_expression(visitor, otherwise);
        }
    }
}

/// Call `f` for every variable declared in `function`, including the
/// parameters and locals of nested function expressions.
pub fn for_each_variable(function: &FunctionNode, f: impl FnMut(&VariableDeclaration)) {
    struct Variables<F>(F);

    impl<F: FnMut(&VariableDeclaration)> IrVisitor for Variables<F> {
        fn visit_variable(&mut self, declaration: &VariableDeclaration) {
            (self.0)(declaration);
        }
    }

    walk_function(&mut Variables(f), function);
}
