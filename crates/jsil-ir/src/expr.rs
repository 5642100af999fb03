//! Expressions, statements and constants.
//!
//! The IR is an owned tree: every node owns its children, and references to
//! declarations go through ids. Passes rewrite nodes in place by replacing the
//! value behind a `&mut Expression`.

use crate::ids::{ClassId, MemberId, VariableId};
use crate::node::{FunctionNode, VariableDeclaration};
use crate::types::Type;

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    NullLiteral,
    BoolLiteral(bool),
    IntLiteral(i64),
    DoubleLiteral(f64),
    StringLiteral(String),

    /// Read of a local variable or parameter.
    VariableGet {
        variable: VariableId,
        /// Type promoted by flow analysis, if narrower than the declared type.
        promoted_type: Option<Type>,
    },

    /// Assignment to a local variable or parameter.
    VariableSet {
        variable: VariableId,
        value: Box<Self>,
    },

    /// Call of a top-level or static procedure.
    StaticInvocation(StaticInvocation),

    /// Read of a top-level or static getter.
    StaticGet { target: MemberId },

    /// Property read on a receiver.
    InstanceGet {
        receiver: Box<Self>,
        name: String,
        interface_target: Option<MemberId>,
        result_type: Type,
    },

    /// Method call on a receiver.
    InstanceInvocation {
        receiver: Box<Self>,
        name: String,
        arguments: Arguments,
        interface_target: Option<MemberId>,
        result_type: Type,
    },

    /// Generative constructor call.
    ConstructorInvocation {
        target: MemberId,
        class: ClassId,
        arguments: Arguments,
    },

    /// Non-constant list literal: `<T>[a, b, c]`
    ListLiteral {
        type_argument: Type,
        expressions: Vec<Self>,
    },

    /// Reference to an evaluated constant.
    ConstantExpression { constant: Constant, ty: Type },

    This,

    FunctionExpression(Box<FunctionNode>),

    /// Checked cast: `operand as ty`
    AsExpression { operand: Box<Self>, ty: Type },

    /// `condition ? then : otherwise`
    Conditional {
        condition: Box<Self>,
        then: Box<Self>,
        otherwise: Box<Self>,
        static_type: Type,
    },

    /// `!operand`
    Not(Box<Self>),
}

/// Call of a top-level or static procedure with explicit type arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticInvocation {
    pub target: MemberId,
    pub arguments: Arguments,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    pub types: Vec<Type>,
    pub positional: Vec<Expression>,
}

impl Arguments {
    pub fn new(positional: Vec<Expression>) -> Self {
        Self {
            types: Vec::new(),
            positional,
        }
    }

    pub fn with_types(types: Vec<Type>, positional: Vec<Expression>) -> Self {
        Self { types, positional }
    }
}

// =============================================================================
// Constants
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List {
        type_argument: Type,
        entries: Vec<Self>,
    },
    /// Tear-off of a top-level or static procedure.
    TearOff { member: MemberId },
    /// Instance of a constant class.
    Instance {
        class: ClassId,
        type_arguments: Vec<Type>,
    },
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Vec<Self>),
    Expression(Expression),
    Return(Option<Expression>),
    VariableDeclaration(VariableDeclaration),
    If {
        condition: Expression,
        then: Box<Self>,
        otherwise: Option<Box<Self>>,
    },
    While {
        condition: Expression,
        body: Box<Self>,
    },
    Empty,
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl Expression {
    /// Create a string literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    /// Create a read of `variable` at its declared type
    pub const fn get(variable: VariableId) -> Self {
        Self::VariableGet {
            variable,
            promoted_type: None,
        }
    }

    /// Create a static call without type arguments
    pub fn call(target: MemberId, positional: Vec<Self>) -> Self {
        Self::StaticInvocation(StaticInvocation {
            target,
            arguments: Arguments::new(positional),
        })
    }

    /// Create a static call with type arguments
    pub fn call_generic(target: MemberId, types: Vec<Type>, positional: Vec<Self>) -> Self {
        Self::StaticInvocation(StaticInvocation {
            target,
            arguments: Arguments::with_types(types, positional),
        })
    }

    /// Create a list literal
    pub const fn list(type_argument: Type, expressions: Vec<Self>) -> Self {
        Self::ListLiteral {
            type_argument,
            expressions,
        }
    }

    /// Create a constant expression
    pub const fn constant(constant: Constant, ty: Type) -> Self {
        Self::ConstantExpression { constant, ty }
    }

    /// Create a function expression
    pub fn function(function: FunctionNode) -> Self {
        Self::FunctionExpression(Box::new(function))
    }

    /// The static invocation in this node, if it is one
    pub fn as_static_invocation(&self) -> Option<&StaticInvocation> {
        match self {
            Self::StaticInvocation(invocation) => Some(invocation),
            _ => None,
        }
    }
}

impl Statement {
    /// Create a return statement
    pub const fn ret(expression: Expression) -> Self {
        Self::Return(Some(expression))
    }

    /// Create a block
    pub const fn block(statements: Vec<Self>) -> Self {
        Self::Block(statements)
    }

    /// Create an expression statement
    pub const fn expr(expression: Expression) -> Self {
        Self::Expression(expression)
    }
}
