//! Textual rendering of IR for debugging and tests.
//!
//! The printer resolves ids to declared names up front, so printing never
//! needs to walk the program again. Unknown ids print as `#kind<n>`.

use crate::expr::{Arguments, Constant, Expression, Statement};
use crate::ids::{ClassId, InlineClassId, MemberId, TypeParameterId, VariableId};
use crate::node::{FunctionNode, Member, MemberKind, Program, TypeParameter, VariableDeclaration};
use crate::types::Type;
use crate::visit::{IrVisitor, walk_function};
use rustc_hash::FxHashMap;
use std::fmt::Write;

const INDENT: &str = "  ";

pub struct IrPrinter {
    members: FxHashMap<MemberId, String>,
    classes: FxHashMap<ClassId, String>,
    inline_classes: FxHashMap<InlineClassId, String>,
    variables: FxHashMap<VariableId, String>,
    type_parameters: FxHashMap<TypeParameterId, String>,
}

/// Collects variable and type parameter names from function bodies.
struct NameCollector<'a> {
    variables: &'a mut FxHashMap<VariableId, String>,
    type_parameters: &'a mut FxHashMap<TypeParameterId, String>,
}

impl IrVisitor for NameCollector<'_> {
    fn visit_variable(&mut self, declaration: &VariableDeclaration) {
        self.variables
            .insert(declaration.id, declaration.name.clone());
    }

    fn visit_type_parameter(&mut self, parameter: &TypeParameter) {
        self.type_parameters
            .insert(parameter.id, parameter.name.clone());
    }
}

impl IrPrinter {
    pub fn new(program: &Program) -> Self {
        let mut members = FxHashMap::default();
        let mut classes = FxHashMap::default();
        let mut inline_classes = FxHashMap::default();
        let mut variables = FxHashMap::default();
        let mut type_parameters = FxHashMap::default();

        for library in &program.libraries {
            for class in &library.classes {
                classes.insert(class.id, class.name.clone());
                for tp in &class.type_parameters {
                    type_parameters.insert(tp.id, tp.name.clone());
                }
                for member in &class.members {
                    let name = if member.name.is_empty() {
                        class.name.clone()
                    } else {
                        format!("{}.{}", class.name, member.name)
                    };
                    members.insert(member.id, name);
                }
            }
            for inline_class in &library.inline_classes {
                inline_classes.insert(inline_class.id, inline_class.name.clone());
                for tp in &inline_class.type_parameters {
                    type_parameters.insert(tp.id, tp.name.clone());
                }
            }
            for extension in &library.extensions {
                for tp in &extension.type_parameters {
                    type_parameters.insert(tp.id, tp.name.clone());
                }
            }
            for member in &library.members {
                members.insert(member.id, member.name.clone());
            }
            for member in library.all_members() {
                let mut collector = NameCollector {
                    variables: &mut variables,
                    type_parameters: &mut type_parameters,
                };
                walk_function(&mut collector, &member.function);
            }
        }

        Self {
            members,
            classes,
            inline_classes,
            variables,
            type_parameters,
        }
    }

    /// Render an expression on a single line.
    pub fn expression_to_string(&self, expression: &Expression) -> String {
        let mut out = String::new();
        self.write_expression(&mut out, expression);
        out
    }

    /// Render a statement, blocks spanning multiple lines.
    pub fn statement_to_string(&self, statement: &Statement) -> String {
        let mut out = String::new();
        self.write_statement(&mut out, statement, 0);
        out
    }

    pub fn type_to_string(&self, ty: &Type) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    /// Render a member's header and body.
    pub fn member_to_string(&self, member: &Member) -> String {
        let mut out = String::new();
        if member.is_external {
            out.push_str("external ");
        }
        if member.is_static {
            out.push_str("static ");
        }
        let keyword = match member.kind {
            MemberKind::Getter => "get ",
            MemberKind::Setter => "set ",
            MemberKind::Method => "",
            MemberKind::Operator => "operator ",
            MemberKind::Constructor => "constructor ",
            MemberKind::Factory => "factory ",
        };
        out.push_str(keyword);
        out.push_str(&member.name);
        self.write_signature(&mut out, &member.function);
        match &member.function.body {
            Some(body) => {
                out.push(' ');
                self.write_statement(&mut out, body, 0);
            }
            None => out.push(';'),
        }
        out
    }

    fn write_signature(&self, out: &mut String, function: &FunctionNode) {
        if !function.type_parameters.is_empty() {
            out.push('<');
            for (i, tp) in function.type_parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&tp.name);
            }
            out.push('>');
        }
        out.push('(');
        for (i, parameter) in function.positional_parameters.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, &parameter.ty);
            out.push(' ');
            out.push_str(&parameter.name);
        }
        out.push(')');
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn write_type(&self, out: &mut String, ty: &Type) {
        match ty {
            Type::Dynamic => out.push_str("dynamic"),
            Type::Void => out.push_str("void"),
            Type::Never => out.push_str("Never"),
            Type::Null => out.push_str("Null"),
            Type::Interface(t) => {
                out.push_str(&lookup(&self.classes, t.class, "class", t.class.0));
                self.write_type_arguments(out, &t.type_arguments);
                if t.nullable {
                    out.push('?');
                }
            }
            Type::Inline(t) => {
                out.push_str(&lookup(
                    &self.inline_classes,
                    t.inline_class,
                    "inline",
                    t.inline_class.0,
                ));
                self.write_type_arguments(out, &t.type_arguments);
                if t.nullable {
                    out.push('?');
                }
            }
            Type::Function(t) => {
                self.write_type(out, &t.return_type);
                out.push_str(" Function(");
                for (i, positional) in t.positional.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, positional);
                }
                out.push(')');
                if t.nullable {
                    out.push('?');
                }
            }
            Type::TypeParameter(t) => {
                out.push_str(&lookup(
                    &self.type_parameters,
                    t.parameter,
                    "type",
                    t.parameter.0,
                ));
                if t.nullable {
                    out.push('?');
                }
            }
        }
    }

    fn write_type_arguments(&self, out: &mut String, types: &[Type]) {
        if types.is_empty() {
            return;
        }
        out.push('<');
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, ty);
        }
        out.push('>');
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn write_expression(&self, out: &mut String, expression: &Expression) {
        match expression {
            Expression::NullLiteral => out.push_str("null"),
            Expression::BoolLiteral(value) => {
                let _ = write!(out, "{value}");
            }
            Expression::IntLiteral(value) => {
                let _ = write!(out, "{value}");
            }
            Expression::DoubleLiteral(value) => {
                let _ = write!(out, "{value:?}");
            }
            Expression::StringLiteral(value) => write_string_literal(out, value),
            Expression::VariableGet { variable, .. } => {
                out.push_str(&self.variable_name(*variable));
            }
            Expression::VariableSet { variable, value } => {
                out.push_str(&self.variable_name(*variable));
                out.push_str(" = ");
                self.write_expression(out, value);
            }
            Expression::StaticInvocation(invocation) => {
                out.push_str(&self.member_name(invocation.target));
                self.write_arguments(out, &invocation.arguments);
            }
            Expression::StaticGet { target } => out.push_str(&self.member_name(*target)),
            Expression::InstanceGet { receiver, name, .. } => {
                self.write_expression(out, receiver);
                out.push('.');
                out.push_str(name);
            }
            Expression::InstanceInvocation {
                receiver,
                name,
                arguments,
                ..
            } => {
                self.write_expression(out, receiver);
                out.push('.');
                out.push_str(name);
                self.write_arguments(out, arguments);
            }
            Expression::ConstructorInvocation {
                target, arguments, ..
            } => {
                out.push_str("new ");
                out.push_str(&self.member_name(*target));
                self.write_arguments(out, arguments);
            }
            Expression::ListLiteral {
                type_argument,
                expressions,
            } => {
                out.push('<');
                self.write_type(out, type_argument);
                out.push_str(">[");
                for (i, element) in expressions.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_expression(out, element);
                }
                out.push(']');
            }
            Expression::ConstantExpression { constant, .. } => {
                if matches!(constant, Constant::List { .. } | Constant::Instance { .. }) {
                    out.push_str("const ");
                }
                self.write_constant(out, constant);
            }
            Expression::This => out.push_str("this"),
            Expression::FunctionExpression(function) => {
                self.write_signature(out, function);
                match &function.body {
                    Some(Statement::Return(Some(value))) => {
                        out.push_str(" => ");
                        self.write_expression(out, value);
                    }
                    Some(body) => {
                        out.push(' ');
                        self.write_statement(out, body, 0);
                    }
                    None => out.push_str(" {}"),
                }
            }
            Expression::AsExpression { operand, ty } => {
                self.write_expression(out, operand);
                out.push_str(" as ");
                self.write_type(out, ty);
            }
            Expression::Conditional {
                condition,
                then,
                otherwise,
                ..
            } => {
                self.write_expression(out, condition);
                out.push_str(" ? ");
                self.write_expression(out, then);
                out.push_str(" : ");
                self.write_expression(out, otherwise);
            }
            Expression::Not(operand) => {
                out.push('!');
                self.write_expression(out, operand);
            }
        }
    }

    fn write_arguments(&self, out: &mut String, arguments: &Arguments) {
        self.write_type_arguments(out, &arguments.types);
        out.push('(');
        for (i, argument) in arguments.positional.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_expression(out, argument);
        }
        out.push(')');
    }

    fn write_constant(&self, out: &mut String, constant: &Constant) {
        match constant {
            Constant::Null => out.push_str("null"),
            Constant::Bool(value) => {
                let _ = write!(out, "{value}");
            }
            Constant::Int(value) => {
                let _ = write!(out, "{value}");
            }
            Constant::Double(value) => {
                let _ = write!(out, "{value:?}");
            }
            Constant::String(value) => write_string_literal(out, value),
            Constant::List {
                type_argument,
                entries,
            } => {
                out.push('<');
                self.write_type(out, type_argument);
                out.push_str(">[");
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_constant(out, entry);
                }
                out.push(']');
            }
            Constant::TearOff { member } => out.push_str(&self.member_name(*member)),
            Constant::Instance {
                class,
                type_arguments,
            } => {
                out.push_str(&lookup(&self.classes, *class, "class", class.0));
                self.write_type_arguments(out, type_arguments);
                out.push_str("()");
            }
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn write_statement(&self, out: &mut String, statement: &Statement, depth: usize) {
        match statement {
            Statement::Block(statements) => {
                out.push_str("{\n");
                for statement in statements {
                    push_indent(out, depth + 1);
                    self.write_statement(out, statement, depth + 1);
                    out.push('\n');
                }
                push_indent(out, depth);
                out.push('}');
            }
            Statement::Expression(expression) => {
                self.write_expression(out, expression);
                out.push(';');
            }
            Statement::Return(None) => out.push_str("return;"),
            Statement::Return(Some(expression)) => {
                out.push_str("return ");
                self.write_expression(out, expression);
                out.push(';');
            }
            Statement::VariableDeclaration(declaration) => {
                self.write_type(out, &declaration.ty);
                out.push(' ');
                out.push_str(&declaration.name);
                if let Some(initializer) = &declaration.initializer {
                    out.push_str(" = ");
                    self.write_expression(out, initializer);
                }
                out.push(';');
            }
            Statement::If {
                condition,
                then,
                otherwise,
            } => {
                out.push_str("if (");
                self.write_expression(out, condition);
                out.push_str(") ");
                self.write_statement(out, then, depth);
                if let Some(otherwise) = otherwise {
                    out.push_str(" else ");
                    self.write_statement(out, otherwise, depth);
                }
            }
            Statement::While { condition, body } => {
                out.push_str("while (");
                self.write_expression(out, condition);
                out.push_str(") ");
                self.write_statement(out, body, depth);
            }
            Statement::Empty => out.push(';'),
        }
    }

    fn member_name(&self, id: MemberId) -> String {
        lookup(&self.members, id, "member", id.0)
    }

    fn variable_name(&self, id: VariableId) -> String {
        lookup(&self.variables, id, "var", id.0)
    }
}

fn lookup<K: std::hash::Hash + Eq>(
    names: &FxHashMap<K, String>,
    key: K,
    kind: &str,
    raw: u32,
) -> String {
    match names.get(&key) {
        Some(name) => name.clone(),
        None => format!("#{kind}{raw}"),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_string_literal(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod tests;
