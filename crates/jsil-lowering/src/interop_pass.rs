//! Interop lowering pass driver.
//!
//! The pass walks each library once, top-down:
//!
//! - entering a library builds its [`MemberIndex`] and pushes a library
//!   type scope;
//! - entering a member pushes a member type scope. An external interop
//!   member gets a synthesized body, loses its external flag, and is not
//!   walked any further;
//! - every other member body is walked, and each checked primitive call is
//!   offered to the [`UncheckedCallOptimizer`] before its own arguments are
//!   walked.
//!
//! Program-wide facts, the catalog and the options are read-only and may be
//! shared by library traversals running on different threads. The member
//! index and the type context belong to a single traversal.

use crate::body_synthesis::BodySynthesizer;
use crate::catalog::{CatalogError, CheckedCall, CoreTypes, InteropCatalog};
use crate::js_names::JsNameResolver;
use crate::member_index::MemberIndex;
use crate::options::LoweringOptions;
use crate::program_facts::ProgramFacts;
use crate::static_type_context::StaticTypeContext;
use crate::unchecked_calls::{Optimized, UncheckedCallOptimizer};
use jsil_ir::node::{FunctionNode, Library, Member, Program};
use jsil_ir::{Arguments, Expression, Statement, StaticInvocation};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

/// Maximum expression nesting the traversal descends into. Deeper
/// subexpressions are left as they are.
const MAX_EXPRESSION_DEPTH: u32 = 500;

/// Counts of what the pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoweringStats {
    /// External members given a synthesized body.
    pub members_lowered: usize,
    /// Checked primitive calls rewritten to unchecked variants.
    pub calls_optimized: usize,
    /// Checked primitive calls the optimizer had to leave alone.
    pub calls_left_checked: usize,
}

impl LoweringStats {
    pub fn merge(&mut self, other: Self) {
        self.members_lowered += other.members_lowered;
        self.calls_optimized += other.calls_optimized;
        self.calls_left_checked += other.calls_left_checked;
    }

    fn record(&mut self, optimized: bool) {
        if optimized {
            self.calls_optimized += 1;
        } else {
            self.calls_left_checked += 1;
        }
    }
}

/// The interop lowering pass, resolved against one program.
#[derive(Debug)]
pub struct InteropLowering {
    facts: Arc<ProgramFacts>,
    core: CoreTypes,
    catalog: InteropCatalog,
    options: LoweringOptions,
}

impl InteropLowering {
    /// Resolve the primitive catalog and collect program facts.
    ///
    /// Fails when `program` lacks the SDK declarations the pass targets.
    pub fn new(program: &Program, options: LoweringOptions) -> Result<Self, CatalogError> {
        let catalog = InteropCatalog::resolve(program)?;
        let core = CoreTypes::resolve(program)?;
        let facts = Arc::new(ProgramFacts::collect(program));
        Ok(Self {
            facts,
            core,
            catalog,
            options,
        })
    }

    /// The resolved primitive catalog the pass rewrites against.
    pub fn catalog(&self) -> &InteropCatalog {
        &self.catalog
    }

    /// Lower and optimize one library in place.
    pub fn transform_library(&self, library: &mut Library) -> LoweringStats {
        let index = MemberIndex::build(library, &self.facts);
        tracing::debug!(
            library = %library.import_uri,
            extension_members = index.extension_member_count(),
            inline_members = index.inline_member_count(),
            "[interop] transforming library"
        );

        let mut transformer = LibraryTransformer {
            lowering: self,
            index,
            context: StaticTypeContext::new(Arc::clone(&self.facts), self.core),
            optimizer: UncheckedCallOptimizer::new(&self.catalog, &self.core),
            stats: LoweringStats::default(),
            lowered: Vec::new(),
            visit_depth: 0,
        };
        transformer.transform_library(library);

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                "[interop] library={} lowered members: {:?}",
                library.import_uri,
                transformer.lowered
            );
        }
        transformer.stats
    }

    /// Lower every library of `program`, one after another.
    pub fn transform_program(&self, program: &mut Program) -> LoweringStats {
        let mut stats = LoweringStats::default();
        for library in &mut program.libraries {
            stats.merge(self.transform_library(library));
        }
        tracing::debug!(?stats, "[interop] program transformed");
        stats
    }

    /// Lower every library of `program` on the rayon thread pool. The result
    /// is identical to [`Self::transform_program`].
    pub fn transform_program_parallel(&self, program: &mut Program) -> LoweringStats {
        let stats = program
            .libraries
            .par_iter_mut()
            .map(|library| self.transform_library(library))
            .reduce(LoweringStats::default, |mut total, stats| {
                total.merge(stats);
                total
            });
        tracing::debug!(?stats, "[interop] program transformed in parallel");
        stats
    }
}

/// State of the traversal of a single library.
struct LibraryTransformer<'a> {
    lowering: &'a InteropLowering,
    index: MemberIndex,
    context: StaticTypeContext,
    optimizer: UncheckedCallOptimizer<'a>,
    stats: LoweringStats,
    /// Names of lowered members, for logging.
    lowered: Vec<String>,
    /// Current expression depth for stack overflow protection
    visit_depth: u32,
}

impl LibraryTransformer<'_> {
    fn transform_library(&mut self, library: &mut Library) {
        self.context.enter_library(library.id);
        for member in &mut library.members {
            self.transform_member(member);
        }
        for class in &mut library.classes {
            for member in &mut class.members {
                self.transform_member(member);
            }
        }
        self.context.leave_library(library.id);
    }

    fn transform_member(&mut self, member: &mut Member) {
        self.context.enter_member(member);

        let synthesized = if self.lowering.options.lower_external_members {
            let optimizer = self
                .lowering
                .options
                .optimize_unchecked_calls
                .then_some(&self.optimizer);
            let names = JsNameResolver::new(
                &self.lowering.facts,
                &self.index,
                &self.lowering.options,
            );
            BodySynthesizer::new(&self.lowering.catalog, &self.index, names, optimizer)
                .synthesize(member, &self.context)
        } else {
            None
        };

        match synthesized {
            Some(synthesized) => {
                tracing::trace!(member = %member.name, "[interop] lowered external member");
                member.function.body = Some(synthesized.body);
                member.is_external = false;
                self.stats.members_lowered += 1;
                if let Some(optimized) = synthesized.optimized {
                    self.stats.record(optimized);
                }
                self.lowered.push(member.name.clone());
            }
            None => self.transform_function(&mut member.function),
        }

        self.context.leave_member(member.id);
    }

    fn transform_function(&mut self, function: &mut FunctionNode) {
        for parameter in &mut function.positional_parameters {
            if let Some(initializer) = &mut parameter.initializer {
                self.transform_expression(initializer);
            }
        }
        if let Some(body) = &mut function.body {
            self.transform_statement(body);
        }
    }

    fn transform_statement(&mut self, statement: &mut Statement) {
        match statement {
            Statement::Block(statements) => {
                for statement in statements {
                    self.transform_statement(statement);
                }
            }
            Statement::Expression(expression) => self.transform_expression(expression),
            Statement::Return(expression) => {
                if let Some(expression) = expression {
                    self.transform_expression(expression);
                }
            }
            Statement::VariableDeclaration(declaration) => {
                if let Some(initializer) = &mut declaration.initializer {
                    self.transform_expression(initializer);
                }
            }
            Statement::If {
                condition,
                then,
                otherwise,
            } => {
                self.transform_expression(condition);
                self.transform_statement(then);
                if let Some(otherwise) = otherwise {
                    self.transform_statement(otherwise);
                }
            }
            Statement::While { condition, body } => {
                self.transform_expression(condition);
                self.transform_statement(body);
            }
            Statement::Empty => {}
        }
    }

    fn transform_expression(&mut self, expression: &mut Expression) {
        // Stack overflow protection: limit recursion depth
        if self.visit_depth >= MAX_EXPRESSION_DEPTH {
            return;
        }
        self.visit_depth += 1;

        match expression {
            Expression::StaticInvocation(invocation) => {
                self.optimize_invocation(invocation);
                self.transform_arguments(&mut invocation.arguments);
            }
            Expression::VariableSet { value, .. } => self.transform_expression(value),
            Expression::InstanceGet { receiver, .. } => self.transform_expression(receiver),
            Expression::InstanceInvocation {
                receiver,
                arguments,
                ..
            } => {
                self.transform_expression(receiver);
                self.transform_arguments(arguments);
            }
            Expression::ConstructorInvocation { arguments, .. } => {
                self.transform_arguments(arguments);
            }
            Expression::ListLiteral { expressions, .. } => {
                for element in expressions {
                    self.transform_expression(element);
                }
            }
            Expression::FunctionExpression(function) => self.transform_function(function),
            Expression::AsExpression { operand, .. } | Expression::Not(operand) => {
                self.transform_expression(operand);
            }
            Expression::Conditional {
                condition,
                then,
                otherwise,
                ..
            } => {
                self.transform_expression(condition);
                self.transform_expression(then);
                self.transform_expression(otherwise);
            }
            Expression::NullLiteral
            | Expression::BoolLiteral(_)
            | Expression::IntLiteral(_)
            | Expression::DoubleLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::VariableGet { .. }
            | Expression::StaticGet { .. }
            | Expression::ConstantExpression { .. }
            | Expression::This => {}
        }

        self.visit_depth -= 1;
    }

    fn transform_arguments(&mut self, arguments: &mut Arguments) {
        for argument in &mut arguments.positional {
            self.transform_expression(argument);
        }
    }

    /// Replace a checked primitive call with its unchecked variant when
    /// the optimizer can prove it safe.
    ///
    /// Calls written in user code never trust types; only synthesized
    /// bodies reach the trust-type family.
    fn optimize_invocation(&mut self, invocation: &mut StaticInvocation) {
        if !self.lowering.options.optimize_unchecked_calls {
            return;
        }
        match self.optimizer.checked_call(invocation) {
            Some(CheckedCall::SetProperty | CheckedCall::CallMethod | CheckedCall::CallConstructor) => {}
            Some(CheckedCall::CallMethodTrustType) | None => return,
        }
        let placeholder = StaticInvocation {
            target: invocation.target,
            arguments: Arguments::default(),
        };
        let taken = std::mem::replace(invocation, placeholder);
        let result = self.optimizer.optimize(taken, &self.context);
        self.stats.record(result.is_unchecked());
        *invocation = match result {
            Optimized::Unchecked(rewritten) => {
                debug_assert!(self.lowering.catalog.is_unchecked_target(rewritten.target));
                rewritten
            }
            Optimized::Unchanged(original) => original,
        };
    }
}

#[cfg(test)]
#[path = "tests/interop_pass_tests.rs"]
mod tests;
