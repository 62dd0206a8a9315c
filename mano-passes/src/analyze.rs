//! Three-pass semantic analysis: declaration collection, type resolution,
//! validation. Every pass runs to completion regardless of the errors the
//! previous one found, so the diagnostic list is as informative as it can
//! be.

mod declare;
mod resolve;
mod validate;

use mano_parser::ast::{NodeId, Program, ScopeId, Type};
use mano_source::{ErrorReporter, Phase};

use crate::symbol::SymbolTable;

/// Analyzes `program` in place, returning whether it is well-formed along
/// with the populated symbol table and the semantic diagnostics.
pub fn analyze(program: &mut Program) -> (bool, SymbolTable, ErrorReporter) {
    let mut analyzer = Analyzer::new();
    let ok = analyzer.analyze(program);
    let (table, errors) = analyzer.into_parts();
    (ok, table, errors)
}

struct CurrentFunction {
    id: NodeId,
    name: String,
    return_type: Type,
}

pub struct Analyzer {
    table: SymbolTable,
    scope_stack: Vec<ScopeId>,
    root_scope: Option<ScopeId>,
    loop_depth: u32,
    current_function: Option<CurrentFunction>,
    errors: ErrorReporter,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            scope_stack: Vec::new(),
            root_scope: None,
            loop_depth: 0,
            current_function: None,
            errors: ErrorReporter::new(Phase::Semantic),
        }
    }

    /// Runs all three passes. Returns `true` iff no error was reported.
    pub fn analyze(&mut self, program: &mut Program) -> bool {
        self.declaration_pass(program);
        self.resolution_pass(program);
        self.validation_pass(program);
        !self.errors.has_errors()
    }

    pub fn errors(&self) -> &ErrorReporter {
        &self.errors
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn into_parts(self) -> (SymbolTable, ErrorReporter) {
        (self.table, self.errors)
    }

    /// Semantic diagnostics are phase-global: no positions survive parsing.
    fn error(&self, message: impl ToString) {
        self.errors.report(0, 0, message);
    }

    fn current_scope(&self) -> ScopeId {
        *self
            .scope_stack
            .last()
            .expect("scope stack is never empty during a walk")
    }

    /// Creates a scope under the current one and makes it current.
    fn enter_new_scope(&mut self) -> ScopeId {
        let parent = self.scope_stack.last().copied();
        let id = self.table.create_scope(parent);
        self.scope_stack.push(id);
        id
    }

    /// Re-enters a scope created by the declaration pass.
    fn reenter_scope(&mut self, id: ScopeId) {
        self.scope_stack.push(id);
    }

    /// Leaves the current scope. Storage stays alive in the arena.
    fn exit_scope(&mut self) {
        self.scope_stack.pop();
    }

    /// Identical names are compatible; two array types are compatible when
    /// their element types are. The `[]` wildcard of an empty array literal
    /// is compatible with every array type.
    fn check_type_compatibility(&self, t1: &Type, t2: &Type) -> bool {
        if t1.name == t2.name {
            return true;
        }
        if t1.is_array() && t2.is_array() {
            return match (t1.element_type(), t2.element_type()) {
                (Some(e1), Some(e2)) => {
                    e1.name.is_empty()
                        || e2.name.is_empty()
                        || self.check_type_compatibility(&e1, &e2)
                }
                _ => false,
            };
        }
        false
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
