use mano_parser::ast::{Block, Stmt};
use mano_parser::visitor::{walk_stmt, Visitor};

use super::*;

/// Pass 3 — control-flow validation.
///
/// Checks returns against the enclosing function, loop control against the
/// loop depth recorded by pass 2, and return coverage of non-void
/// functions.
impl Analyzer {
    pub(super) fn validation_pass(&mut self, program: &mut Program) {
        for declaration in &mut program.declarations {
            self.validate_stmt(declaration);
        }
    }

    fn validate_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::FunDeclaration {
                id,
                name,
                return_type,
                body,
                ..
            } => {
                let return_type = return_type.clone().unwrap_or_else(Type::void);
                let enclosing = self.current_function.replace(CurrentFunction {
                    id: *id,
                    name: name.clone(),
                    return_type: return_type.clone(),
                });
                self.validate_block(body);
                self.current_function = enclosing;

                if return_type.name != "void" && !contains_return(body) {
                    self.error(format!(
                        "Function '{}' with return type '{}' lacks return statement",
                        name, return_type.name
                    ));
                }
            }
            Stmt::Return {
                expr,
                enclosing_function,
            } => {
                let Some(function) = &self.current_function else {
                    self.error("Return statement outside function");
                    return;
                };
                *enclosing_function = Some(function.id);

                let returned = match expr {
                    Some(expr) => match self.expression_type(expr) {
                        Some(ty) => ty,
                        // already reported during resolution
                        None => return,
                    },
                    None => Type::void(),
                };
                if !self.check_type_compatibility(&function.return_type, &returned) {
                    self.error(format!("Return type mismatch in function {}", function.name));
                }
            }
            Stmt::Break { is_inside_loop } => {
                if !*is_inside_loop {
                    self.error("Break statement outside loop");
                }
            }
            Stmt::Continue { is_inside_loop } => {
                if !*is_inside_loop {
                    self.error("Continue statement outside loop");
                }
            }
            Stmt::ClassDeclaration { body, .. } => {
                for declaration in &mut body.declarations {
                    self.validate_stmt(declaration);
                }
            }
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.validate_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.validate_block(else_branch);
                }
            }
            Stmt::For { body, .. } | Stmt::While { body, .. } => self.validate_block(body),
            Stmt::Switch { cases, default, .. } => {
                for case in cases {
                    self.validate_block(&mut case.body);
                }
                if let Some(default) = default {
                    self.validate_block(default);
                }
            }
            Stmt::VarDeclaration { .. }
            | Stmt::EnumDeclaration { .. }
            | Stmt::ExprStmt(_) => {}
        }
    }

    fn validate_block(&mut self, block: &mut Block) {
        for statement in &mut block.statements {
            self.validate_stmt(statement);
        }
    }
}

/// Any-path return coverage: one `return` anywhere in the body satisfies
/// the check. Nested function declarations are their own worlds and are
/// skipped.
fn contains_return(body: &mut Block) -> bool {
    struct ReturnSearch {
        found: bool,
    }

    impl Visitor for ReturnSearch {
        fn visit_stmt(&mut self, stmt: &mut Stmt) {
            match stmt {
                Stmt::Return { .. } => self.found = true,
                Stmt::FunDeclaration { .. } => {}
                _ => {
                    if !self.found {
                        walk_stmt(self, stmt);
                    }
                }
            }
        }
    }

    let mut search = ReturnSearch { found: false };
    search.visit_block(body);
    search.found
}
