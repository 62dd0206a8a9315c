//! Visitor pattern for AST nodes.
//!
//! The `walk_*` functions encode per-variant child iteration once; visitors
//! override the `visit_*` hooks they care about and delegate the rest.

use crate::ast::{Block, Callee, Expr, Program, Stmt};

pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }
    fn visit_block(&mut self, block: &mut Block) {
        walk_block(self, block);
    }
}

pub fn walk_program(visitor: &mut impl Visitor, program: &mut Program) {
    for declaration in &mut program.declarations {
        visitor.visit_stmt(declaration);
    }
}

pub fn walk_block(visitor: &mut impl Visitor, block: &mut Block) {
    for stmt in &mut block.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt(visitor: &mut impl Visitor, stmt: &mut Stmt) {
    match stmt {
        Stmt::VarDeclaration { initializer, .. } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::FunDeclaration { body, .. } => visitor.visit_block(body),
        Stmt::ClassDeclaration { body, .. } => {
            for declaration in &mut body.declarations {
                visitor.visit_stmt(declaration);
            }
        }
        Stmt::EnumDeclaration { .. } => {}
        Stmt::ExprStmt(expr) => visitor.visit_expr(expr),
        Stmt::Return { expr, .. } => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_block(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_block(else_branch);
            }
        }
        Stmt::For {
            init,
            condition,
            update,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            visitor.visit_expr(condition);
            visitor.visit_expr(update);
            visitor.visit_block(body);
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_block(body);
        }
        Stmt::Switch {
            scrutinee,
            cases,
            default,
        } => {
            visitor.visit_expr(scrutinee);
            for case in cases {
                visitor.visit_expr(&mut case.value);
                visitor.visit_block(&mut case.body);
            }
            if let Some(default) = default {
                visitor.visit_block(default);
            }
        }
        Stmt::Break { .. } | Stmt::Continue { .. } => {}
    }
}

pub fn walk_expr(visitor: &mut impl Visitor, expr: &mut Expr) {
    match expr {
        Expr::Literal { .. } => {}
        Expr::Identifier { .. } => {}
        Expr::Binary { lhs, op: _, rhs, .. } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Unary { op: _, operand } => visitor.visit_expr(operand),
        Expr::MemberAccess { object, .. } => visitor.visit_expr(object),
        Expr::IndexAccess { object, index } => {
            visitor.visit_expr(object);
            visitor.visit_expr(index);
        }
        Expr::ArrayLiteral { elements, .. } => {
            for element in elements {
                visitor.visit_expr(element);
            }
        }
        Expr::FnCall { callee, args, .. } => {
            if let Callee::Target(target) = callee {
                visitor.visit_expr(target);
            }
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::ObjectInstantiation { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}
