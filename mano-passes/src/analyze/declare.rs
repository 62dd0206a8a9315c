use mano_parser::ast::{Block, Stmt};

use super::*;
use crate::symbol::{Symbol, SymbolKind};

/// Pass 1 — declaration collection.
///
/// Creates every scope (program, class blocks, function parameter and body
/// scopes, plain blocks), stores the scope ids on their nodes, and binds a
/// symbol for each declaration in the scope that introduces it. Initializer
/// expressions are not typed yet.
impl Analyzer {
    pub(super) fn declaration_pass(&mut self, program: &mut Program) {
        let root = self.enter_new_scope();
        self.root_scope = Some(root);
        for declaration in &mut program.declarations {
            self.declare_stmt(declaration);
        }
        self.exit_scope();
    }

    fn declare_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::VarDeclaration {
                id,
                name,
                declared_type,
                initializer,
                symbol,
                ..
            } => {
                let scope = self.current_scope();
                let entry = Symbol {
                    kind: SymbolKind::Variable,
                    name: name.clone(),
                    ty: declared_type.clone(),
                    scope,
                    declaration: Some(*id),
                    is_initialized: initializer.is_some(),
                    is_reached: false,
                    members: None,
                };
                match self.table.insert(scope, entry) {
                    Ok(bound) => *symbol = Some(bound),
                    Err(_) => self.error(format!("Duplicate variable declaration: {}", name)),
                }
            }
            Stmt::FunDeclaration {
                id,
                name,
                params,
                return_type,
                body,
                symbol,
                function_scope,
            } => {
                let scope = self.current_scope();
                let entry = Symbol {
                    kind: SymbolKind::Function,
                    name: name.clone(),
                    ty: return_type.clone().unwrap_or_else(Type::void),
                    scope,
                    declaration: Some(*id),
                    is_initialized: true,
                    is_reached: true,
                    members: None,
                };
                match self.table.insert(scope, entry) {
                    Ok(bound) => *symbol = Some(bound),
                    Err(_) => self.error(format!("Duplicate declaration: {}", name)),
                }

                // parameter scope, with the body scope nested inside it
                let param_scope = self.enter_new_scope();
                *function_scope = Some(param_scope);
                for param in params.iter() {
                    let entry = Symbol {
                        kind: SymbolKind::Variable,
                        name: param.name.clone(),
                        ty: param.ty.clone(),
                        scope: param_scope,
                        declaration: Some(*id),
                        is_initialized: true,
                        is_reached: true,
                        members: None,
                    };
                    if self.table.insert(param_scope, entry).is_err() {
                        self.error(format!("Duplicate variable declaration: {}", param.name));
                    }
                }
                self.declare_block(body);
                self.exit_scope();
            }
            Stmt::ClassDeclaration {
                id, name, body, symbol, ..
            } => {
                let scope = self.current_scope();
                let entry = Symbol {
                    kind: SymbolKind::Class,
                    name: name.clone(),
                    ty: Type::new(name.clone()),
                    scope,
                    declaration: Some(*id),
                    is_initialized: true,
                    is_reached: true,
                    members: None,
                };
                let bound = match self.table.insert(scope, entry) {
                    Ok(bound) => {
                        *symbol = Some(bound);
                        Some(bound)
                    }
                    Err(_) => {
                        self.error(format!("Duplicate declaration: {}", name));
                        None
                    }
                };

                let class_scope = self.enter_new_scope();
                body.scope = Some(class_scope);
                if let Some(bound) = bound {
                    self.table.symbol_mut(bound).members = Some(class_scope);
                }
                for declaration in &mut body.declarations {
                    self.declare_stmt(declaration);
                }
                self.exit_scope();
            }
            Stmt::EnumDeclaration {
                id,
                name,
                members,
                symbol,
            } => {
                let scope = self.current_scope();
                let entry = Symbol {
                    kind: SymbolKind::Enum,
                    name: name.clone(),
                    ty: Type::new(name.clone()),
                    scope,
                    declaration: Some(*id),
                    is_initialized: true,
                    is_reached: true,
                    members: None,
                };
                let bound = match self.table.insert(scope, entry) {
                    Ok(bound) => {
                        *symbol = Some(bound);
                        Some(bound)
                    }
                    Err(_) => {
                        self.error(format!("Duplicate declaration: {}", name));
                        None
                    }
                };

                // members are constants of the enum's own type
                let member_scope = self.enter_new_scope();
                for member in members.iter() {
                    let entry = Symbol {
                        kind: SymbolKind::Variable,
                        name: member.clone(),
                        ty: Type::constant(name.clone()),
                        scope: member_scope,
                        declaration: Some(*id),
                        is_initialized: true,
                        is_reached: true,
                        members: None,
                    };
                    if self.table.insert(member_scope, entry).is_err() {
                        self.error(format!("Duplicate enum member: {}", member));
                    }
                }
                self.exit_scope();
                if let Some(bound) = bound {
                    self.table.symbol_mut(bound).members = Some(member_scope);
                }
            }
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.declare_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.declare_block(else_branch);
                }
            }
            Stmt::For { init, body, .. } => {
                // the induction variable lives in the body's scope
                let scope = self.enter_new_scope();
                body.scope = Some(scope);
                if let Some(init) = init {
                    self.declare_stmt(init);
                }
                for statement in &mut body.statements {
                    self.declare_stmt(statement);
                }
                self.exit_scope();
            }
            Stmt::While { body, .. } => self.declare_block(body),
            Stmt::Switch { cases, default, .. } => {
                for case in cases {
                    self.declare_block(&mut case.body);
                }
                if let Some(default) = default {
                    self.declare_block(default);
                }
            }
            Stmt::ExprStmt(_) | Stmt::Return { .. } | Stmt::Break { .. } | Stmt::Continue { .. } => {}
        }
    }

    fn declare_block(&mut self, block: &mut Block) {
        let scope = self.enter_new_scope();
        block.scope = Some(scope);
        for statement in &mut block.statements {
            self.declare_stmt(statement);
        }
        self.exit_scope();
    }
}
