use mano_parser::ast::{BinaryOp, Block, Callee, Expr, Stmt, UnaryOp};

use super::*;
use crate::symbol::SymbolKind;

/// Pass 2 — type resolution.
///
/// Re-enters the scopes stored by pass 1, resolves identifiers, computes
/// evaluated types bottom-up and checks type compatibility. Loop depth is
/// tracked here and written onto `break`/`continue` nodes for pass 3.
impl Analyzer {
    pub(super) fn resolution_pass(&mut self, program: &mut Program) {
        let root = self.root_scope.expect("declaration pass ran first");
        self.reenter_scope(root);
        for declaration in &mut program.declarations {
            self.resolve_stmt(declaration);
        }
        self.exit_scope();
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::VarDeclaration {
                name,
                declared_type,
                initializer,
                resolved_type,
                symbol,
                ..
            } => {
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                    if let Some(init_type) = self.expression_type(initializer) {
                        if !self.check_type_compatibility(declared_type, &init_type) {
                            self.error(format!(
                                "Type mismatch in variable '{}'. Declared: {}, Inferred: {}",
                                name, declared_type.name, init_type.name
                            ));
                        }
                    }
                }
                *resolved_type = Some(declared_type.clone());
                // the declaration point: from here on the variable is usable
                if let Some(symbol) = symbol {
                    self.table.symbol_mut(*symbol).is_reached = true;
                }
            }
            Stmt::FunDeclaration {
                body,
                function_scope,
                ..
            } => {
                let param_scope = function_scope.expect("parameter scope set by pass 1");
                self.reenter_scope(param_scope);
                self.resolve_block(body);
                self.exit_scope();
            }
            Stmt::ClassDeclaration { body, .. } => {
                let class_scope = body.scope.expect("class scope set by pass 1");
                self.reenter_scope(class_scope);
                for declaration in &mut body.declarations {
                    self.resolve_stmt(declaration);
                }
                self.exit_scope();
            }
            Stmt::EnumDeclaration { .. } => {}
            Stmt::ExprStmt(expr) => self.resolve_expr(expr),
            Stmt::Return { expr, .. } => {
                if let Some(expr) = expr {
                    self.resolve_expr(expr);
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                if let Some(ty) = self.expression_type(condition) {
                    if ty.name != "bool" {
                        self.error("If condition must be boolean");
                    }
                }
                self.resolve_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_block(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                if let Some(ty) = self.expression_type(condition) {
                    if ty.name != "bool" {
                        self.error("While condition must be boolean");
                    }
                }
                self.loop_depth += 1;
                self.resolve_block(body);
                self.loop_depth -= 1;
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                // the loop header shares the body's scope
                let scope = body.scope.expect("for scope set by pass 1");
                self.reenter_scope(scope);
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                self.resolve_expr(condition);
                if let Some(ty) = self.expression_type(condition) {
                    if ty.name != "bool" {
                        self.error("For loop condition must be boolean");
                    }
                }
                self.resolve_expr(update);
                self.loop_depth += 1;
                for statement in &mut body.statements {
                    self.resolve_stmt(statement);
                }
                self.loop_depth -= 1;
                self.exit_scope();
            }
            Stmt::Switch {
                scrutinee,
                cases,
                default,
            } => {
                self.resolve_expr(scrutinee);
                let scrutinee_type = self.expression_type(scrutinee);
                for case in cases {
                    self.resolve_expr(&mut case.value);
                    if let (Some(expected), Some(actual)) =
                        (&scrutinee_type, self.expression_type(&case.value))
                    {
                        if !self.check_type_compatibility(expected, &actual) {
                            self.error("Switch case type mismatch");
                        }
                    }
                    self.resolve_block(&mut case.body);
                }
                if let Some(default) = default {
                    self.resolve_block(default);
                }
            }
            Stmt::Break { is_inside_loop } => *is_inside_loop = self.loop_depth > 0,
            Stmt::Continue { is_inside_loop } => *is_inside_loop = self.loop_depth > 0,
        }
    }

    fn resolve_block(&mut self, block: &mut Block) {
        let scope = block.scope.expect("block scope set by pass 1");
        self.reenter_scope(scope);
        for statement in &mut block.statements {
            self.resolve_stmt(statement);
        }
        self.exit_scope();
    }

    fn resolve_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Literal { .. } => {}
            Expr::Identifier { name, symbol, ty } => {
                match self.table.lookup(self.current_scope(), name) {
                    Some(id) => {
                        let entry = self.table.symbol(id);
                        if entry.kind == SymbolKind::Variable && !entry.is_reached {
                            self.error(format!("Use of variable '{}' before declaration", name));
                        }
                        *symbol = Some(id);
                        *ty = Some(entry.ty.clone());
                    }
                    None => self.error(format!("Undefined identifier: {}", name)),
                }
            }
            Expr::Unary { operand, .. } => self.resolve_expr(operand),
            Expr::Binary { lhs, op, rhs, ty } => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);

                let left_type = self.expression_type(lhs);
                let right_type = self.expression_type(rhs);
                let (Some(left_type), Some(right_type)) = (left_type, right_type) else {
                    // a diagnostic was already reported beneath one side
                    return;
                };

                if *op == BinaryOp::Assign {
                    // the lvalue's declared type governs
                    if !self.check_type_compatibility(&left_type, &right_type) {
                        self.error("Assignment type mismatch");
                    }
                    if left_type.is_const {
                        if let Expr::Identifier { name, .. } = lhs.as_ref() {
                            self.error(format!("Cannot assign to constant: {}", name));
                        }
                    }
                    *ty = Some(left_type);
                    return;
                }

                if !self.check_type_compatibility(&left_type, &right_type) {
                    self.error("Operand type mismatch in binary expression");
                }
                *ty = Some(if op.yields_bool() {
                    Type::new("bool")
                } else {
                    left_type
                });
            }
            Expr::MemberAccess {
                object,
                member,
                symbol,
                object_ty,
            } => {
                self.resolve_expr(object);
                let Some(obj_type) = self.expression_type(object) else {
                    return;
                };
                // the object's type must name a class or an enum
                let member_scope = self
                    .table
                    .lookup(self.current_scope(), &obj_type.name)
                    .and_then(|id| self.table.symbol(id).members);
                match member_scope.and_then(|scope| self.table.lookup_local(scope, member)) {
                    Some(found) => *symbol = Some(found),
                    None => self.error(format!(
                        "Undefined member '{}' on type '{}'",
                        member, obj_type.name
                    )),
                }
                *object_ty = Some(obj_type);
            }
            Expr::IndexAccess { object, index } => {
                self.resolve_expr(object);
                self.resolve_expr(index);
                if let Some(obj_type) = self.expression_type(object) {
                    if !obj_type.is_array() {
                        self.error(format!("Cannot index non-array type '{}'", obj_type.name));
                    }
                }
                if let Some(index_type) = self.expression_type(index) {
                    if index_type.name != "int" {
                        self.error("Array index must be an integer");
                    }
                }
            }
            Expr::ArrayLiteral { elements, ty } => {
                for element in elements.iter_mut() {
                    self.resolve_expr(element);
                }
                let Some(first) = elements.first() else {
                    // the empty literal is the wildcard array
                    *ty = Some(Type::new("[]"));
                    return;
                };
                let Some(element_type) = self.expression_type(first) else {
                    return;
                };
                for element in elements.iter().skip(1) {
                    if let Some(actual) = self.expression_type(element) {
                        if !self.check_type_compatibility(&element_type, &actual) {
                            self.error("Array element type mismatch");
                        }
                    }
                }
                *ty = Some(Type::array_of(&element_type));
            }
            Expr::FnCall {
                callee,
                args,
                resolved,
            } => {
                for arg in args.iter_mut() {
                    self.resolve_expr(arg);
                }
                let mut instantiates = None;
                match callee {
                    Callee::Name(name) => {
                        match self.table.lookup(self.current_scope(), name) {
                            Some(id) => match self.table.symbol(id).kind {
                                SymbolKind::Function => *resolved = Some(id),
                                SymbolKind::Class => instantiates = Some(id),
                                _ => self.error(format!("'{}' is not a function", name)),
                            },
                            None => self.error(format!("Undefined identifier: {}", name)),
                        }
                    }
                    Callee::Target(target) => {
                        self.resolve_expr(target);
                        match target.as_ref() {
                            Expr::MemberAccess {
                                symbol: Some(member),
                                ..
                            } => {
                                if self.table.symbol(*member).kind == SymbolKind::Function {
                                    *resolved = Some(*member);
                                } else {
                                    self.error("Call target is not a function");
                                }
                            }
                            // an unresolved member was already reported
                            Expr::MemberAccess { symbol: None, .. } => {}
                            _ => self.error("Call target is not a function"),
                        }
                    }
                }
                if let Some(class_symbol) = instantiates {
                    let class = self.table.symbol(class_symbol).name.clone();
                    let args = std::mem::take(args);
                    *expr = Expr::ObjectInstantiation {
                        class,
                        args,
                        symbol: Some(class_symbol),
                    };
                }
            }
            Expr::ObjectInstantiation { args, .. } => {
                for arg in args.iter_mut() {
                    self.resolve_expr(arg);
                }
            }
        }
    }

    /// Evaluated type of a resolved expression. `None` means a diagnostic
    /// was already reported somewhere beneath it and dependent checks
    /// should be skipped rather than cascade.
    pub(super) fn expression_type(&self, expr: &Expr) -> Option<Type> {
        match expr {
            Expr::Literal { value } => Some(literal_type(value)),
            Expr::Identifier { ty, .. } => ty.clone(),
            Expr::Binary { ty, .. } => ty.clone(),
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => {
                    self.expression_type(operand)?;
                    Some(Type::new("bool"))
                }
                UnaryOp::Negate => self.expression_type(operand),
            },
            Expr::MemberAccess { symbol, .. } => {
                symbol.map(|id| self.table.symbol(id).ty.clone())
            }
            Expr::IndexAccess { object, .. } => self.expression_type(object)?.element_type(),
            Expr::ArrayLiteral { ty, .. } => ty.clone(),
            Expr::FnCall { resolved, .. } => resolved.map(|id| self.table.symbol(id).ty.clone()),
            Expr::ObjectInstantiation { class, .. } => Some(Type::new(class.clone())),
        }
    }
}

/// Literal type inference is purely syntactic on the lexeme.
fn literal_type(value: &str) -> Type {
    if value.contains('.') {
        Type::new("float")
    } else if value == "true" || value == "false" {
        Type::new("bool")
    } else if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Type::new("string")
    } else {
        Type::new("int")
    }
}
