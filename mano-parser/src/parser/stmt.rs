use super::*;

impl<'a> Parser<'a> {
    /// Parses a top-level or block-level declaration.
    pub(crate) fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        if self.eat_keyword("let") {
            return self.parse_variable_declaration(true);
        }
        if self.eat_keyword("var") {
            return self.parse_variable_declaration(false);
        }
        if self.eat_keyword("fun") {
            return self.parse_fun_declaration();
        }
        if self.eat_keyword("class") {
            return self.parse_class_declaration();
        }
        if self.eat_keyword("enum") {
            return self.parse_enum_declaration();
        }
        Err(self.error_at_current("Expected declaration."))
    }

    /// Rest of a variable declaration, after `let`/`var`. Consumes the
    /// trailing semicolon.
    fn parse_variable_declaration(&mut self, is_const: bool) -> ParseResult<Stmt> {
        let name = self.consume_identifier("Expected variable name.")?;
        self.consume_punctuation(":", "Expected ':' after variable name.")?;
        let declared_type = self.parse_type(is_const, true)?;
        if !self.eat_operator("=") {
            let kind = if is_const { "constant" } else { "variable" };
            return Err(self.error_at_current(format!(
                "Expected '=' after type for {} declaration.",
                kind
            )));
        }
        let initializer = self.parse_expr()?;
        self.consume_punctuation(";", "Expected ';' after variable declaration.")?;
        Ok(Stmt::VarDeclaration {
            id: self.next_id(),
            name,
            declared_type,
            initializer: Some(initializer),
            resolved_type: None,
            symbol: None,
        })
    }

    fn parse_fun_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume_identifier("Expected function name.")?;
        self.consume_punctuation("(", "Expected '(' after function name.")?;
        let mut params = Vec::new();
        if self.check(TokenKind::Identifier) {
            self.parse_parameter_list(&mut params)?;
        }
        self.consume_punctuation(")", "Expected ')' after parameters.")?;
        let return_type = if self.eat_punctuation(":") {
            Some(self.parse_type(false, true)?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Stmt::FunDeclaration {
            id: self.next_id(),
            name,
            params,
            return_type,
            body,
            symbol: None,
            function_scope: None,
        })
    }

    fn parse_parameter_list(&mut self, params: &mut Vec<Param>) -> ParseResult<()> {
        loop {
            let name = self.consume_identifier("Expected parameter name.")?;
            self.consume_punctuation(":", "Expected ':' after parameter name.")?;
            let is_const = self.eat_keyword("const");
            let ty = self.parse_type(is_const, true)?;
            params.push(Param { name, ty });
            if !self.eat_punctuation(",") {
                break;
            }
        }
        Ok(())
    }

    fn parse_class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume_identifier("Expected class name.")?;
        let body = self.parse_class_block()?;
        Ok(Stmt::ClassDeclaration {
            id: self.next_id(),
            name,
            body,
            symbol: None,
        })
    }

    fn parse_enum_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume_identifier("Expected enum name.")?;
        let members = self.parse_enum_block()?;
        Ok(Stmt::EnumDeclaration {
            id: self.next_id(),
            name,
            members,
            symbol: None,
        })
    }

    fn parse_enum_block(&mut self) -> ParseResult<Vec<String>> {
        self.consume_punctuation("{", "Expected '{' to start enum body.")?;
        let mut members = Vec::new();
        if self.eat_punctuation("}") {
            return Ok(members);
        }
        loop {
            members.push(self.consume_identifier("Expected enum member name.")?);
            if self.eat_punctuation(",") {
                // a trailing comma before the closing brace is allowed
                if self.check_punctuation("}") {
                    break;
                }
            } else {
                break;
            }
        }
        self.consume_punctuation("}", "Expected '}' to close enum body.")?;
        Ok(members)
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        self.consume_punctuation("{", "Expected '{' to start a block.")?;
        let mut statements = Vec::new();
        while !self.check_punctuation("}") {
            if self.is_at_end() {
                return Err(self.error_at_current("Expected '}' to close block."));
            }
            if self.check_declaration_keyword() {
                statements.push(self.parse_declaration()?);
            } else {
                statements.push(self.parse_statement()?);
            }
        }
        self.consume_punctuation("}", "Expected '}' to close block.")?;
        Ok(Block {
            statements,
            scope: None,
        })
    }

    fn parse_class_block(&mut self) -> ParseResult<ClassBlock> {
        self.consume_punctuation("{", "Expected '{' to start a class block.")?;
        let mut declarations = Vec::new();
        while !self.check_punctuation("}") {
            if !self.check_declaration_keyword() {
                return Err(self.error_at_current("Expected declaration."));
            }
            declarations.push(self.parse_declaration()?);
        }
        self.consume_punctuation("}", "Expected '}' to close class block.")?;
        Ok(ClassBlock {
            declarations,
            scope: None,
        })
    }

    fn check_declaration_keyword(&self) -> bool {
        ["let", "var", "fun", "class", "enum"]
            .iter()
            .any(|keyword| self.check_keyword(keyword))
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.eat_keyword("if") {
            return self.parse_if_statement();
        }
        if self.eat_keyword("for") {
            return self.parse_for_statement();
        }
        if self.eat_keyword("while") {
            return self.parse_while_statement();
        }
        if self.eat_keyword("return") {
            return self.parse_return_statement();
        }
        if self.eat_keyword("break") {
            self.consume_punctuation(";", "Expected ';' after 'break'.")?;
            return Ok(Stmt::Break {
                is_inside_loop: false,
            });
        }
        if self.eat_keyword("continue") {
            self.consume_punctuation(";", "Expected ';' after 'continue'.")?;
            return Ok(Stmt::Continue {
                is_inside_loop: false,
            });
        }
        if self.eat_keyword("switch") {
            return self.parse_switch_statement();
        }
        self.parse_expression_statement()
    }

    /// An expression in statement position must be an assignment or a call.
    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.parse_expr()?;
        let is_assignment = matches!(
            &expression,
            Expr::Binary {
                op: BinaryOp::Assign,
                ..
            }
        );
        if !is_assignment && !matches!(&expression, Expr::FnCall { .. }) {
            return Err(self.error_at_current("Expected statement."));
        }
        self.consume_punctuation(";", "Expected ';' after expression statement.")?;
        Ok(Stmt::ExprStmt(expression))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume_punctuation("(", "Expected '(' after 'if'.")?;
        let condition = self.parse_expr()?;
        self.consume_punctuation(")", "Expected ')' after if condition.")?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.eat_keyword("else") {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume_punctuation("(", "Expected '(' after 'for'.")?;
        // the initializer, when present, is a `var` declaration and eats its
        // own semicolon
        let init = if self.eat_keyword("var") {
            Some(Box::new(self.parse_variable_declaration(false)?))
        } else {
            None
        };
        let condition = self.parse_expr()?;
        self.consume_punctuation(";", "Expected ';' after for condition.")?;
        let update = self.parse_expr()?;
        self.consume_punctuation(")", "Expected ')' after for clauses.")?;
        let body = self.parse_block()?;
        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume_punctuation("(", "Expected '(' after 'while'.")?;
        let condition = self.parse_expr()?;
        self.consume_punctuation(")", "Expected ')' after while condition.")?;
        let body = self.parse_block()?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let expr = if self.check_punctuation(";") {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume_punctuation(";", "Expected ';' after return statement.")?;
        Ok(Stmt::Return {
            expr,
            enclosing_function: None,
        })
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Stmt> {
        self.consume_punctuation("(", "Expected '(' after 'switch'.")?;
        let scrutinee = self.parse_expr()?;
        self.consume_punctuation(")", "Expected ')' after switch expression.")?;
        self.consume_punctuation("{", "Expected '{' to start switch body.")?;

        let mut cases = Vec::new();
        let mut default = None;
        while !self.check_punctuation("}") {
            if self.eat_keyword("case") {
                let value = self.parse_expr()?;
                self.consume_punctuation(":", "Expected ':' after case expression.")?;
                let body = self.parse_block()?;
                cases.push(SwitchCase { value, body });
            } else if self.eat_keyword("default") {
                self.consume_punctuation(":", "Expected ':' after 'default'.")?;
                let body = self.parse_block()?;
                if default.is_some() {
                    return Err(
                        self.error_at_current("Multiple default clauses in switch statement.")
                    );
                }
                default = Some(body);
            } else {
                return Err(self.error_at_current("Expected 'case' or 'default' in switch statement."));
            }
        }
        self.consume_punctuation("}", "Expected '}' to close switch body.")?;
        Ok(Stmt::Switch {
            scrutinee,
            cases,
            default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn program(source: &str) -> Program {
        let (tokens, lex_errors) = lexer::lex(source);
        assert!(!lex_errors.has_errors(), "lex errors: {}", lex_errors);
        let mut parser = Parser::new(&tokens);
        let program = parser.parse_program().expect("program should parse");
        assert!(!parser.errors().has_errors());
        program
    }

    fn first_error(source: &str) -> String {
        let (tokens, _) = lexer::lex(source);
        let (result, errors) = parse(&tokens);
        assert!(result.is_err(), "expected a parse error for {:?}", source);
        errors.into_diagnostics()[0].message.clone()
    }

    #[test]
    fn empty_program() {
        assert!(program("").declarations.is_empty());
        assert!(program("// nothing here\n").declarations.is_empty());
    }

    #[test]
    fn let_declarations_have_const_types() {
        let ast = program("let x: int = 42;");
        assert_eq!(ast.declarations.len(), 1);
        match &ast.declarations[0] {
            Stmt::VarDeclaration {
                name,
                declared_type,
                initializer,
                ..
            } => {
                assert_eq!(name, "x");
                assert_eq!(declared_type.name, "int");
                assert!(declared_type.is_const);
                assert!(matches!(
                    initializer,
                    Some(Expr::Literal { value }) if value == "42"
                ));
            }
            other => panic!("expected a variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn var_declarations_have_mutable_types() {
        let ast = program("var total: float = 0.0;");
        match &ast.declarations[0] {
            Stmt::VarDeclaration { declared_type, .. } => {
                assert_eq!(declared_type.name, "float");
                assert!(!declared_type.is_const);
            }
            other => panic!("expected a variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn array_types_are_bracketed_names() {
        let ast = program("var xs: [int] = [];");
        match &ast.declarations[0] {
            Stmt::VarDeclaration {
                declared_type,
                initializer,
                ..
            } => {
                assert_eq!(declared_type.name, "[int]");
                assert!(declared_type.is_array());
                assert!(matches!(
                    initializer,
                    Some(Expr::ArrayLiteral { elements, .. }) if elements.is_empty()
                ));
            }
            other => panic!("expected a variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn nested_array_types_are_rejected() {
        assert_eq!(
            first_error("var xs: [[int]] = [];"),
            "Nested arrays not supported."
        );
    }

    #[test]
    fn function_declarations() {
        let ast = program("fun add(a: int, b: const int): int { return a + b; }");
        match &ast.declarations[0] {
            Stmt::FunDeclaration {
                name,
                params,
                return_type,
                body,
                ..
            } => {
                assert_eq!(name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(params[0].name, "a");
                assert!(!params[0].ty.is_const);
                assert_eq!(params[1].name, "b");
                assert!(params[1].ty.is_const);
                assert_eq!(return_type.as_ref().unwrap().name, "int");
                assert_eq!(body.statements.len(), 1);
                assert!(matches!(&body.statements[0], Stmt::Return { expr: Some(_), .. }));
            }
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn function_without_return_type_or_params() {
        let ast = program("fun noop() {}");
        match &ast.declarations[0] {
            Stmt::FunDeclaration {
                params,
                return_type,
                body,
                ..
            } => {
                assert!(params.is_empty());
                assert!(return_type.is_none());
                assert!(body.statements.is_empty());
            }
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn class_declarations_hold_only_declarations() {
        let ast = program(
            "class Point {\n    var x: int = 0;\n    fun get_x(): int { return x; }\n}",
        );
        match &ast.declarations[0] {
            Stmt::ClassDeclaration { name, body, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(body.declarations.len(), 2);
            }
            other => panic!("expected a class declaration, got {:?}", other),
        }
        assert_eq!(
            first_error("class Bad { return 1; }"),
            "Expected declaration."
        );
    }

    #[test]
    fn enum_declarations() {
        let ast = program("enum Color { Red, Green, Blue }");
        match &ast.declarations[0] {
            Stmt::EnumDeclaration { name, members, .. } => {
                assert_eq!(name, "Color");
                assert_eq!(members, &["Red", "Green", "Blue"]);
            }
            other => panic!("expected an enum declaration, got {:?}", other),
        }
    }

    #[test]
    fn enum_bodies_allow_trailing_commas_and_emptiness() {
        match &program("enum E { A, B, }").declarations[0] {
            Stmt::EnumDeclaration { members, .. } => assert_eq!(members, &["A", "B"]),
            other => panic!("expected an enum declaration, got {:?}", other),
        }
        match &program("enum Empty {}").declarations[0] {
            Stmt::EnumDeclaration { members, .. } => assert!(members.is_empty()),
            other => panic!("expected an enum declaration, got {:?}", other),
        }
    }

    #[test]
    fn if_with_optional_else() {
        let ast = program("fun f(flag: bool) { if (flag) { } else { } if (flag) { } }");
        match &ast.declarations[0] {
            Stmt::FunDeclaration { body, .. } => {
                assert!(matches!(
                    &body.statements[0],
                    Stmt::If { else_branch: Some(_), .. }
                ));
                assert!(matches!(
                    &body.statements[1],
                    Stmt::If { else_branch: None, .. }
                ));
            }
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn for_loops_with_and_without_initializer() {
        let ast = program(
            "fun f(n: int) {\n    for (var i: int = 0; i < n; i = i + 1) { }\n    for (n < 10; n = n + 1) { }\n}",
        );
        match &ast.declarations[0] {
            Stmt::FunDeclaration { body, .. } => {
                assert!(matches!(&body.statements[0], Stmt::For { init: Some(_), .. }));
                assert!(matches!(&body.statements[1], Stmt::For { init: None, .. }));
            }
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn while_break_continue() {
        let ast = program("fun f() { while (true) { break; continue; } }");
        match &ast.declarations[0] {
            Stmt::FunDeclaration { body, .. } => match &body.statements[0] {
                Stmt::While { body, .. } => {
                    assert!(matches!(&body.statements[0], Stmt::Break { .. }));
                    assert!(matches!(&body.statements[1], Stmt::Continue { .. }));
                }
                other => panic!("expected a while statement, got {:?}", other),
            },
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn switch_statements() {
        let ast = program(
            "fun f(x: int) { switch (x) { case 1: { } case 2: { } default: { } } }",
        );
        match &ast.declarations[0] {
            Stmt::FunDeclaration { body, .. } => match &body.statements[0] {
                Stmt::Switch { cases, default, .. } => {
                    assert_eq!(cases.len(), 2);
                    assert!(default.is_some());
                }
                other => panic!("expected a switch statement, got {:?}", other),
            },
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn multiple_default_clauses_are_rejected() {
        assert_eq!(
            first_error("fun f(x: int) { switch (x) { default: { } default: { } } }"),
            "Multiple default clauses in switch statement."
        );
    }

    #[test]
    fn expression_statements_must_be_assignments_or_calls() {
        let ast = program("fun f(x: int) { x = 1; f(x); }");
        match &ast.declarations[0] {
            Stmt::FunDeclaration { body, .. } => {
                assert!(matches!(
                    &body.statements[0],
                    Stmt::ExprStmt(Expr::Binary { op: BinaryOp::Assign, .. })
                ));
                assert!(matches!(&body.statements[1], Stmt::ExprStmt(Expr::FnCall { .. })));
            }
            other => panic!("expected a function declaration, got {:?}", other),
        }
        assert_eq!(first_error("fun f(x: int) { x + 1; }"), "Expected statement.");
    }

    #[test]
    fn return_with_and_without_value() {
        let ast = program("fun f(): int { return 1; }\nfun g() { return; }");
        match &ast.declarations[1] {
            Stmt::FunDeclaration { body, .. } => {
                assert!(matches!(&body.statements[0], Stmt::Return { expr: None, .. }));
            }
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn statements_outside_declarations_are_rejected_at_top_level() {
        assert_eq!(first_error("return 1;"), "Expected declaration.");
    }

    #[test]
    fn missing_semicolon_is_reported_with_position() {
        let (tokens, _) = lexer::lex("let x: int = 1");
        let (result, errors) = parse(&tokens);
        assert!(result.is_err());
        let diagnostics = errors.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Expected ';' after variable declaration."
        );
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (1, 15));
    }

    #[test]
    fn parsing_is_deterministic() {
        let source = "fun f(x: int): int { return x * (x + 1); }";
        assert_eq!(program(source), program(source));
    }
}
