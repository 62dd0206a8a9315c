use super::*;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(0)
    }

    /// Precedence climbing driven by [`BinaryOp::binding_power`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary_expr()?;
        // a relational operator may appear at most once per level
        let mut saw_relational = false;

        loop {
            let op = match self.current_binop() {
                Some(op) => op,
                None => break, // not a valid binop, stop parsing
            };
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break; // binds looser than the context, stop parsing
            }
            if op.is_relational() {
                if saw_relational {
                    return Err(
                        self.error_at_current("Chained relational operators are not allowed.")
                    );
                }
                saw_relational = true;
            }
            self.advance(); // eat the operator

            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
                ty: None,
            };
        }

        Ok(lhs)
    }

    fn current_binop(&self) -> Option<BinaryOp> {
        if self.check(TokenKind::Operator) {
            BinaryOp::from_lexeme(self.peek().lexeme)
        } else {
            None
        }
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        if self.check(TokenKind::Operator) {
            if let Some(op) = UnaryOp::from_lexeme(self.peek().lexeme) {
                self.advance();
                let operand = self.parse_unary_expr()?;
                return Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                });
            }
        }
        self.parse_postfix_expr()
    }

    /// Member accesses, calls and index accesses, chained left to right.
    fn parse_postfix_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            if self.eat_punctuation(".") {
                let member = self.consume_identifier("Expected member name after '.'.")?;
                expr = Expr::MemberAccess {
                    object: Box::new(expr),
                    member,
                    symbol: None,
                    object_ty: None,
                };
            } else if self.eat_punctuation("(") {
                let args = self.parse_argument_list()?;
                self.consume_punctuation(")", "Expected ')' after arguments.")?;
                let callee = match expr {
                    // a called bare name stays a name, not an identifier node
                    Expr::Identifier { name, .. } => Callee::Name(name),
                    target => Callee::Target(Box::new(target)),
                };
                expr = Expr::FnCall {
                    callee,
                    args,
                    resolved: None,
                };
            } else if self.eat_punctuation("[") {
                let index = self.parse_expr()?;
                self.consume_punctuation("]", "Expected ']' after index expression.")?;
                expr = Expr::IndexAccess {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        if self.check(TokenKind::Identifier) {
            let token = *self.advance();
            // `true` and `false` are not reserved words
            if token.lexeme == "true" || token.lexeme == "false" {
                return Ok(Expr::Literal {
                    value: token.lexeme.to_string(),
                });
            }
            return Ok(Expr::Identifier {
                name: token.lexeme.to_string(),
                symbol: None,
                ty: None,
            });
        }

        if self.check(TokenKind::Number) || self.check(TokenKind::String) {
            let token = *self.advance();
            return Ok(Expr::Literal {
                value: token.lexeme.to_string(),
            });
        }

        if self.eat_punctuation("(") {
            let expr = self.parse_expr()?;
            self.consume_punctuation(")", "Expected ')' after expression.")?;
            return Ok(expr);
        }

        if self.eat_punctuation("[") {
            if self.eat_punctuation("]") {
                return Ok(Expr::ArrayLiteral {
                    elements: Vec::new(),
                    ty: None,
                });
            }
            let elements = self.parse_expression_list()?;
            self.consume_punctuation("]", "Expected ']' after array elements.")?;
            return Ok(Expr::ArrayLiteral {
                elements,
                ty: None,
            });
        }

        Err(self.error_at_current("Expected expression."))
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check_punctuation(")") {
            args.push(self.parse_expr()?);
            while self.eat_punctuation(",") {
                args.push(self.parse_expr()?);
            }
        }
        Ok(args)
    }

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat_punctuation(",") {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }
}
