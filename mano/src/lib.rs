//! Front-end pipeline for the Mano language: lexer, recursive-descent
//! parser and three-pass semantic analyzer, chained over a shared
//! diagnostic model.

use log::debug;
use mano_parser::ast::Program;
use mano_parser::lexer;
use mano_parser::parser;
use mano_parser::token::{Token, TokenKind};
use mano_passes::analyze;
use mano_passes::symbol::SymbolTable;
use mano_source::{Diagnostic, Severity};

/// Everything the front end produced for one source string.
pub struct Compilation<'a> {
    /// The full token stream, terminated by `EndOfFile`.
    pub tokens: Vec<Token<'a>>,
    /// The annotated tree, when parsing succeeded.
    pub program: Option<Program>,
    /// Scopes and symbols, when analysis ran.
    pub symbols: Option<SymbolTable>,
    diagnostics: Vec<Diagnostic>,
}

impl Compilation<'_> {
    /// True when no phase reported an error-severity diagnostic.
    pub fn succeeded(&self) -> bool {
        self.diagnostics
            .iter()
            .all(|diagnostic| diagnostic.severity != Severity::Error)
    }

    /// All diagnostics in phase order: lexer, then parser, then semantic.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Runs the three-stage pipeline over `source`.
///
/// Lexing always runs to completion; its errors are non-fatal. The parser
/// runs when the token stream holds anything besides the end-of-file
/// marker, and aborts on its first error. Analysis only runs over a
/// successfully parsed program and always finishes all three passes.
pub fn compile(source: &str) -> Compilation<'_> {
    let (tokens, lex_errors) = lexer::lex(source);
    debug!(
        "lexed {} tokens, {} diagnostics",
        tokens.len(),
        lex_errors.len()
    );
    let mut diagnostics = lex_errors.into_diagnostics();

    let mut program = None;
    let has_input = tokens
        .iter()
        .any(|token| token.kind != TokenKind::EndOfFile);
    if has_input {
        let (result, parse_errors) = parser::parse(&tokens);
        debug!(
            "parse {}",
            if result.is_ok() { "succeeded" } else { "aborted" }
        );
        diagnostics.extend(parse_errors.into_diagnostics());
        program = result.ok();
    }

    let mut symbols = None;
    if let Some(program) = program.as_mut() {
        let (ok, table, semantic_errors) = analyze::analyze(program);
        debug!(
            "analysis {} with {} diagnostics",
            if ok { "succeeded" } else { "failed" },
            semantic_errors.len()
        );
        diagnostics.extend(semantic_errors.into_diagnostics());
        symbols = Some(table);
    }

    Compilation {
        tokens,
        program,
        symbols,
        diagnostics,
    }
}
