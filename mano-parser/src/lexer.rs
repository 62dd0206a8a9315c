//! Hand-rolled streaming scanner with position tracking.

use crate::token::{Token, TokenKind};
use mano_source::{ErrorReporter, Phase};

/// Reserved words. The primitive type names are keywords so the parser can
/// tell primitive types from user-defined types syntactically. `true`,
/// `false` and `void` are deliberately absent.
const KEYWORDS: &[&str] = &[
    "var", "let", "const", "fun", "class", "enum", "if", "else", "for", "while", "break",
    "continue", "return", "switch", "case", "default", "int", "uint", "float", "bool", "string",
];

/// Scans `source` into a token stream terminated by exactly one
/// [`TokenKind::EndOfFile`] token. Lexical errors are non-fatal; scanning
/// always runs to the end of the input.
pub fn lex(source: &str) -> (Vec<Token<'_>>, ErrorReporter) {
    Lexer::new(source).tokenize()
}

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    offset: usize,
    line: u32,
    column: u32,
    errors: ErrorReporter,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            offset: 0,
            line: 1,
            column: 1,
            errors: ErrorReporter::new(Phase::Lexer),
        }
    }

    pub fn tokenize(mut self) -> (Vec<Token<'a>>, ErrorReporter) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();
        if self.is_at_end() {
            return Token {
                kind: TokenKind::EndOfFile,
                lexeme: "",
                line: self.line,
                column: self.column,
            };
        }

        let current = self.peek();
        if current.is_ascii_alphabetic() || current == b'_' {
            return self.scan_identifier();
        }
        if current.is_ascii_digit() {
            return self.scan_number();
        }
        if current == b'"' {
            return self.scan_string();
        }
        if is_operator_char(current) {
            return self.scan_operator();
        }
        if is_punctuation_char(current) {
            return self.scan_punctuation();
        }

        let (line, column) = (self.line, self.column);
        let start = self.offset;
        self.advance();
        // consume any UTF-8 continuation bytes so the lexeme stays a valid
        // slice of the source
        while !self.is_at_end() && (self.peek() & 0xc0) == 0x80 {
            self.advance();
        }
        let lexeme = &self.source[start..self.offset];
        self.errors
            .report(line, column, format!("Unrecognized character: '{}'", lexeme));
        Token {
            kind: TokenKind::Unknown,
            lexeme,
            line,
            column,
        }
    }

    fn is_at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn peek(&self) -> u8 {
        self.bytes[self.offset]
    }

    fn peek_next(&self) -> Option<u8> {
        self.bytes.get(self.offset + 1).copied()
    }

    fn advance(&mut self) -> u8 {
        let c = self.bytes[self.offset];
        self.offset += 1;
        if c == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_ascii_whitespace() {
                self.advance();
            } else if c == b'/' && self.peek_next() == Some(b'/') {
                // line comment, runs to the end of the line or the input
                while !self.is_at_end() && self.peek() != b'\n' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn scan_identifier(&mut self) -> Token<'a> {
        let (line, column) = (self.line, self.column);
        let start = self.offset;
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            self.advance();
        }
        let lexeme = &self.source[start..self.offset];
        let kind = if KEYWORDS.contains(&lexeme) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }

    fn scan_number(&mut self) -> Token<'a> {
        let (line, column) = (self.line, self.column);
        let start = self.offset;
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        // fractional part
        if !self.is_at_end() && self.peek() == b'.' {
            self.advance();
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        Token {
            kind: TokenKind::Number,
            lexeme: &self.source[start..self.offset],
            line,
            column,
        }
    }

    fn scan_string(&mut self) -> Token<'a> {
        let (line, column) = (self.line, self.column);
        let start = self.offset;
        self.advance(); // opening quote

        while !self.is_at_end() && self.peek() != b'"' {
            if self.peek() == b'\\' {
                // a backslash carries the next byte verbatim; escape
                // interpretation is deferred to later stages
                self.advance();
                if !self.is_at_end() {
                    self.advance();
                }
            } else {
                self.advance();
            }
        }

        let kind = if self.is_at_end() {
            self.errors.report(line, column, "Unterminated string literal");
            TokenKind::Unknown
        } else {
            self.advance(); // closing quote
            TokenKind::String
        };
        Token {
            kind,
            lexeme: &self.source[start..self.offset],
            line,
            column,
        }
    }

    fn scan_operator(&mut self) -> Token<'a> {
        let (line, column) = (self.line, self.column);
        let start = self.offset;
        let first = self.advance();
        if !self.is_at_end() {
            let next = self.peek();
            let is_digraph = matches!(
                (first, next),
                (b'=', b'=')
                    | (b'!', b'=')
                    | (b'<', b'=')
                    | (b'>', b'=')
                    | (b'&', b'&')
                    | (b'|', b'|')
                    | (b'<', b'<')
                    | (b'>', b'>')
            );
            if is_digraph {
                self.advance();
            }
        }
        Token {
            kind: TokenKind::Operator,
            lexeme: &self.source[start..self.offset],
            line,
            column,
        }
    }

    fn scan_punctuation(&mut self) -> Token<'a> {
        let (line, column) = (self.line, self.column);
        let start = self.offset;
        self.advance();
        Token {
            kind: TokenKind::Punctuation,
            lexeme: &self.source[start..self.offset],
            line,
            column,
        }
    }
}

fn is_operator_char(c: u8) -> bool {
    matches!(
        c,
        b'+' | b'-' | b'*' | b'/' | b'=' | b'!' | b'<' | b'>' | b'&' | b'|' | b'^' | b'%'
    )
}

fn is_punctuation_char(c: u8) -> bool {
    matches!(
        c,
        b'(' | b')' | b'{' | b'}' | b'[' | b']' | b',' | b':' | b';' | b'.'
    )
}
