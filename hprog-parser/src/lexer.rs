// hprog-parser - Lexer for hprog
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexer (tokeniser) for hprog source code.
//!
//! The lexer is pulled one token at a time by the compiler. It never fails:
//! malformed input produces a `TokenKind::Error` token whose lexeme is the
//! diagnostic message, and scanning resumes at the next token.
//!
//! Newlines are significant only for automatic semicolon insertion: a newline
//! that follows a token able to end a statement (see
//! [`TokenKind::ends_statement`]) is emitted as a `Semicolon`; any other newline
//! is swallowed so expressions may continue on the next line. End of input is
//! treated the same way.

use tracing::trace;

use crate::token::{Token, TokenKind};

/// The lexer converts source code into tokens.
pub struct Lexer<'src> {
    source: &'src str,
    /// Byte offset of the first character of the current lexeme.
    start: usize,
    /// Byte offset of the next unread character.
    current: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
    /// Set when the last emitted token may end a statement.
    requires_semicolon: bool,
    /// Set once `Eof` has been handed out through the iterator.
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            requires_semicolon: false,
            exhausted: false,
        }
    }

    /// Get the next token from the source.
    ///
    /// Once the input is exhausted every further call returns `Eof`.
    pub fn next_token(&mut self) -> Token<'src> {
        let token = self.scan_token();
        self.requires_semicolon = token.kind.ends_statement();
        trace!(
            kind = %token.kind,
            lexeme = token.lexeme,
            line = token.line,
            column = token.column,
            "token"
        );
        token
    }

    /// Collect all tokens up to (but excluding) `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.is(TokenKind::Eof) {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    fn scan_token(&mut self) -> Token<'src> {
        loop {
            self.skip_whitespace_and_comments();
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;

            let Some(c) = self.advance() else {
                if self.requires_semicolon {
                    return self.synthetic_semicolon("");
                }
                return self.make_token(TokenKind::Eof);
            };

            if c == '\n' {
                if self.requires_semicolon {
                    return self.synthetic_semicolon("\n");
                }
                continue;
            }

            return match c {
                '(' => self.make_token(TokenKind::LeftParen),
                ')' => self.make_token(TokenKind::RightParen),
                '{' => self.make_token(TokenKind::LeftBrace),
                '}' => self.make_token(TokenKind::RightBrace),
                ',' => self.make_token(TokenKind::Comma),
                '-' => self.make_token(TokenKind::Minus),
                '+' => self.make_token(TokenKind::Plus),
                ';' => self.make_token(TokenKind::Semicolon),
                '/' => self.make_token(TokenKind::Slash),
                '*' => self.make_token(TokenKind::Star),
                ':' => self.make_token(TokenKind::Colon),
                '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
                '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
                '<' => self.either('=', TokenKind::LessEqual, TokenKind::Less),
                '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater),
                '.' if self.peek().is_some_and(is_digit) => self.fraction(),
                '.' => self.make_token(TokenKind::Dot),
                '"' => self.string(),
                c if is_digit(c) => self.number(),
                c if is_letter(c) => self.identifier(),
                _ => self.error_token("unexpected character"),
            };
        }
    }

    fn number(&mut self) -> Token<'src> {
        self.consume_digits();
        if self.peek() == Some('.') {
            self.advance();
            return self.fraction();
        }
        self.finish_number()
    }

    /// Scan the digits after a decimal point (which may be absent, as in `11.`).
    fn fraction(&mut self) -> Token<'src> {
        self.consume_digits();
        self.finish_number()
    }

    fn finish_number(&mut self) -> Token<'src> {
        if self.peek().is_some_and(is_letter) {
            // Swallow the rest of the word so scanning resumes after it.
            while self.peek().is_some_and(is_alphanumeric) {
                self.advance();
            }
            return self.error_token("malformed number literal");
        }
        self.make_token(TokenKind::Number)
    }

    fn identifier(&mut self) -> Token<'src> {
        while self.peek().is_some_and(is_alphanumeric) {
            self.advance();
        }
        let word = &self.source[self.start..self.current];
        let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }

    fn string(&mut self) -> Token<'src> {
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return self.make_token(TokenKind::String);
                }
                Some('\n') | None => return self.error_token("unterminated string"),
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Emit `matched` if the next character is `expected`, consuming it.
    fn either(&mut self, expected: char, matched: TokenKind, single: TokenKind) -> Token<'src> {
        if self.peek() == Some(expected) {
            self.advance();
            self.make_token(matched)
        } else {
            self.make_token(single)
        }
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(is_digit) {
            self.advance();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('#') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token::new(
            kind,
            &self.source[self.start..self.current],
            self.start_line,
            self.start_column,
        )
    }

    fn synthetic_semicolon(&self, lexeme: &'static str) -> Token<'src> {
        Token::new(
            TokenKind::Semicolon,
            lexeme,
            self.start_line,
            self.start_column,
        )
    }

    fn error_token(&self, message: &'static str) -> Token<'src> {
        Token::new(
            TokenKind::Error,
            message,
            self.start_line,
            self.start_column,
        )
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    /// Yields every token including the final `Eof`, then `None`.
    fn next(&mut self) -> Option<Token<'src>> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            self.exhausted = true;
        }
        Some(token)
    }
}

/// Render the full token stream of `source`, one token per line, ending with
/// the `Eof` token.
pub fn dump_tokens(source: &str) -> String {
    let mut out = String::new();
    for token in Lexer::new(source) {
        let kind = format!("{:?}", token.kind);
        out.push_str(&format!(
            "{:4}:{:<4} {:<14} {}\n",
            token.line, token.column, kind, token
        ));
    }
    out
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_letter(c) || is_digit(c)
}

// ============================================================================
// Tests
// ============================================================================
