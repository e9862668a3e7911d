// hprog-parser - Token types for hprog
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tokens produced by the lexer.

use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character punctuation
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Comma,      // ,
    Dot,        // .
    Minus,      // -
    Plus,       // +
    Semicolon,  // ; (also synthesised at line ends)
    Slash,      // /
    Star,       // *
    Colon,      // :

    // One or two character operators
    Bang,         // !
    BangEqual,    // !=
    Equal,        // =
    EqualEqual,   // ==
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=

    // Literals
    Identifier,
    Number,
    String,

    // Keywords
    If,
    For,
    Else,
    Decl,
    Print,
    And,
    Or,
    Nil,
    True,
    False,
    Return,
    While,
    Fn,

    // Sentinels
    Error,
    Eof,
    /// Reserved for tooling; the lexer drops comments rather than emitting them.
    Comment,
}

impl TokenKind {
    /// Look up a reserved word. Returns `None` for ordinary identifiers.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "if" => TokenKind::If,
            "for" => TokenKind::For,
            "else" => TokenKind::Else,
            "decl" => TokenKind::Decl,
            "print" => TokenKind::Print,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "nil" => TokenKind::Nil,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "return" => TokenKind::Return,
            "while" => TokenKind::While,
            "fn" => TokenKind::Fn,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether a token of this kind may end a statement.
    ///
    /// A newline following such a token is turned into a `Semicolon`.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::RightParen
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    /// Human-readable name used in diagnostics and debugging output.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            TokenKind::Semicolon => ";",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::Colon => ":",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::If => "if",
            TokenKind::For => "for",
            TokenKind::Else => "else",
            TokenKind::Decl => "decl",
            TokenKind::Print => "print",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Nil => "nil",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Return => "return",
            TokenKind::While => "while",
            TokenKind::Fn => "fn",
            TokenKind::Error => "ERROR",
            TokenKind::Eof => "EOF",
            TokenKind::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token borrowed from the source text.
///
/// For `TokenKind::Error` the lexeme holds the diagnostic message instead of
/// source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    /// Source line (1-indexed).
    pub line: u32,
    /// Source column of the first character (1-indexed).
    pub column: u32,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src str, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme,
            line,
            column,
        }
    }

    /// A placeholder token used before the first `advance`.
    pub fn placeholder() -> Self {
        Self::new(TokenKind::Eof, "", 1, 1)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether this semicolon was inserted by the lexer rather than written.
    pub fn is_synthetic(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.lexeme != ";"
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Error => write!(f, "error: {}", self.lexeme),
            _ if self.is_synthetic() => write!(f, "end of line"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}
