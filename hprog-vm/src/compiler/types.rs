// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared types for the bytecode compiler.

use std::fmt;

use hprog_parser::{Token, TokenKind};
use thiserror::Error;

/// Error during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The lexer produced an error token.
    #[error("{0}")]
    Lex(String),
    /// A specific token was required.
    #[error("expected {0}")]
    Expected(&'static str),
    /// A token with no prefix rule started an expression.
    #[error("expected expression")]
    ExpectedExpression,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    /// Two locals with the same name in one block.
    #[error("variable '{0}' already declared in this scope")]
    AlreadyDeclared(String),
    #[error("cannot read local variable '{0}' in its own initializer")]
    ReadInOwnInitializer(String),
    /// Constant pool overflow.
    #[error("too many constants in one chunk")]
    TooManyConstants,
    /// Too many local variables.
    #[error("too many local variables")]
    TooManyLocals,
    /// Expressions or blocks nested past the compiler's limit.
    #[error("nesting too deep (maximum {0} levels)")]
    TooDeeplyNested(usize),
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;

/// A compile error together with the token it was reported at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    pub error: CompileError,
    pub line: u32,
    pub column: u32,
    /// Source text of the offending token; `None` at end of input.
    pub lexeme: Option<String>,
}

impl CompileDiagnostic {
    pub fn new(error: CompileError, token: &Token<'_>) -> Self {
        let lexeme = match token.kind {
            TokenKind::Eof | TokenKind::Error => None,
            _ => Some(token.lexeme.to_string()),
        };
        Self {
            error,
            line: token.line,
            column: token.column,
            lexeme,
        }
    }
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line:{}, col:{}] Error", self.line, self.column)?;
        match (&self.error, self.lexeme.as_deref()) {
            // The message already describes the bad input.
            (CompileError::Lex(_), _) => {}
            (_, None) => write!(f, " at end")?,
            // Semicolons synthesised at a line break or end of input.
            (_, Some("\n" | "")) => write!(f, " at end of line")?,
            (_, Some(lexeme)) => write!(f, " at '{}'", lexeme)?,
        }
        write!(f, ": {}", self.error)
    }
}

impl std::error::Error for CompileDiagnostic {}

/// Every diagnostic reported while compiling one source text.
///
/// Without statement recovery this always holds exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileErrors(pub Vec<CompileDiagnostic>);

impl CompileErrors {
    pub fn first(&self) -> Option<&CompileDiagnostic> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompileDiagnostic> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a CompileErrors {
    type Item = &'a CompileDiagnostic;
    type IntoIter = std::slice::Iter<'a, CompileDiagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

/// Local variable during compilation.
///
/// Its index in the compiler's locals vector is its stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Local<'src> {
    pub name: &'src str,
    /// Scope depth, or `None` while the initializer is being compiled.
    pub depth: Option<usize>,
}

/// Binding power of an operator, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assign,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    /// The next-higher level, used for the right operand of a
    /// left-associative binary operator.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assign,
            Precedence::Assign => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}
