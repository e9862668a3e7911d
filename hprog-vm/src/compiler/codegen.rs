// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Code generation: a single pass from tokens straight to bytecode.
//!
//! The compiler pulls tokens from the lexer on demand, so no syntax tree is
//! ever built. Statements are parsed by recursive descent; expressions go
//! through the Pratt parser in [`super::rules`].

use hprog_parser::{Lexer, Token, TokenKind, Value};
use tracing::debug;

use crate::chunk::{Chunk, LineInfo};
use crate::opcode::OpCode;

use super::rules::rule;
use super::types::{CompileDiagnostic, CompileError, CompileErrors, Local, Precedence};

/// Maximum number of locals that can be live at once (one per `u16` slot).
const MAX_LOCALS: usize = u16::MAX as usize + 1;

/// Maximum nesting of expressions and blocks. Each level recurses in the
/// compiler.
pub const MAX_NESTING: usize = 256;

/// Single-pass bytecode compiler.
pub struct Compiler<'src> {
    lexer: Lexer<'src>,

    /// The chunk being built.
    chunk: Chunk,

    current: Token<'src>,
    previous: Token<'src>,

    had_error: bool,
    /// Set after an error; further errors are suppressed until recovery.
    panic_mode: bool,
    /// Resynchronise at statement boundaries after an error.
    recover: bool,
    diagnostics: Vec<CompileDiagnostic>,

    /// Local variables in scope; the index is the stack slot.
    locals: Vec<Local<'src>>,

    /// Current scope depth (0 = global).
    scope_depth: usize,

    /// Open sub-expressions and blocks.
    nesting: usize,
}

impl<'src> Compiler<'src> {
    /// Create a compiler for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            chunk: Chunk::new(),
            current: Token::placeholder(),
            previous: Token::placeholder(),
            had_error: false,
            panic_mode: false,
            recover: false,
            diagnostics: Vec::new(),
            locals: Vec::new(),
            scope_depth: 0,
            nesting: 0,
        }
    }

    /// Enable or disable statement-boundary error recovery.
    ///
    /// Without recovery only the first error of a compile is reported.
    pub fn with_recovery(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    /// Compile the whole source text into a chunk.
    pub fn compile(mut self) -> std::result::Result<Chunk, CompileErrors> {
        self.advance();
        while !self.match_token(TokenKind::Eof) {
            self.declaration();
        }
        self.emit(OpCode::Return);

        if self.had_error {
            debug!(errors = self.diagnostics.len(), "compile failed");
            return Err(CompileErrors(self.diagnostics));
        }
        debug!(
            instructions = self.chunk.len(),
            constants = self.chunk.constants.len(),
            "compiled chunk"
        );
        Ok(self.chunk)
    }

    // =========================================================================
    // Token handling
    // =========================================================================

    pub(super) fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.lexer.next_token();
            if !self.current.is(TokenKind::Error) {
                break;
            }
            let message = self.current.lexeme.to_string();
            self.error_at_current(CompileError::Lex(message));
        }
    }

    pub(super) fn consume(&mut self, kind: TokenKind, expected: &'static str) {
        if self.current.is(kind) {
            self.advance();
            return;
        }
        self.error_at_current(CompileError::Expected(expected));
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub(super) fn previous(&self) -> Token<'src> {
        self.previous
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Emit an instruction attributed to the most recently consumed token.
    pub(super) fn emit(&mut self, op: OpCode) {
        let line_info = LineInfo::new(self.previous.line, self.previous.column);
        self.chunk.emit(op, line_info);
    }

    pub(super) fn emit_constant(&mut self, value: Value) {
        let idx = self.make_constant(value);
        self.emit(OpCode::Constant(idx));
    }

    fn make_constant(&mut self, value: Value) -> u16 {
        match self.chunk.add_constant(value) {
            Some(idx) => idx,
            None => {
                self.error(CompileError::TooManyConstants);
                0
            }
        }
    }

    fn identifier_constant(&mut self, name: Token<'src>) -> u16 {
        self.make_constant(Value::string(name.lexeme))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn declaration(&mut self) {
        if self.match_token(TokenKind::Decl) {
            self.var_declaration();
        } else {
            self.statement();
        }

        if self.panic_mode && self.recover {
            self.synchronize();
        }
    }

    fn var_declaration(&mut self) {
        self.consume(TokenKind::Identifier, "variable name after 'decl'");
        let name = self.previous;
        if !name.is(TokenKind::Identifier) {
            return;
        }

        if self.scope_depth == 0 {
            let global = self.identifier_constant(name);
            self.initializer();
            self.consume(TokenKind::Semicolon, "';' after variable declaration");
            self.emit(OpCode::DeclGlobal(global));
            // Keep the stack empty between top-level statements.
            self.emit(OpCode::Pop);
            return;
        }

        self.declare_local(name);
        self.initializer();
        self.consume(TokenKind::Semicolon, "';' after variable declaration");
        if let Some(slot) = self.mark_initialized() {
            self.emit(OpCode::DeclLocal(slot));
        }
    }

    fn initializer(&mut self) {
        if self.match_token(TokenKind::Equal) {
            self.expression();
        } else {
            self.emit(OpCode::Nil);
        }
    }

    fn statement(&mut self) {
        if self.match_token(TokenKind::Print) {
            self.print_statement();
        } else if self.match_token(TokenKind::LeftBrace) {
            if !self.enter_nesting() {
                return;
            }
            self.begin_scope();
            self.block();
            self.end_scope();
            self.nesting -= 1;
        } else {
            self.expression_statement();
        }
    }

    fn print_statement(&mut self) {
        self.consume(TokenKind::LeftParen, "'(' after 'print'");
        if self.check(TokenKind::RightParen) {
            self.emit(OpCode::Nil);
        } else {
            self.expression();
        }
        self.consume(TokenKind::RightParen, "')' after value");
        self.consume(TokenKind::Semicolon, "';' after value");
        self.emit(OpCode::Print);
    }

    fn block(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.consume(TokenKind::RightBrace, "'}' after block");
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "';' after expression");
        self.emit(OpCode::Pop);
    }

    pub(super) fn expression(&mut self) {
        self.parse_precedence(Precedence::Assign);
    }

    /// Parse an expression whose operators bind at least as tightly as
    /// `precedence`.
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) {
        if !self.enter_nesting() {
            return;
        }
        self.parse_operators(precedence);
        self.nesting -= 1;
    }

    fn parse_operators(&mut self, precedence: Precedence) {
        self.advance();
        let Some(prefix) = rule(self.previous.kind).prefix else {
            self.error(CompileError::ExpectedExpression);
            return;
        };

        let can_assign = precedence <= Precedence::Assign;
        prefix(self, can_assign);

        while precedence <= rule(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = rule(self.previous.kind).infix {
                infix(self, can_assign);
            }
        }

        if can_assign && self.match_token(TokenKind::Equal) {
            self.error(CompileError::InvalidAssignmentTarget);
        }
    }

    /// Open one more level of nesting, or report that the limit is reached.
    fn enter_nesting(&mut self) -> bool {
        if self.nesting >= MAX_NESTING {
            self.error(CompileError::TooDeeplyNested(MAX_NESTING));
            return false;
        }
        self.nesting += 1;
        true
    }

    // =========================================================================
    // Scopes and variables
    // =========================================================================

    fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    fn end_scope(&mut self) {
        self.scope_depth -= 1;
        while let Some(local) = self.locals.last() {
            if local.depth.is_some_and(|depth| depth <= self.scope_depth) {
                break;
            }
            self.locals.pop();
            self.emit(OpCode::Pop);
        }
    }

    fn declare_local(&mut self, name: Token<'src>) {
        let duplicate = self
            .locals
            .iter()
            .rev()
            .take_while(|local| local.depth.is_none_or(|depth| depth >= self.scope_depth))
            .any(|local| local.name == name.lexeme);
        if duplicate {
            self.error(CompileError::AlreadyDeclared(name.lexeme.to_string()));
        }

        if self.locals.len() >= MAX_LOCALS {
            self.error(CompileError::TooManyLocals);
            return;
        }
        self.locals.push(Local {
            name: name.lexeme,
            depth: None,
        });
    }

    /// Mark the innermost local as usable and return its slot.
    fn mark_initialized(&mut self) -> Option<u16> {
        let depth = self.scope_depth;
        let slot = self.locals.len().checked_sub(1)?;
        self.locals[slot].depth = Some(depth);
        u16::try_from(slot).ok()
    }

    /// Find the slot of a local by name, innermost first.
    fn resolve_local(&self, name: &str) -> super::Result<Option<u16>> {
        for (slot, local) in self.locals.iter().enumerate().rev() {
            if local.name != name {
                continue;
            }
            if local.depth.is_none() {
                return Err(CompileError::ReadInOwnInitializer(name.to_string()));
            }
            return u16::try_from(slot)
                .map(Some)
                .map_err(|_| CompileError::TooManyLocals);
        }
        Ok(None)
    }

    /// Emit a read of `name`, or a write if an assignment follows.
    pub(super) fn named_variable(&mut self, name: Token<'src>, can_assign: bool) {
        let (get, set) = match self.resolve_local(name.lexeme) {
            Ok(Some(slot)) => (OpCode::GetDeclLocal(slot), OpCode::SetDeclLocal(slot)),
            Ok(None) => {
                let idx = self.identifier_constant(name);
                (OpCode::GetDeclGlobal(idx), OpCode::SetDeclGlobal(idx))
            }
            Err(e) => {
                self.error(e);
                return;
            }
        };

        if can_assign && self.match_token(TokenKind::Equal) {
            self.expression();
            self.emit(set);
        } else {
            self.emit(get);
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Report an error at the most recently consumed token.
    pub(super) fn error(&mut self, error: CompileError) {
        let token = self.previous;
        self.error_at(token, error);
    }

    fn error_at_current(&mut self, error: CompileError) {
        let token = self.current;
        self.error_at(token, error);
    }

    fn error_at(&mut self, token: Token<'src>, error: CompileError) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;
        let diagnostic = CompileDiagnostic::new(error, &token);
        debug!(%diagnostic, "compile error");
        self.diagnostics.push(diagnostic);
    }

    /// Skip tokens until a likely statement boundary.
    fn synchronize(&mut self) {
        self.panic_mode = false;
        while !self.check(TokenKind::Eof) {
            if self.previous.is(TokenKind::Semicolon) {
                return;
            }
            match self.current.kind {
                TokenKind::Decl
                | TokenKind::Print
                | TokenKind::LeftBrace
                | TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Fn
                | TokenKind::Return => return,
                _ => {}
            }
            self.advance();
        }
    }
}
