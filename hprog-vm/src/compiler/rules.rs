// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Pratt parse rules: the prefix and infix handler for each token kind.

use hprog_parser::{TokenKind, Value};

use crate::opcode::OpCode;

use super::codegen::Compiler;
use super::types::Precedence;

/// A prefix or infix handler. The flag says whether `=` may follow.
pub type ParseFn = fn(&mut Compiler<'_>, bool);

/// How a token behaves in expression position.
#[derive(Clone, Copy)]
pub struct ParseRule {
    pub prefix: Option<ParseFn>,
    pub infix: Option<ParseFn>,
    pub precedence: Precedence,
}

impl ParseRule {
    const fn new(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

/// Look up the parse rule for a token kind.
pub fn rule(kind: TokenKind) -> ParseRule {
    use Precedence as P;
    use TokenKind as T;

    match kind {
        T::LeftParen => ParseRule::new(Some(grouping), None, P::None),
        T::Minus => ParseRule::new(Some(unary), Some(binary), P::Term),
        T::Plus => ParseRule::new(None, Some(binary), P::Term),
        T::Slash | T::Star => ParseRule::new(None, Some(binary), P::Factor),
        T::Bang => ParseRule::new(Some(unary), None, P::None),
        T::BangEqual | T::EqualEqual => ParseRule::new(None, Some(binary), P::Equality),
        T::Greater | T::GreaterEqual | T::Less | T::LessEqual => {
            ParseRule::new(None, Some(binary), P::Comparison)
        }
        T::Identifier => ParseRule::new(Some(variable), None, P::None),
        T::String => ParseRule::new(Some(string), None, P::None),
        T::Number => ParseRule::new(Some(number), None, P::None),
        T::True | T::False | T::Nil => ParseRule::new(Some(literal), None, P::None),
        _ => ParseRule::new(None, None, P::None),
    }
}

fn grouping(c: &mut Compiler<'_>, _can_assign: bool) {
    c.expression();
    c.consume(TokenKind::RightParen, "')' after expression");
}

fn unary(c: &mut Compiler<'_>, _can_assign: bool) {
    let operator = c.previous().kind;
    c.parse_precedence(Precedence::Unary);
    match operator {
        TokenKind::Minus => c.emit(OpCode::Negate),
        TokenKind::Bang => c.emit(OpCode::Not),
        _ => {}
    }
}

fn binary(c: &mut Compiler<'_>, _can_assign: bool) {
    let operator = c.previous().kind;
    c.parse_precedence(rule(operator).precedence.next());
    match operator {
        TokenKind::Plus => c.emit(OpCode::Add),
        TokenKind::Minus => c.emit(OpCode::Subtract),
        TokenKind::Star => c.emit(OpCode::Multiply),
        TokenKind::Slash => c.emit(OpCode::Divide),
        TokenKind::EqualEqual => c.emit(OpCode::Equal),
        TokenKind::BangEqual => {
            c.emit(OpCode::Equal);
            c.emit(OpCode::Not);
        }
        TokenKind::Greater => c.emit(OpCode::Greater),
        TokenKind::GreaterEqual => {
            c.emit(OpCode::Less);
            c.emit(OpCode::Not);
        }
        TokenKind::Less => c.emit(OpCode::Less),
        TokenKind::LessEqual => {
            c.emit(OpCode::Greater);
            c.emit(OpCode::Not);
        }
        _ => {}
    }
}

/// Integers first, then floats; anything else becomes nil.
fn number(c: &mut Compiler<'_>, _can_assign: bool) {
    let lexeme = c.previous().lexeme;
    let value = lexeme
        .parse::<i64>()
        .map(Value::Int)
        .or_else(|_| lexeme.parse::<f64>().map(Value::Float))
        .unwrap_or(Value::Nil);
    c.emit_constant(value);
}

fn string(c: &mut Compiler<'_>, _can_assign: bool) {
    let lexeme = c.previous().lexeme;
    let contents = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    c.emit_constant(Value::string(contents));
}

fn literal(c: &mut Compiler<'_>, _can_assign: bool) {
    match c.previous().kind {
        TokenKind::True => c.emit(OpCode::True),
        TokenKind::False => c.emit(OpCode::False),
        TokenKind::Nil => c.emit(OpCode::Nil),
        _ => {}
    }
}

fn variable(c: &mut Compiler<'_>, can_assign: bool) {
    let name = c.previous();
    c.named_variable(name, can_assign);
}
