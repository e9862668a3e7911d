// hprog-parser - Lexer and value model for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # hprog-parser
//!
//! Lexer, tokens and the dynamic value model for the hprog language.
//! The bytecode compiler in `hprog-vm` pulls tokens from [`Lexer`] one at a
//! time and emits [`Value`] constants.

pub mod lexer;
pub mod token;
pub mod value;

pub use lexer::{Lexer, dump_tokens};
pub use token::{Token, TokenKind};
pub use value::{Value, ValueError, ValueType, coercion};
