// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode compiler: transforms hprog source text to bytecode.
//!
//! Compilation is a single pass: statements by recursive descent, expressions
//! by Pratt parsing over a static rule table. The first error puts the
//! compiler into panic mode, which suppresses further diagnostics unless
//! statement recovery is enabled.

pub mod codegen;
pub mod rules;
pub mod types;

pub use codegen::{Compiler, MAX_NESTING};
pub use rules::{ParseFn, ParseRule, rule};
pub use types::{CompileDiagnostic, CompileError, CompileErrors, Local, Precedence, Result};

use crate::chunk::Chunk;

/// Compile source text with default settings.
pub fn compile(source: &str) -> std::result::Result<Chunk, CompileErrors> {
    Compiler::new(source).compile()
}
