// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Runtime errors for the VM.

use hprog_parser::ValueError;
use thiserror::Error;

use crate::chunk::LineInfo;
use crate::compiler::CompileErrors;

/// Runtime error during VM execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow (maximum depth {0})")]
    StackOverflow(usize),
    #[error("type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),
    /// A global was declared twice.
    #[error("variable '{0}' already declared")]
    AlreadyDeclared(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    /// Writing to the output sink failed.
    #[error("failed to write output: {0}")]
    Output(String),
    /// Malformed bytecode.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValueError> for RuntimeError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::TypeMismatch { expected, got } => RuntimeError::TypeError {
                expected: expected.into(),
                got,
            },
            ValueError::Overflow(_) => RuntimeError::IntegerOverflow,
            ValueError::DivisionByZero => RuntimeError::DivisionByZero,
        }
    }
}

/// Result type for VM operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// A runtime error tagged with the source location of the failing instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location} Runtime error: {error}")]
pub struct RuntimeFault {
    pub error: RuntimeError,
    pub location: LineInfo,
}

/// Why a call to `interpret` failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error(transparent)]
    Compile(#[from] CompileErrors),
    #[error(transparent)]
    Runtime(#[from] RuntimeFault),
}

/// Outcome of [`crate::VM::interpret`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    Ok,
    CompileError,
    RuntimeError,
}

impl From<&InterpretError> for ExecutionResult {
    fn from(err: &InterpretError) -> Self {
        match err {
            InterpretError::Compile(_) => ExecutionResult::CompileError,
            InterpretError::Runtime(_) => ExecutionResult::RuntimeError,
        }
    }
}
