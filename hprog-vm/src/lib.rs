// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode compiler and stack-based virtual machine for hprog.
//!
//! Source text is compiled in a single pass straight to a [`Chunk`] of
//! bytecode, which the [`VM`] then executes:
//!
//! ```
//! use hprog_vm::{ExecutionResult, VM};
//!
//! let mut vm = VM::with_output(Vec::new());
//! assert_eq!(vm.interpret("print(1 + 2);"), ExecutionResult::Ok);
//! assert_eq!(vm.output(), b"3\n");
//! ```

pub mod chunk;
pub mod compiler;
pub mod config;
pub mod disasm;
pub mod opcode;
pub mod vm;

pub use chunk::{Chunk, LineInfo};
pub use compiler::{
    CompileDiagnostic, CompileError, CompileErrors, Compiler, MAX_NESTING, compile,
};
pub use config::Config;
pub use disasm::{disassemble, disassemble_instruction};
pub use opcode::OpCode;
pub use vm::{ExecutionResult, InterpretError, RuntimeError, RuntimeFault, VM};
