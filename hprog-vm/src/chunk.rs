// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode chunks.

use hprog_parser::Value;

use crate::OpCode;

/// Debug information for a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineInfo {
    /// Source line number (1-indexed).
    pub line: u32,
    /// Source column number (1-indexed).
    pub column: u32,
}

impl LineInfo {
    /// Create a new LineInfo.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for LineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line:{}, col:{}]", self.line, self.column)
    }
}

/// A chunk of bytecode with its constant pool and debug information.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// The bytecode instructions.
    pub code: Vec<OpCode>,

    /// Debug info: source location for each instruction.
    /// Same length as `code`.
    pub lines: Vec<LineInfo>,

    /// Constant pool: number and string literals, global names.
    pub constants: Vec<Value>,
}

impl Chunk {
    /// Create a new empty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an instruction with source location.
    pub fn emit(&mut self, op: OpCode, line_info: LineInfo) {
        self.code.push(op);
        self.lines.push(line_info);
    }

    /// Add a constant to the pool and return its index.
    ///
    /// Returns `None` if the constant pool is full (> u16::MAX entries).
    pub fn add_constant(&mut self, value: Value) -> Option<u16> {
        // Check for existing constant to deduplicate
        if let Some(i) = self
            .constants
            .iter()
            .position(|existing| Self::constants_equal(existing, &value))
        {
            return Some(i as u16);
        }

        let idx = self.constants.len();
        if idx > u16::MAX as usize {
            return None;
        }
        self.constants.push(value);
        Some(idx as u16)
    }

    /// Check if two constants are equal for deduplication purposes.
    /// Unlike `Value::equals`, this never coerces across types.
    fn constants_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }

    /// Get the source location for an instruction at the given offset.
    pub fn get_line_info(&self, offset: usize) -> Option<LineInfo> {
        self.lines.get(offset).copied()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
