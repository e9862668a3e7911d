// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Bytecode instruction definitions.

/// Bytecode instructions for the hprog VM.
///
/// Instructions operate on a value stack. Operands are fixed-width `u16`
/// indices, either into the chunk's constant pool or into the stack itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // =========================================================================
    // Constants & Literals
    // =========================================================================
    /// Push constant from constant pool onto stack.
    Constant(u16),

    /// Push nil.
    Nil,

    /// Push true.
    True,

    /// Push false.
    False,

    // =========================================================================
    // Unary Operations
    // =========================================================================
    /// Arithmetic negation of numbers, logical negation of booleans.
    Negate,

    /// Logical not: push !pop(). Booleans only.
    Not,

    // =========================================================================
    // Binary Operations
    // =========================================================================
    /// Addition or string concatenation: push a + b where b = pop(), a = pop().
    Add,

    /// Subtraction: push a - b where b = pop(), a = pop().
    Subtract,

    /// Multiplication: push a * b where b = pop(), a = pop().
    Multiply,

    /// Division: push a / b where b = pop(), a = pop().
    Divide,

    /// Equality: push a == b where b = pop(), a = pop().
    Equal,

    /// Greater than: push a > b where b = pop(), a = pop().
    Greater,

    /// Less than: push a < b where b = pop(), a = pop().
    Less,

    // =========================================================================
    // Variables
    // =========================================================================
    /// Bind global named by constants[n] to the top of stack. Does not pop.
    DeclGlobal(u16),

    /// Overwrite an existing global named by constants[n] with the top of
    /// stack. Does not pop.
    SetDeclGlobal(u16),

    /// Push the value of the global named by constants[n].
    GetDeclGlobal(u16),

    /// Mark the value at stack[n] (the top) as a freshly declared local.
    DeclLocal(u16),

    /// Overwrite stack[n] with the top of stack. Does not pop.
    SetDeclLocal(u16),

    /// Push a copy of stack[n].
    GetDeclLocal(u16),

    // =========================================================================
    // Statements
    // =========================================================================
    /// Pop and write the value to the output sink.
    Print,

    /// Pop top value from stack.
    Pop,

    /// Halt execution.
    Return,
}

impl OpCode {
    /// Mnemonic used by the disassembler.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Constant(_) => "CONSTANT",
            OpCode::Nil => "NIL",
            OpCode::True => "TRUE",
            OpCode::False => "FALSE",
            OpCode::Negate => "NEGATE",
            OpCode::Not => "NOT",
            OpCode::Add => "ADD",
            OpCode::Subtract => "SUBTRACT",
            OpCode::Multiply => "MULTIPLY",
            OpCode::Divide => "DIVIDE",
            OpCode::Equal => "EQUAL",
            OpCode::Greater => "GREATER",
            OpCode::Less => "LESS",
            OpCode::DeclGlobal(_) => "DECL_GLOBAL",
            OpCode::SetDeclGlobal(_) => "SET_DECL_GLOBAL",
            OpCode::GetDeclGlobal(_) => "GET_DECL_GLOBAL",
            OpCode::DeclLocal(_) => "DECL_LOCAL",
            OpCode::SetDeclLocal(_) => "SET_DECL_LOCAL",
            OpCode::GetDeclLocal(_) => "GET_DECL_LOCAL",
            OpCode::Print => "PRINT",
            OpCode::Pop => "POP",
            OpCode::Return => "RETURN",
        }
    }

    /// The constant pool index this instruction refers to, if any.
    #[inline]
    pub fn constant_operand(&self) -> Option<u16> {
        match self {
            OpCode::Constant(idx)
            | OpCode::DeclGlobal(idx)
            | OpCode::SetDeclGlobal(idx)
            | OpCode::GetDeclGlobal(idx) => Some(*idx),
            _ => None,
        }
    }

    /// The stack slot this instruction refers to, if any.
    #[inline]
    pub fn slot_operand(&self) -> Option<u16> {
        match self {
            OpCode::DeclLocal(slot) | OpCode::SetDeclLocal(slot) | OpCode::GetDeclLocal(slot) => {
                Some(*slot)
            }
            _ => None,
        }
    }
}
