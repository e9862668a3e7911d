// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic and comparison opcode handlers: Negate, Not, Add, Subtract,
//! Multiply, Divide, Equal, Greater, Less.

use std::io::Write;

use hprog_parser::Value;
use hprog_parser::value;

use crate::opcode::OpCode;
use crate::vm::{Result, RuntimeError, VM};

impl<W: Write> VM<W> {
    /// Execute an arithmetic or comparison opcode.
    pub(crate) fn execute_arithmetic(&mut self, op: OpCode) -> Result<()> {
        match op {
            OpCode::Negate => self.unary_op(Value::negate),
            OpCode::Not => self.unary_op(Value::not),
            OpCode::Add => self.binary_op(Value::add),
            OpCode::Subtract => self.binary_op(Value::subtract),
            OpCode::Multiply => self.binary_op(Value::multiply),
            OpCode::Divide => self.binary_op(Value::divide),
            OpCode::Equal => self.binary_op(|a, b| Ok(Value::Bool(a.equals(b)))),
            OpCode::Greater => self.binary_op(|a, b| a.greater(b).map(Value::Bool)),
            OpCode::Less => self.binary_op(|a, b| a.less(b).map(Value::Bool)),
            _ => Err(RuntimeError::Internal(format!(
                "execute_arithmetic: unexpected opcode {:?}",
                op
            ))),
        }
    }

    fn unary_op<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&Value) -> value::Result<Value>,
    {
        let val = self.stack.pop()?;
        let result = f(&val)?;
        self.stack.push(result)
    }

    /// Pop the right operand, then the left, and push `f(left, right)`.
    fn binary_op<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&Value, &Value) -> value::Result<Value>,
    {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = f(&a, &b)?;
        self.stack.push(result)
    }
}
