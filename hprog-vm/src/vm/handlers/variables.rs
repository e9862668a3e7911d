// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Variable opcode handlers: DeclGlobal, SetDeclGlobal, GetDeclGlobal,
//! DeclLocal, SetDeclLocal, GetDeclLocal.

use std::io::Write;
use std::rc::Rc;

use hprog_parser::Value;

use crate::opcode::OpCode;
use crate::vm::{Result, RuntimeError, VM};

impl<W: Write> VM<W> {
    /// Execute a variable opcode.
    pub(crate) fn execute_variables(&mut self, op: OpCode) -> Result<()> {
        match op {
            OpCode::DeclGlobal(idx) => {
                let name = self.global_name(idx)?;
                if self.globals.contains_key(&name) {
                    return Err(RuntimeError::AlreadyDeclared(name.to_string()));
                }
                let val = self.stack.peek(0)?;
                self.globals.insert(name, val);
            }
            OpCode::SetDeclGlobal(idx) => {
                let name = self.global_name(idx)?;
                let val = self.stack.peek(0)?;
                match self.globals.get_mut(&name) {
                    Some(slot) => *slot = val,
                    None => return Err(RuntimeError::UndefinedVariable(name.to_string())),
                }
            }
            OpCode::GetDeclGlobal(idx) => {
                let name = self.global_name(idx)?;
                let val = self
                    .globals
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))?;
                self.stack.push(val)?;
            }
            OpCode::DeclLocal(slot) => {
                // The initializer must have landed exactly in the local's slot.
                let depth = self.stack.len();
                if depth != slot as usize + 1 {
                    return Err(RuntimeError::Internal(format!(
                        "local slot {} declared at stack depth {}",
                        slot, depth
                    )));
                }
            }
            OpCode::SetDeclLocal(slot) => {
                let val = self.stack.peek(0)?;
                self.stack.set(slot as usize, val)?;
            }
            OpCode::GetDeclLocal(slot) => {
                let val = self.stack.get(slot as usize)?;
                self.stack.push(val)?;
            }
            _ => {
                return Err(RuntimeError::Internal(format!(
                    "execute_variables: unexpected opcode {:?}",
                    op
                )));
            }
        }
        Ok(())
    }

    /// Global names are stored as string constants.
    fn global_name(&self, idx: u16) -> Result<Rc<str>> {
        match self.get_constant(idx)? {
            Value::Str(name) => Ok(name),
            other => Err(RuntimeError::Internal(format!(
                "global name must be a string, got {}",
                other.type_name()
            ))),
        }
    }
}
