// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Value stack for the VM.

use hprog_parser::Value;

use super::{Result, RuntimeError};
use crate::config::DEFAULT_MAX_STACK_DEPTH;

/// The VM's value stack, bounded to a maximum depth.
#[derive(Debug)]
pub struct ValueStack {
    values: Vec<Value>,
    max_depth: usize,
}

impl ValueStack {
    /// Create a new empty stack holding at most `max_depth` values.
    pub fn new(max_depth: usize) -> Self {
        Self {
            values: Vec::with_capacity(max_depth.min(DEFAULT_MAX_STACK_DEPTH)),
            max_depth,
        }
    }

    /// Push a value onto the stack.
    #[inline]
    pub fn push(&mut self, value: Value) -> Result<()> {
        if self.values.len() >= self.max_depth {
            return Err(RuntimeError::StackOverflow(self.max_depth));
        }
        self.values.push(value);
        Ok(())
    }

    /// Pop a value from the stack.
    #[inline]
    pub fn pop(&mut self) -> Result<Value> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Peek at a value on the stack without removing it.
    /// `distance` is the offset from the top (0 = top).
    #[inline]
    pub fn peek(&self, distance: usize) -> Result<Value> {
        if distance >= self.values.len() {
            return Err(RuntimeError::StackUnderflow);
        }
        Ok(self.values[self.values.len() - 1 - distance].clone())
    }

    /// Get a value at an absolute index.
    #[inline]
    pub fn get(&self, index: usize) -> Result<Value> {
        self.values
            .get(index)
            .cloned()
            .ok_or(RuntimeError::StackUnderflow)
    }

    /// Set a value at an absolute index.
    #[inline]
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or(RuntimeError::StackUnderflow)?;
        *slot = value;
        Ok(())
    }

    /// Get the current stack size.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Default for ValueStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STACK_DEPTH)
    }
}
