// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! VM configuration.

/// Default maximum operand stack depth.
pub const DEFAULT_MAX_STACK_DEPTH: usize = 256;

/// Settings for a [`crate::VM`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pushing beyond this many values is a stack overflow.
    pub max_stack_depth: usize,
    /// Keep compiling after an error to report one diagnostic per bad
    /// statement.
    pub statement_recovery: bool,
    /// Write a disassembly of each compiled chunk to the output before it
    /// runs.
    pub disassemble: bool,
}

impl Config {
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    pub fn with_statement_recovery(mut self, enabled: bool) -> Self {
        self.statement_recovery = enabled;
        self
    }

    pub fn with_disassembly(mut self, enabled: bool) -> Self {
        self.disassemble = enabled;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            statement_recovery: false,
            disassemble: false,
        }
    }
}
