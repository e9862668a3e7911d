// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Stack-based virtual machine for executing hprog bytecode.

pub mod error;
pub mod handlers;
pub mod stack;

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use hprog_parser::Value;
use tracing::{debug, trace};

use crate::chunk::Chunk;
use crate::compiler::Compiler;
use crate::config::Config;
use crate::disasm::disassemble;
use crate::opcode::OpCode;

pub use error::{ExecutionResult, InterpretError, Result, RuntimeError, RuntimeFault};
pub use stack::ValueStack;

/// The hprog virtual machine.
///
/// Global variables live as long as the VM does, so a host that feeds
/// several sources to one VM (a REPL, say) sees earlier declarations.
/// `print` output goes to `W`, standard output by default.
pub struct VM<W: Write = io::Stdout> {
    /// Value stack. Locals occupy its bottom slots.
    stack: ValueStack,

    /// The chunk being executed.
    chunk: Chunk,

    /// Index of the next instruction in `chunk`.
    ip: usize,

    /// Global variables.
    globals: HashMap<Rc<str>, Value>,

    out: W,

    config: Config,

    last_error: Option<InterpretError>,
}

impl VM {
    /// Create a new VM writing to standard output.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new VM with the given settings, writing to standard output.
    pub fn with_config(config: Config) -> Self {
        Self::with_output_and_config(io::stdout(), config)
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> VM<W> {
    /// Create a new VM that writes `print` output to `out`.
    pub fn with_output(out: W) -> Self {
        Self::with_output_and_config(out, Config::default())
    }

    pub fn with_output_and_config(out: W, config: Config) -> Self {
        Self {
            stack: ValueStack::new(config.max_stack_depth),
            chunk: Chunk::new(),
            ip: 0,
            globals: HashMap::new(),
            out,
            config,
            last_error: None,
        }
    }

    /// Compile and run `source`, reporting the outcome as a status.
    ///
    /// The detailed failure, if any, is kept until the next call and can be
    /// read back with [`VM::last_error`].
    pub fn interpret(&mut self, source: &str) -> ExecutionResult {
        self.last_error = None;
        match self.try_interpret(source) {
            Ok(()) => {
                debug!("interpret finished");
                ExecutionResult::Ok
            }
            Err(err) => {
                debug!(error = %err, "interpret failed");
                let status = ExecutionResult::from(&err);
                self.last_error = Some(err);
                status
            }
        }
    }

    /// Compile and run `source`, returning the typed failure.
    ///
    /// A compile error means nothing was executed.
    pub fn try_interpret(&mut self, source: &str) -> std::result::Result<(), InterpretError> {
        let chunk = Compiler::new(source)
            .with_recovery(self.config.statement_recovery)
            .compile()?;

        if self.config.disassemble {
            self.out
                .write_all(disassemble(&chunk, "script").as_bytes())
                .map_err(|e| RuntimeFault {
                    error: RuntimeError::Output(e.to_string()),
                    location: Default::default(),
                })?;
        }

        if chunk.is_empty() {
            return Ok(());
        }
        self.run(chunk)?;
        Ok(())
    }

    /// The failure recorded by the most recent [`VM::interpret`] call.
    pub fn last_error(&self) -> Option<&InterpretError> {
        self.last_error.as_ref()
    }

    /// Look up a global variable.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Number of values currently on the operand stack.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute a compiled chunk from its first instruction.
    pub fn run(&mut self, chunk: Chunk) -> std::result::Result<(), RuntimeFault> {
        debug!(instructions = chunk.len(), "run chunk");
        self.chunk = chunk;
        self.ip = 0;
        self.stack.clear();

        self.run_loop().map_err(|error| {
            // ip already points past the failing instruction.
            let location = self
                .chunk
                .get_line_info(self.ip.saturating_sub(1))
                .unwrap_or_default();
            RuntimeFault { error, location }
        })
    }

    fn run_loop(&mut self) -> Result<()> {
        loop {
            let op = self.read_op()?;
            trace!(ip = self.ip - 1, ?op, depth = self.stack.len(), "dispatch");

            match op {
                // Constants & literals - handled inline (simple operations)
                OpCode::Constant(idx) => {
                    let val = self.get_constant(idx)?;
                    self.stack.push(val)?;
                }
                OpCode::Nil => self.stack.push(Value::Nil)?,
                OpCode::True => self.stack.push(Value::Bool(true))?,
                OpCode::False => self.stack.push(Value::Bool(false))?,

                // Arithmetic & comparison - delegated to handler
                OpCode::Negate
                | OpCode::Not
                | OpCode::Add
                | OpCode::Subtract
                | OpCode::Multiply
                | OpCode::Divide
                | OpCode::Equal
                | OpCode::Greater
                | OpCode::Less => {
                    self.execute_arithmetic(op)?;
                }

                // Variables - delegated to handler
                OpCode::DeclGlobal(_)
                | OpCode::SetDeclGlobal(_)
                | OpCode::GetDeclGlobal(_)
                | OpCode::DeclLocal(_)
                | OpCode::SetDeclLocal(_)
                | OpCode::GetDeclLocal(_) => {
                    self.execute_variables(op)?;
                }

                OpCode::Print => {
                    let val = self.stack.pop()?;
                    writeln!(self.out, "{}", val).map_err(|e| RuntimeError::Output(e.to_string()))?;
                }
                OpCode::Pop => {
                    self.stack.pop()?;
                }
                OpCode::Return => return Ok(()),
            }
        }
    }

    fn read_op(&mut self) -> Result<OpCode> {
        let op = self
            .chunk
            .code
            .get(self.ip)
            .copied()
            .ok_or(RuntimeError::Internal("IP out of bounds".into()))?;
        self.ip += 1;
        Ok(op)
    }

    pub(crate) fn get_constant(&self, idx: u16) -> Result<Value> {
        self.chunk
            .constants
            .get(idx as usize)
            .cloned()
            .ok_or(RuntimeError::Internal(
                "Constant index out of bounds".into(),
            ))
    }
}
