// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Human-readable bytecode listings.
//!
//! Each line shows the instruction offset, its source line (`|` when the
//! line repeats), the mnemonic and its operand. Constant-bearing
//! instructions also show the constant they refer to:
//!
//! ```text
//! == script ==
//! 0000    1 CONSTANT            1 '10'
//! 0001    | DECL_GLOBAL         0 'a'
//! 0002    | POP
//! ```

use std::fmt::Write;

use crate::chunk::Chunk;

/// Disassemble a whole chunk under a `== label ==` header.
pub fn disassemble(chunk: &Chunk, label: &str) -> String {
    let mut out = format!("== {} ==\n", label);
    for offset in 0..chunk.len() {
        out.push_str(&disassemble_instruction(chunk, offset));
        out.push('\n');
    }
    out
}

/// Disassemble the instruction at `offset`.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> String {
    let mut out = format!("{:04} ", offset);

    let line = chunk.get_line_info(offset).map(|info| info.line);
    let previous_line = offset
        .checked_sub(1)
        .and_then(|prev| chunk.get_line_info(prev))
        .map(|info| info.line);
    match line {
        Some(_) if line == previous_line => out.push_str("   | "),
        Some(l) => {
            let _ = write!(out, "{:4} ", l);
        }
        None => out.push_str("   ? "),
    }

    let Some(op) = chunk.code.get(offset) else {
        out.push_str("<out of range>");
        return out;
    };

    if let Some(idx) = op.constant_operand() {
        let _ = match chunk.constants.get(idx as usize) {
            Some(constant) => write!(out, "{:<16} {:4} '{}'", op.name(), idx, constant),
            None => write!(out, "{:<16} {:4} <invalid>", op.name(), idx),
        };
    } else if let Some(slot) = op.slot_operand() {
        let _ = write!(out, "{:<16} {:4}", op.name(), slot);
    } else {
        out.push_str(op.name());
    }
    out
}
