// hprog-vm - Bytecode compiler and virtual machine for the hprog programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Opcode handlers, organised by category.

pub mod arithmetic;
pub mod variables;
