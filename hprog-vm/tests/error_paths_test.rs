// hprog-vm - VM error path tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tests for VM error paths:
//! - Undefined and redeclared variables
//! - Type errors
//! - Division by zero and integer overflow
//! - Stack overflow and nesting limits
//! - Error locations

mod common;

use common::*;
use hprog_vm::{LineInfo, MAX_NESTING};

fn run_err(src: &str) -> (RuntimeError, LineInfo) {
    let mut vm = new_vm();
    let status = vm.interpret(src);
    assert_eq!(status, ExecutionResult::RuntimeError, "source: {}", src);
    match vm.last_error() {
        Some(InterpretError::Runtime(fault)) => (fault.error.clone(), fault.location),
        other => panic!("expected runtime error for '{}', got {:?}", src, other),
    }
}

fn expect_error(src: &str, expected_pattern: &str) {
    let (err, _) = run_err(src);
    let message = err.to_string();
    assert!(
        message.contains(expected_pattern),
        "Error '{}' should contain '{}' for source: {}",
        message,
        expected_pattern,
        src
    );
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn undefined_global_read() {
    let (err, _) = run_err("print(a);");
    assert_eq!(err, RuntimeError::UndefinedVariable("a".into()));
}

#[test]
fn undefined_global_assignment() {
    let (err, _) = run_err("a = 1;");
    assert_eq!(err, RuntimeError::UndefinedVariable("a".into()));
}

#[test]
fn global_read_in_own_initializer() {
    expect_error("decl a = a;", "undefined variable 'a'");
}

#[test]
fn duplicate_global_declaration() {
    let (err, _) = run_err("decl a = 1; decl a = 2;");
    assert_eq!(err, RuntimeError::AlreadyDeclared("a".into()));
}

#[test]
fn duplicate_global_across_interpret_calls() {
    let mut vm = new_vm();
    assert_eq!(vm.interpret("decl a = 1;"), ExecutionResult::Ok);
    assert_eq!(vm.interpret("decl a = 2;"), ExecutionResult::RuntimeError);
    assert_eq!(vm.global("a"), Some(&Value::Int(1)));
}

// =============================================================================
// Type errors
// =============================================================================

#[test]
fn add_string_and_number() {
    expect_error("print(\"a\" + 1);", "type error");
}

#[test]
fn subtract_strings() {
    expect_error("print(\"a\" - \"b\");", "type error");
}

#[test]
fn compare_booleans() {
    expect_error("print(true < false);", "type error");
}

#[test]
fn not_on_number() {
    expect_error("print(!1);", "expected boolean");
}

#[test]
fn negate_string() {
    expect_error("print(-\"a\");", "type error");
}

#[test]
fn arithmetic_on_nil() {
    expect_error("decl a; print(a * 2);", "type error");
}

// =============================================================================
// Numeric errors
// =============================================================================

#[test]
fn division_by_zero_int() {
    let (err, _) = run_err("print(10 / 0);");
    assert_eq!(err, RuntimeError::DivisionByZero);
}

#[test]
fn float_division_by_zero_is_not_an_error() {
    let (status, out) = run("print(1.0 / 0);");
    assert_eq!(status, ExecutionResult::Ok);
    assert_eq!(out, "inf\n");
}

#[test]
fn integer_overflow() {
    let (err, _) = run_err("print(9223372036854775807 + 1);");
    assert_eq!(err, RuntimeError::IntegerOverflow);
    expect_error("decl big = 3037000500; print(big * big);", "integer overflow");
}

// =============================================================================
// Stack limits
// =============================================================================

#[test]
fn stack_overflow() {
    let mut vm = new_vm_with(Config::default().with_max_stack_depth(4));
    let status = vm.interpret("{ decl a = 1; decl b = 2; print(a + b); }");
    assert_eq!(status, ExecutionResult::Ok);
    let status = vm.interpret("{ decl a = 1; decl b = 2; decl c = 3; decl d = 4; print(a + d); }");
    assert_eq!(status, ExecutionResult::RuntimeError);
    match vm.last_error() {
        Some(InterpretError::Runtime(fault)) => {
            assert_eq!(fault.error, RuntimeError::StackOverflow(4));
        }
        other => panic!("expected stack overflow, got {:?}", other),
    }
}

#[test]
fn deep_expression_within_default_limit() {
    let source = format!("print({}1{});", "(".repeat(100), ")".repeat(100));
    let (status, out) = run(&source);
    assert_eq!(status, ExecutionResult::Ok);
    assert_eq!(out, "1\n");
}

fn first_compile_error(vm: &TestVm) -> Option<&CompileError> {
    match vm.last_error()? {
        InterpretError::Compile(errs) => errs.first().map(|d| &d.error),
        InterpretError::Runtime(_) => None,
    }
}

#[test]
fn deeply_nested_parentheses_fail_to_compile() {
    let mut vm = new_vm();
    let n = 100_000;
    let source = format!("print({}1{});", "(".repeat(n), ")".repeat(n));
    assert_eq!(vm.interpret(&source), ExecutionResult::CompileError);
    assert_eq!(
        first_compile_error(&vm),
        Some(&CompileError::TooDeeplyNested(MAX_NESTING))
    );
    // The VM is still usable afterwards.
    assert_eq!(vm.interpret("print(1);"), ExecutionResult::Ok);
    assert_eq!(printed(&vm), "1\n");
}

#[test]
fn long_unary_chain_fails_to_compile() {
    let mut vm = new_vm();
    let source = format!("print({}1);", "-".repeat(200_000));
    assert_eq!(vm.interpret(&source), ExecutionResult::CompileError);
    assert_eq!(
        first_compile_error(&vm),
        Some(&CompileError::TooDeeplyNested(MAX_NESTING))
    );
}

#[test]
fn deeply_nested_blocks_fail_to_compile() {
    let mut vm = new_vm();
    let source = format!("{}{}", "{".repeat(100_000), "}".repeat(100_000));
    assert_eq!(vm.interpret(&source), ExecutionResult::CompileError);
    assert_eq!(
        first_compile_error(&vm),
        Some(&CompileError::TooDeeplyNested(MAX_NESTING))
    );
}

// =============================================================================
// Locations and partial output
// =============================================================================

#[test]
fn error_reports_line_and_column() {
    let (_, location) = run_err("decl a = 1;\nprint(a + b);");
    assert_eq!(location.line, 2);
    assert_eq!(location.column, 11);
}

#[test]
fn output_before_error_is_kept() {
    let mut vm = new_vm();
    assert_eq!(
        vm.interpret("print(1); print(missing); print(2);"),
        ExecutionResult::RuntimeError
    );
    assert_eq!(printed(&vm), "1\n");
}

#[test]
fn fault_display_includes_location() {
    let mut vm = new_vm();
    vm.interpret("print(nope);");
    let message = vm.last_error().map(|e| e.to_string()).unwrap_or_default();
    assert_eq!(message, "[line:1, col:7] Runtime error: undefined variable 'nope'");
}
