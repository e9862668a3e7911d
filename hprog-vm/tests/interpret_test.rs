// hprog-vm - End-to-end interpreter tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;

use common::*;

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn test_print_arithmetic() {
    assert_prints!("print(1 + 2);", "3");
    assert_prints!("print(2 * 3 + 4);", "10");
    assert_prints!("print(2 * (3 + 4));", "14");
    assert_prints!("print(10 - 4 - 3);", "3");
    assert_prints!("print(-5 + 2);", "-3");
}

#[test]
fn test_mixed_numeric_types() {
    assert_prints!("print(1 + 2.5);", "3.5");
    assert_prints!("print(2.5 * 2);", "5.0");
    assert_prints!("print(.5 + 11.);", "11.5");
}

#[test]
fn test_integer_division_truncates() {
    assert_prints!("print(1 / 2);", "0");
    assert_prints!("print(7 / 2);", "3");
    assert_prints!("print(1.0 / 2);", "0.5");
}

#[test]
fn test_comparisons() {
    assert_prints!("print(3 >= 3);", "true");
    assert_prints!("print(3 <= 2);", "false");
    assert_prints!("print(1 < 2);", "true");
    assert_prints!("print(2 > 2.5);", "false");
    assert_prints!("print(1 == 1.0);", "true");
    assert_prints!("print(1 != 2);", "true");
    assert_prints!("print(\"a\" == \"a\");", "true");
    assert_prints!("print(nil == nil);", "true");
    assert_prints!("print(nil == false);", "false");
    assert_prints!("print(\"1\" == 1);", "false");
}

#[test]
fn test_unary_operators() {
    assert_prints!("print(!true);", "false");
    assert_prints!("print(!(1 < 2));", "false");
    assert_prints!("print(-2.5);", "-2.5");
    assert_prints!("print(-true);", "false");
}

#[test]
fn test_literals_and_strings() {
    assert_prints!("print(nil);", "nil");
    assert_prints!("print(true);", "true");
    assert_prints!("print(\"hello\");", "hello");
    assert_prints!("print(\"foo\" + \"bar\");", "foobar");
    assert_prints!("print();", "nil");
}

#[test]
fn test_exponent_is_not_one_number() {
    // `1e5` lexes as a malformed number, not a float.
    let (status, _) = run("print(1e5);");
    assert_eq!(status, ExecutionResult::CompileError);
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn test_global_declaration_and_read() {
    assert_prints!("decl a = 10; print(a);", "10");
    assert_prints!("decl a; print(a);", "nil");
}

#[test]
fn test_global_assignment() {
    assert_prints!("decl a = 10; a = 20; print(a);", "20");
    assert_prints!("decl a = 1; decl b = 2; a = b = 3; print(a); print(b);", "3", "3");
}

#[test]
fn test_assignment_is_an_expression() {
    assert_prints!("decl a = 1; print(a = 5);", "5");
}

#[test]
fn test_nested_shadowing() {
    assert_prints!(
        "{ decl a = 1; { decl a = 2; print(a); } print(a); }",
        "2",
        "1"
    );
}

#[test]
fn test_local_shadows_global() {
    assert_prints!("decl a = \"global\"; { decl a = \"local\"; print(a); } print(a);", "local", "global");
}

#[test]
fn test_local_assignment() {
    assert_prints!("{ decl a = 1; a = a + 41; print(a); }", "42");
}

#[test]
fn test_locals_across_sibling_blocks() {
    assert_prints!(
        "{ decl a = 1; { decl b = 2; print(a + b); } { decl c = 3; print(a + c); } }",
        "3",
        "4"
    );
}

#[test]
fn test_local_initialized_from_outer_local() {
    assert_prints!("{ decl a = 1; { decl b = a + 1; print(b); } }", "2");
}

#[test]
fn test_block_reads_globals() {
    assert_prints!("decl g = 5; { decl l = g * 2; g = l; } print(g);", "10");
}

#[test]
fn test_read_local_in_own_initializer_fails_to_compile() {
    let (status, out) = run("{ decl a = a; }");
    assert_eq!(status, ExecutionResult::CompileError);
    assert!(out.is_empty());
}

#[test]
fn test_compile_error_has_no_side_effects() {
    let (status, out) = run("print(1); print(;");
    assert_eq!(status, ExecutionResult::CompileError);
    assert_eq!(out, "");
}

// =============================================================================
// Automatic semicolon insertion
// =============================================================================

#[test]
fn test_newline_ends_statement() {
    assert_prints!("decl a = 1\nprint(a)", "1");
    assert_prints!("print(1 + 2)", "3");
}

#[test]
fn test_operator_continues_line() {
    assert_prints!("decl a = 1 +\n  2\nprint(a)", "3");
}

#[test]
fn test_comments_are_ignored() {
    assert_prints!("# leading comment\nprint(1) # trailing\n# done", "1");
}

// =============================================================================
// Globals and VM reuse
// =============================================================================

#[test]
fn test_globals_persist_across_interpret_calls() {
    let mut vm = new_vm();
    assert_eq!(run_in(&mut vm, "decl a = 1;"), ExecutionResult::Ok);
    assert_eq!(run_in(&mut vm, "a = a + 1;"), ExecutionResult::Ok);
    assert_eq!(run_in(&mut vm, "print(a);"), ExecutionResult::Ok);
    assert_eq!(printed(&vm), "2\n");
    assert_eq!(vm.global("a"), Some(&Value::Int(2)));
}

#[test]
fn test_fresh_vm_starts_clean() {
    let mut vm = new_vm();
    assert_eq!(run_in(&mut vm, "decl a = 1;"), ExecutionResult::Ok);
    let (status, _) = run("print(a);");
    assert_eq!(status, ExecutionResult::RuntimeError);
}

#[test]
fn test_fresh_vms_are_deterministic() {
    let source = "decl a = 3; { decl b = a * 2.5; print(b); } print(a / 2);";
    let first = run(source);
    let second = run(source);
    assert_eq!(first, second);
    assert_eq!(first.1, "7.5\n1\n");
}

#[test]
fn test_last_error_is_reset() {
    let mut vm = new_vm();
    assert_eq!(run_in(&mut vm, "print(x);"), ExecutionResult::RuntimeError);
    assert!(vm.last_error().is_some());
    assert_eq!(run_in(&mut vm, "print(1);"), ExecutionResult::Ok);
    assert!(vm.last_error().is_none());
}

#[test]
fn test_vm_recovers_after_runtime_error() {
    let mut vm = new_vm();
    assert_eq!(
        run_in(&mut vm, "{ decl a = 1; print(a + nil); }"),
        ExecutionResult::RuntimeError
    );
    assert_eq!(run_in(&mut vm, "{ decl b = 2; print(b); }"), ExecutionResult::Ok);
    assert_eq!(printed(&vm), "2\n");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_recovery_reports_every_bad_statement() {
    let mut vm = new_vm_with(Config::default().with_statement_recovery(true));
    assert_eq!(
        run_in(&mut vm, "print(;\nprint(1);\ndecl = 2;"),
        ExecutionResult::CompileError
    );
    match vm.last_error() {
        Some(InterpretError::Compile(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected compile errors, got {:?}", other),
    }
}

#[test]
fn test_without_recovery_only_first_error() {
    let mut vm = new_vm();
    run_in(&mut vm, "print(;\nprint(1);\ndecl = 2;");
    match vm.last_error() {
        Some(InterpretError::Compile(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.first().map(|d| d.line), Some(1));
        }
        other => panic!("expected compile errors, got {:?}", other),
    }
}

#[test]
fn test_disassembly_written_before_output() {
    let mut vm = new_vm_with(Config::default().with_disassembly(true));
    assert_eq!(run_in(&mut vm, "print(1);"), ExecutionResult::Ok);
    let out = printed(&vm);
    assert!(out.starts_with("== script ==\n"));
    assert!(out.contains("CONSTANT"));
    assert!(out.ends_with("RETURN\n1\n"));
}
