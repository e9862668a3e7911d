// hprog-vm - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for hprog-vm integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`run`] - Interpret source in a fresh VM, capturing printed output
//! - [`run_in`] - Interpret source in an existing VM
//! - [`new_vm`] - Create a VM that prints into a buffer
//! - [`printed`] - Read back everything a VM has printed

#[allow(unused_imports)]
pub use hprog_parser::Value;
#[allow(unused_imports)]
pub use hprog_vm::{
    CompileError, Config, ExecutionResult, InterpretError, RuntimeError, VM,
};

/// A VM that prints into an in-memory buffer.
pub type TestVm = VM<Vec<u8>>;

/// Create a VM that prints into a buffer.
#[must_use]
pub fn new_vm() -> TestVm {
    VM::with_output(Vec::new())
}

/// Create a buffered VM with the given settings.
#[must_use]
#[allow(dead_code)]
pub fn new_vm_with(config: Config) -> TestVm {
    VM::with_output_and_config(Vec::new(), config)
}

/// Everything printed so far.
#[must_use]
pub fn printed(vm: &TestVm) -> String {
    String::from_utf8_lossy(vm.output()).into_owned()
}

/// Interpret `source` in a fresh VM.
///
/// # Returns
///
/// The execution status and everything printed before it finished.
#[must_use]
pub fn run(source: &str) -> (ExecutionResult, String) {
    let mut vm = new_vm();
    let status = vm.interpret(source);
    (status, printed(&vm))
}

/// Interpret `source` in an existing VM, returning only the status.
#[allow(dead_code)]
pub fn run_in(vm: &mut TestVm, source: &str) -> ExecutionResult {
    vm.interpret(source)
}

/// The runtime error recorded by the last `interpret` call, if any.
#[must_use]
#[allow(dead_code)]
pub fn runtime_error(vm: &TestVm) -> Option<&RuntimeError> {
    match vm.last_error()? {
        InterpretError::Runtime(fault) => Some(&fault.error),
        InterpretError::Compile(_) => None,
    }
}

/// Assert that source prints exactly the given lines.
#[macro_export]
macro_rules! assert_prints {
    ($src:expr, $($line:expr),* $(,)?) => {{
        let (status, out) = $crate::common::run($src);
        assert_eq!(status, $crate::common::ExecutionResult::Ok, "source: {}", $src);
        let expected: Vec<String> = vec![$($line.to_string()),*];
        let actual: Vec<String> = out.lines().map(str::to_string).collect();
        assert_eq!(actual, expected, "source: {}", $src);
    }};
}
