// hprog - A small expression-and-statement language with a bytecode VM
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hprog_parser::dump_tokens;
use hprog_vm::config::DEFAULT_MAX_STACK_DEPTH;
use hprog_vm::{Config, ExecutionResult, VM};

/// Exit status for source that failed to compile.
const EXIT_COMPILE_ERROR: i32 = 65;
/// Exit status for a program that failed while running.
const EXIT_RUNTIME_ERROR: i32 = 70;
/// Exit status when the source file cannot be read.
const EXIT_IO_ERROR: i32 = 74;

#[derive(Parser, Debug)]
#[command(name = "hprog", version)]
#[command(about = "Run an hprog script, or start a REPL when no file is given")]
struct Args {
    /// Script to run
    file: Option<PathBuf>,

    /// Print the token stream of each source before compiling it
    #[arg(long = "dump-tokens")]
    dump_tokens: bool,

    /// Print the bytecode of each compiled chunk before running it
    #[arg(long = "dump-bytecode")]
    dump_bytecode: bool,

    /// Report every bad statement instead of stopping at the first error
    #[arg(long)]
    recover: bool,

    /// Maximum operand stack depth
    #[arg(long = "max-stack", default_value_t = DEFAULT_MAX_STACK_DEPTH)]
    max_stack: usize,
}

impl Args {
    fn config(&self) -> Config {
        Config::default()
            .with_max_stack_depth(self.max_stack)
            .with_statement_recovery(self.recover)
            .with_disassembly(self.dump_bytecode)
    }
}

/// Initialize logging. `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let args = Args::parse();
    let mut vm = VM::with_config(args.config());

    match &args.file {
        Some(path) => run_file(&mut vm, path, args.dump_tokens),
        None => run_repl(&mut vm, args.dump_tokens),
    }
}

/// Interpret a whole file once and exit with its status.
fn run_file(vm: &mut VM, path: &Path, show_tokens: bool) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading '{}': {}", path.display(), e);
            process::exit(EXIT_IO_ERROR);
        }
    };

    debug!(path = %path.display(), bytes = source.len(), "running file");
    match execute(vm, &source, show_tokens) {
        ExecutionResult::Ok => {}
        ExecutionResult::CompileError => process::exit(EXIT_COMPILE_ERROR),
        ExecutionResult::RuntimeError => process::exit(EXIT_RUNTIME_ERROR),
    }
}

/// Run the interactive REPL. One VM serves the whole session, so globals
/// declared on one line are visible on the next.
fn run_repl(vm: &mut VM, show_tokens: bool) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("hprog> ");
        if let Err(e) = io::stdout().flush() {
            warn!(error = %e, "failed to flush prompt");
        }

        match lines.next() {
            None => {
                println!();
                break;
            }
            Some(Ok(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                execute(vm, &line, show_tokens);
            }
            Some(Err(e)) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
}

/// Interpret one source and print its diagnostics, if any.
fn execute(vm: &mut VM, source: &str, show_tokens: bool) -> ExecutionResult {
    if show_tokens {
        print!("{}", dump_tokens(source));
    }
    let status = vm.interpret(source);
    if let Some(err) = vm.last_error() {
        eprintln!("{}", err);
    }
    status
}
