//! Integration tests for the stack VM CLI.
//!
//! These tests invoke the `stackvm` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn stackvm() -> Command {
    Command::cargo_bin("stackvm").unwrap()
}

/// Return the workspace root (parent of stackvm-cli/).
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Return the absolute path to a sample program.
fn test_program(name: &str) -> PathBuf {
    workspace_root().join("tests/programs").join(name)
}

/// Helper: assemble a sample `.svm` file into `dir`, returning the bytecode path.
fn assemble_to_temp(dir: &TempDir, name: &str) -> PathBuf {
    let output = dir.path().join("out.bc");
    stackvm()
        .args([
            "assemble",
            test_program(name).to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    output
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    stackvm()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: stackvm"));
}

#[test]
fn help_flag_exits_0() {
    stackvm()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_option_exits_1() {
    stackvm()
        .arg("--frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown option"));
}

// ---- Run ----

#[test]
fn bare_path_runs_program() {
    stackvm()
        .arg(test_program("add_print.bc"))
        .assert()
        .success()
        .stdout("7");
}

#[test]
fn run_prints_characters() {
    stackvm()
        .arg("run")
        .arg(test_program("hello.bc"))
        .assert()
        .success()
        .stdout("Hello\n");
}

#[test]
fn run_function_call() {
    stackvm()
        .arg("run")
        .arg(test_program("call.bc"))
        .assert()
        .success()
        .stdout("42");
}

#[test]
fn run_missing_file_exits_1() {
    stackvm()
        .args(["run", "nonexistent.bc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_extra_argument_exits_1() {
    stackvm()
        .arg(test_program("add_print.bc"))
        .arg("extra")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn unknown_opcode_is_a_load_error() {
    stackvm()
        .arg(test_program("bad_opcode.bc"))
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("line 2: unknown opcode 77"));
}

#[test]
fn truncated_operands_are_a_load_error() {
    stackvm()
        .arg(test_program("truncated.bc"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unexpected end of input"));
}

#[test]
fn division_by_zero_exits_3_after_earlier_output() {
    stackvm()
        .arg(test_program("div_zero.bc"))
        .assert()
        .failure()
        .code(3)
        .stdout("1")
        .stderr(predicate::str::contains("runtime error: division by zero"));
}

#[test]
fn runaway_push_overflows() {
    stackvm()
        .arg(test_program("overflow.bc"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("capacity 2048"));
}

#[test]
fn stack_size_flag_limits_capacity() {
    stackvm()
        .args(["run", "--stack-size", "8"])
        .arg(test_program("overflow.bc"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("capacity 8"));
}

#[test]
fn trace_flag_logs_instructions_to_stderr() {
    stackvm()
        .env_remove("RUST_LOG")
        .args(["run", "--trace"])
        .arg(test_program("add_print.bc"))
        .assert()
        .success()
        .stdout("7")
        .stderr(predicate::str::contains("PRINTINT"));
}

#[test]
fn trace_includes_live_stack() {
    stackvm()
        .env_remove("RUST_LOG")
        .args(["run", "--trace"])
        .arg(test_program("add_print.bc"))
        .assert()
        .success()
        .stderr(predicate::str::contains("stack=[3, 4]"));
}

#[test]
fn huge_stack_size_runs_without_reserving_it() {
    stackvm()
        .args(["run", "--stack-size", "4000000000"])
        .arg(test_program("add_print.bc"))
        .assert()
        .success()
        .stdout("7");
}

#[test]
fn quiet_by_default() {
    stackvm()
        .env_remove("RUST_LOG")
        .arg(test_program("add_print.bc"))
        .assert()
        .success()
        .stderr("");
}

// ---- Assemble ----

#[test]
fn assemble_and_run_factorial() {
    let dir = TempDir::new().unwrap();
    let bytecode = assemble_to_temp(&dir, "factorial.svm");

    stackvm()
        .arg(&bytecode)
        .assert()
        .success()
        .stdout("720");
}

#[test]
fn assemble_reports_instruction_count() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("countdown.bc");

    stackvm()
        .args(["assemble"])
        .arg(test_program("countdown.svm"))
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("assembled 10 instructions"));

    stackvm()
        .arg(&output)
        .assert()
        .success()
        .stdout("5\n4\n3\n2\n1\n");
}

#[test]
fn assemble_default_output_name() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prog.svm");
    fs::write(&input, "PUSH 3\nPUSH 4\nADDI\nPRINTINT\n").unwrap();

    stackvm()
        .args(["assemble", input.to_str().unwrap()])
        .assert()
        .success();

    let output = dir.path().join("prog.bc");
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        fs::read_to_string(test_program("add_print.bc")).unwrap()
    );
}

#[test]
fn assemble_bad_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.svm");
    fs::write(&input, "PUSH 1\nFOOBAR\n").unwrap();

    stackvm()
        .args(["assemble", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 2: unknown mnemonic 'FOOBAR'"));
}

#[test]
fn assemble_missing_file_exits_1() {
    stackvm()
        .args(["assemble", "nonexistent.svm"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

// ---- Disassemble ----

#[test]
fn disassemble_prints_mnemonics() {
    stackvm()
        .arg("disassemble")
        .arg(test_program("add_print.bc"))
        .assert()
        .success()
        .stdout("PUSH 3\nPUSH 4\nADDI\nPRINTINT\n");
}

#[test]
fn disassemble_shows_signed_operands() {
    stackvm()
        .arg("disassemble")
        .arg(test_program("call.bc"))
        .assert()
        .success()
        .stdout(predicate::str::contains("LOAD -4\nLOAD -3\n"));
}

#[test]
fn disassemble_requires_one_file() {
    stackvm()
        .arg("disassemble")
        .assert()
        .failure()
        .code(1);
}
