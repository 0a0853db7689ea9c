//! Stack VM execution engine.
//!
//! The machine is a single fixed-capacity array of words with:
//! - A stack pointer (`sp`) and a base pointer (`bp`) delimiting the current frame
//! - Frames linked through base pointers saved in the stack itself
//! - A return-value register carrying a callee's result across UNFRAME
//!
//! # Usage
//!
//! ```
//! use stackvm_common::Program;
//! use stackvm_vm::run;
//!
//! // PUSH 3, PUSH 4, ADDI, PRINTINT
//! let program = Program::decode("9 3\n9 4\n0\n20\n").unwrap();
//!
//! let mut out = Vec::new();
//! let summary = run(&program, &mut out).unwrap();
//! assert_eq!(out, b"7");
//! assert_eq!(summary.steps, 4);
//! ```

pub mod config;
pub mod error;
pub mod execute;
pub mod machine;
pub mod stack;

pub use config::{VmConfig, MAX_STACK_SIZE};
pub use error::RuntimeError;
pub use machine::{Machine, State, Summary};
pub use stack::StackMemory;

use std::io::Write;

use stackvm_common::Program;

/// Execute a program with the default configuration, writing its output to `out`.
///
/// # Errors
///
/// Returns [`RuntimeError`] on the first fatal condition (stack overflow,
/// insufficient operands, division by zero, a bad program counter, etc.).
pub fn run<W: Write>(program: &Program, out: W) -> Result<Summary, RuntimeError> {
    Machine::new(program, out).run()
}
