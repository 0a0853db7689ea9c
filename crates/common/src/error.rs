//! Load errors for integer bytecode.

use thiserror::Error;

use crate::opcode::Opcode;

/// Errors that occur while decoding bytecode text into a [`Program`].
///
/// Every variant is fatal: a program that fails to decode is never run.
///
/// [`Program`]: crate::Program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A token is not a signed integer in `Word` range.
    #[error("line {line}: invalid integer '{token}'")]
    InvalidInteger { line: usize, token: String },

    /// An opcode tag outside the instruction set.
    #[error("line {line}: unknown opcode {tag}")]
    UnknownOpcode { line: usize, tag: i64 },

    /// Input ended in the middle of an operand list.
    #[error("line {line}: unexpected end of input: {opcode} expects {expected} operand(s), found {found}")]
    UnexpectedEndOfInput {
        line: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// An instruction was built with the wrong number of operands.
    #[error("{opcode} expects {expected} operand(s), got {found}")]
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },
}
