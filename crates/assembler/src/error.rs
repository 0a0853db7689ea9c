//! Assembly errors. Each one names the 1-based source line it came from.

use stackvm_common::Opcode;
use thiserror::Error;

/// Errors produced while assembling mnemonic text into a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first token on a line is not a known mnemonic.
    #[error("line {line}: unknown mnemonic '{token}'")]
    UnknownMnemonic { line: usize, token: String },

    /// The line ends before the opcode's operands do.
    #[error("line {line}: {opcode} takes {expected} operand(s), found {found}")]
    MissingOperand {
        line: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    /// A literal that is malformed or does not fit in a 32-bit word.
    #[error("line {line}: '{token}' is not a 32-bit integer")]
    InvalidNumber { line: usize, token: String },

    /// A token of the wrong kind: a number where a mnemonic belongs, a
    /// mnemonic where an operand belongs, or anything after the operands.
    #[error("line {line}: expected {expected}, found '{token}'")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        token: String,
    },
}
