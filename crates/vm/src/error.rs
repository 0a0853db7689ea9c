//! Runtime errors for the stack VM.
//!
//! Every error is fatal: the machine halts on the first one. Each variant
//! records the index of the faulting instruction (`at`), except a bad
//! program counter, which records the counter itself.

use stackvm_common::Opcode;
use thiserror::Error;

/// Errors that occur during program execution.
///
/// Checks run before any mutation, so the faulting instruction never
/// leaves partial effects behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A push or allocation would exceed the fixed stack capacity.
    #[error("stack overflow at instruction {at} (capacity {capacity})")]
    StackOverflow { at: usize, capacity: usize },

    /// The current frame holds fewer values than the instruction consumes.
    #[error("insufficient operands at instruction {at}: need {required}, frame holds {available}")]
    InsufficientOperands {
        at: usize,
        required: usize,
        available: usize,
    },

    /// The program counter is outside `[0, len)` at fetch time.
    #[error("program counter {pc} out of bounds (program has {len} instructions)")]
    ProgramCounterOutOfBounds { pc: i64, len: usize },

    /// `bp > sp`, or a pointer is outside `[0, capacity]`.
    #[error("frame invariant violated before instruction {at}: sp={sp} bp={bp} capacity={capacity}")]
    FrameInvariantViolation {
        at: usize,
        sp: usize,
        bp: usize,
        capacity: usize,
    },

    /// Integer division or modulo by zero.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// A frame-relative or indirect access resolved outside the live stack.
    #[error("stack address {address} out of bounds at instruction {at} (sp={sp})")]
    AddressOutOfBounds { at: usize, address: i64, sp: usize },

    /// POPSTACK with no saved base pointer beneath the current frame.
    #[error("POPSTACK with no enclosing frame at instruction {at}")]
    NoEnclosingFrame { at: usize },

    /// The saved base pointer read by POPSTACK does not point below itself.
    #[error("corrupt saved base pointer {saved} at instruction {at}")]
    CorruptFrameLink { at: usize, saved: i32 },

    /// An immediate operand the instruction cannot accept.
    #[error("invalid operand {operand} for {opcode} at instruction {at}")]
    InvalidOperand {
        at: usize,
        opcode: Opcode,
        operand: i32,
    },

    /// Writing to the output channel failed.
    #[error("output error at instruction {at}: {message}")]
    Output { at: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at instruction 5"
        );
        assert_eq!(
            RuntimeError::StackOverflow {
                at: 2,
                capacity: 16
            }
            .to_string(),
            "stack overflow at instruction 2 (capacity 16)"
        );
        assert_eq!(
            RuntimeError::InsufficientOperands {
                at: 0,
                required: 2,
                available: 1
            }
            .to_string(),
            "insufficient operands at instruction 0: need 2, frame holds 1"
        );
        assert_eq!(
            RuntimeError::ProgramCounterOutOfBounds { pc: -1, len: 3 }.to_string(),
            "program counter -1 out of bounds (program has 3 instructions)"
        );
        assert_eq!(
            RuntimeError::InvalidOperand {
                at: 1,
                opcode: Opcode::Alloc,
                operand: -4
            }
            .to_string(),
            "invalid operand -4 for ALLOC at instruction 1"
        );
    }
}
