//! Stack VM common types and bytecode encoding.
//!
//! This crate provides the instruction model shared by the engine, the
//! assembler and the CLI:
//!
//! - [`Opcode`] — the closed instruction set and its arity table
//! - [`Instruction`] — an opcode with exactly `arity` operands
//! - [`Word`] — the machine's signed integer
//! - [`Program`] — an immutable instruction sequence, with the integer bytecode loader
//! - [`DecodeError`] — fatal load errors

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::{Instruction, Word};
pub use opcode::Opcode;
pub use program::Program;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random valid Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(opcode::ALL_OPCODES.to_vec())
    }

    /// Strategy that generates a random valid Instruction.
    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (arb_opcode(), any::<Word>()).prop_map(|(op, arg)| {
            let operands = [arg];
            Instruction::new(op, &operands[..op.arity()]).unwrap()
        })
    }

    proptest! {
        /// Program encode/decode roundtrip with random valid programs.
        #[test]
        fn program_roundtrip(
            instrs in prop::collection::vec(arb_instruction(), 0..50)
        ) {
            let program = Program::new(instrs);
            let decoded = Program::decode(&program.encode()).unwrap();
            prop_assert_eq!(program, decoded);
        }

        /// Any integer is either a known tag or rejected, never a panic.
        #[test]
        fn every_tag_resolves(tag in any::<i64>()) {
            match Opcode::from_tag(tag) {
                Some(op) => prop_assert_eq!(op.tag() as i64, tag),
                None => prop_assert!(!(0..33).contains(&tag)),
            }
        }

        /// Dropping the final operand of a one-operand instruction always
        /// fails as a truncated operand list.
        #[test]
        fn truncation_is_reported(op in arb_opcode().prop_filter("needs an operand", |op| op.arity() == 1)) {
            let text = format!("9 1\n{}", op.tag());
            let is_eof = matches!(
                Program::decode(&text),
                Err(DecodeError::UnexpectedEndOfInput { found: 0, .. })
            );
            prop_assert!(is_eof);
        }
    }
}
