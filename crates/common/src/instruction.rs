//! A single decoded instruction: an opcode and its fixed operand list.

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::{Opcode, MAX_ARITY};

/// The machine's signed integer. Stack slots, operands and registers all hold one.
pub type Word = i32;

/// One decoded stack VM instruction.
///
/// The operand count always equals `opcode.arity()`; the only way to build
/// an instruction with operands is through [`Instruction::new`], which checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    opcode: Opcode,
    operands: [Word; MAX_ARITY],
}

impl Instruction {
    /// Create an instruction, checking that `operands` matches the opcode's arity.
    pub fn new(opcode: Opcode, operands: &[Word]) -> Result<Self, DecodeError> {
        let expected = opcode.arity();
        if operands.len() != expected {
            return Err(DecodeError::ArityMismatch {
                opcode,
                expected,
                found: operands.len(),
            });
        }

        let mut slots = [0; MAX_ARITY];
        slots[..expected].copy_from_slice(operands);
        Ok(Self {
            opcode,
            operands: slots,
        })
    }

    /// The operation to perform.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Exactly `opcode().arity()` operands.
    pub fn operands(&self) -> &[Word] {
        &self.operands[..self.opcode.arity()]
    }

    /// First operand, or 0 for nullary opcodes.
    pub fn operand(&self) -> Word {
        self.operands[0]
    }
}

/// Disassembly form: mnemonic followed by decimal operands.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for operand in self.operands() {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
