//! Program representation and the integer bytecode loader.
//!
//! Bytecode is a stream of whitespace-separated signed decimal integers.
//! Each instruction is its opcode tag followed by exactly `arity` operands.
//! There is no header; the loader reads until end of input.

use crate::error::DecodeError;
use crate::instruction::{Instruction, Word};
use crate::opcode::{Opcode, MAX_ARITY};

/// A stack VM program: an immutable, 0-indexed sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Decode integer bytecode text into a program.
    ///
    /// Returns the first error encountered, tagged with its 1-based line.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let mut words = text.lines().enumerate().flat_map(|(idx, line)| {
            line.split_whitespace().map(move |token| (idx + 1, token))
        });

        let mut instructions = Vec::new();
        while let Some((line, token)) = words.next() {
            let tag = parse_tag(token, line)?;
            let opcode =
                Opcode::from_tag(tag).ok_or(DecodeError::UnknownOpcode { line, tag })?;

            let expected = opcode.arity();
            let mut operands = [0; MAX_ARITY];
            let mut last_line = line;
            for (found, slot) in operands.iter_mut().take(expected).enumerate() {
                let (line, token) = words.next().ok_or(DecodeError::UnexpectedEndOfInput {
                    line: last_line,
                    opcode,
                    expected,
                    found,
                })?;
                *slot = parse_word(token, line)?;
                last_line = line;
            }

            instructions.push(Instruction::new(opcode, &operands[..expected])?);
        }

        Ok(Self { instructions })
    }

    /// Encode the program as integer bytecode, one instruction per line.
    pub fn encode(&self) -> String {
        let mut text = String::new();
        for instr in &self.instructions {
            text.push_str(&instr.opcode().tag().to_string());
            for operand in instr.operands() {
                text.push(' ');
                text.push_str(&operand.to_string());
            }
            text.push('\n');
        }
        text
    }

    /// Fetch the instruction at `pc`, if any.
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

fn parse_tag(token: &str, line: usize) -> Result<i64, DecodeError> {
    token.parse().map_err(|_| DecodeError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}

fn parse_word(token: &str, line: usize) -> Result<Word, DecodeError> {
    token.parse().map_err(|_| DecodeError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}
