//! Stack VM assembler: mnemonic text ↔ program translation.
//!
//! The assembler is a mechanical 1:1 translation. One line holds at most
//! one instruction; there are no labels or macros.
//!
//! # Usage
//!
//! ```
//! use stackvm_assembler::{assemble, disassemble};
//!
//! let text = "PUSH 3\nPUSH 4\nADDI\nPRINTINT\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.encode(), "9 3\n9 4\n0\n20\n");
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program)) == program` holds for all programs.
//! The disassembler outputs canonical text; the assembler also accepts
//! lowercase mnemonics, hex operands, comments and blank lines.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::tokenize_line;
use parser::parse_line;
use stackvm_common::Program;

/// Assemble text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        if let Some(instr) = parse_line(&tokens, line_num)? {
            instructions.push(instr);
        }
    }

    Ok(Program::new(instructions))
}

/// Disassemble a program into canonical assembly text.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}
