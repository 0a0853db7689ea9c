//! Disassembler: program → canonical assembly text.
//!
//! One instruction per line, uppercase mnemonic, decimal operands. No
//! indentation, comments or blank lines.

use std::fmt::Write;

use stackvm_common::Program;

/// Disassemble a program into canonical assembly text.
///
/// The output reassembles to an identical program
/// (`assemble(disassemble(program)) == program`).
pub fn disassemble(program: &Program) -> String {
    let mut text = String::new();
    for instr in &program.instructions {
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{instr}");
    }
    text
}
