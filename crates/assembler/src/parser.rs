//! Parser for assembly tokens → instructions.
//!
//! The opcode's arity decides how many operands the line must carry.

use crate::error::AsmError;
use crate::lexer::Token;
use stackvm_common::opcode::MAX_ARITY;
use stackvm_common::{Instruction, Opcode, Word};

/// Parse a sequence of tokens from a single line into an instruction.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<Option<Instruction>, AsmError> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let mnemonic = match first {
        Token::Ident(s) => s.as_str(),
        Token::Number(n) => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                expected: "a mnemonic",
                token: n.to_string(),
            })
        }
    };

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let arity = opcode.arity();
    let mut operands = [0 as Word; MAX_ARITY];
    for (idx, slot) in operands.iter_mut().take(arity).enumerate() {
        *slot = expect_word(args, idx, line_num, opcode)?;
    }
    expect_end(args.get(arity..).unwrap_or_default(), line_num)?;

    let instr = Instruction::new(opcode, &operands[..arity]).map_err(|_| {
        AsmError::MissingOperand {
            line: line_num,
            opcode,
            expected: arity,
            found: args.len().min(arity),
        }
    })?;
    Ok(Some(instr))
}

/// Operand `idx` as a machine word.
fn expect_word(args: &[Token], idx: usize, line: usize, opcode: Opcode) -> Result<Word, AsmError> {
    match args.get(idx) {
        Some(Token::Number(n)) => Word::try_from(*n).map_err(|_| AsmError::InvalidNumber {
            line,
            token: n.to_string(),
        }),
        Some(Token::Ident(s)) => Err(AsmError::UnexpectedToken {
            line,
            expected: "an integer operand",
            token: s.clone(),
        }),
        None => Err(AsmError::MissingOperand {
            line,
            opcode,
            expected: opcode.arity(),
            found: idx,
        }),
    }
}

fn expect_end(remaining: &[Token], line: usize) -> Result<(), AsmError> {
    if let Some(tok) = remaining.first() {
        let token = match tok {
            Token::Ident(s) => s.clone(),
            Token::Number(n) => n.to_string(),
        };
        return Err(AsmError::UnexpectedToken {
            line,
            expected: "end of line",
            token,
        });
    }
    Ok(())
}
