//! Opcode definitions for the stack VM instruction set.
//!
//! The discriminant of each variant is its wire tag in integer bytecode.
//! Tags 0 through 18 are the first-revision instruction set; everything after
//! was appended and must never be renumbered.

use std::fmt;

/// Identifies the operation to perform.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Arithmetic
    /// Pop b, pop a, push a + b.
    AddI = 0,
    /// Pop b, pop a, push a - b.
    SubI = 1,
    /// Pop b, pop a, push a * b.
    MulI = 2,
    /// Pop b, pop a, push a / b (truncating). Zero divisor is fatal.
    DivI = 3,

    // Comparison
    /// Push 1 if a < b, else 0.
    Less = 4,
    /// Push 1 if a <= b, else 0.
    Leq = 5,
    /// Push 1 if a == b, else 0.
    Eq = 6,
    /// Push 1 if a >= b, else 0.
    Geq = 7,
    /// Push 1 if a > b, else 0.
    Greater = 8,

    // Stack and memory
    /// Push the immediate operand.
    Push = 9,
    /// Discard the top of stack.
    Pop = 10,
    /// Push `stack[bp + offset]`.
    Load = 11,
    /// Pop a value into `stack[bp + offset]`.
    Store = 12,
    /// Reserve `n` zeroed slots.
    Alloc = 13,
    /// Push `pc + delta` as a return address.
    Frame = 14,

    // Control transfer
    /// Absolute jump.
    Goto = 15,
    /// Relative jump.
    Jump = 16,
    /// Pop; relative jump if nonzero.
    Jmpt = 17,
    /// Pop; relative jump if zero.
    Jmpf = 18,

    // Output
    /// Pop and emit as a character byte.
    PrintC = 19,
    /// Pop and emit as decimal text.
    PrintInt = 20,

    // Call frames
    /// Jump to the return address on top of stack, replacing it with the return value.
    Unframe = 21,
    /// Push the absolute stack pointer.
    StoreSp = 22,
    /// Push `sp - bp`.
    StoreSpOffset = 23,
    /// Pop address, pop value, write value to `stack[bp + address]`.
    StoreStack = 24,
    /// Save bp on the stack and open a new frame at sp.
    PushStack = 25,
    /// Close the current frame and restore the saved bp.
    PopStack = 26,
    /// Pop into the return-value register.
    Return = 27,

    // Later additions
    /// Pop b, pop a, push a % b. Zero divisor is fatal.
    ModI = 28,
    /// Push 1 if a != b, else 0.
    Neq = 29,
    /// Push 1 if both are nonzero, else 0.
    And = 30,
    /// Push 1 if either is nonzero, else 0.
    Or = 31,
    /// Replace the top with 1 if it is zero, else 0.
    Not = 32,
}

/// All opcodes, in tag order.
pub const ALL_OPCODES: [Opcode; 33] = [
    Opcode::AddI,
    Opcode::SubI,
    Opcode::MulI,
    Opcode::DivI,
    Opcode::Less,
    Opcode::Leq,
    Opcode::Eq,
    Opcode::Geq,
    Opcode::Greater,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Load,
    Opcode::Store,
    Opcode::Alloc,
    Opcode::Frame,
    Opcode::Goto,
    Opcode::Jump,
    Opcode::Jmpt,
    Opcode::Jmpf,
    Opcode::PrintC,
    Opcode::PrintInt,
    Opcode::Unframe,
    Opcode::StoreSp,
    Opcode::StoreSpOffset,
    Opcode::StoreStack,
    Opcode::PushStack,
    Opcode::PopStack,
    Opcode::Return,
    Opcode::ModI,
    Opcode::Neq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
];

/// Largest operand count of any opcode.
pub const MAX_ARITY: usize = 2;

impl Opcode {
    /// Look up an opcode by its wire tag.
    pub fn from_tag(tag: i64) -> Option<Opcode> {
        usize::try_from(tag)
            .ok()
            .and_then(|idx| ALL_OPCODES.get(idx))
            .copied()
    }

    /// The wire tag written in integer bytecode.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Number of operands that follow the tag in the instruction stream.
    pub fn arity(self) -> usize {
        match self {
            Opcode::AddI
            | Opcode::SubI
            | Opcode::MulI
            | Opcode::DivI
            | Opcode::ModI
            | Opcode::Less
            | Opcode::Leq
            | Opcode::Eq
            | Opcode::Neq
            | Opcode::Geq
            | Opcode::Greater
            | Opcode::And
            | Opcode::Or
            | Opcode::Not
            | Opcode::Pop
            | Opcode::PrintC
            | Opcode::PrintInt
            | Opcode::Unframe
            | Opcode::StoreSp
            | Opcode::StoreSpOffset
            | Opcode::StoreStack
            | Opcode::PushStack
            | Opcode::PopStack
            | Opcode::Return => 0,

            Opcode::Push
            | Opcode::Load
            | Opcode::Store
            | Opcode::Alloc
            | Opcode::Frame
            | Opcode::Goto
            | Opcode::Jump
            | Opcode::Jmpt
            | Opcode::Jmpf => 1,
        }
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::AddI => "ADDI",
            Opcode::SubI => "SUBI",
            Opcode::MulI => "MULI",
            Opcode::DivI => "DIVI",
            Opcode::Less => "LESS",
            Opcode::Leq => "LEQ",
            Opcode::Eq => "EQ",
            Opcode::Geq => "GEQ",
            Opcode::Greater => "GREATER",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Alloc => "ALLOC",
            Opcode::Frame => "FRAME",
            Opcode::Goto => "GOTO",
            Opcode::Jump => "JUMP",
            Opcode::Jmpt => "JMPT",
            Opcode::Jmpf => "JMPF",
            Opcode::PrintC => "PRINTC",
            Opcode::PrintInt => "PRINTINT",
            Opcode::Unframe => "UNFRAME",
            Opcode::StoreSp => "STORESP",
            Opcode::StoreSpOffset => "STORESPOFFSET",
            Opcode::StoreStack => "STORESTACK",
            Opcode::PushStack => "PUSHSTACK",
            Opcode::PopStack => "POPSTACK",
            Opcode::Return => "RETURN",
            Opcode::ModI => "MODI",
            Opcode::Neq => "NEQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
        }
    }

    /// Look up an opcode by its (uppercase) mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
