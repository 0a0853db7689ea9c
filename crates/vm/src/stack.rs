//! Stack memory: a fixed-capacity array of words addressed by `sp` and `bp`.
//!
//! The live slots are `[0, sp)`. The current frame is `[bp, sp)`; older
//! frames sit below `bp` and are linked through saved base pointers stored
//! in the stack itself. Every slot access goes through [`StackMemory::checked_index`].

use stackvm_common::Word;

use crate::error::RuntimeError;

/// A memory fault, before it is attributed to an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    Overflow { capacity: usize },
    Insufficient { required: usize, available: usize },
    Address { address: i64, sp: usize },
    FrameInvariant { sp: usize, bp: usize, capacity: usize },
    NoEnclosingFrame,
    CorruptLink { saved: Word },
}

impl Fault {
    /// Attach the faulting instruction index.
    pub(crate) fn at(self, at: usize) -> RuntimeError {
        match self {
            Fault::Overflow { capacity } => RuntimeError::StackOverflow { at, capacity },
            Fault::Insufficient {
                required,
                available,
            } => RuntimeError::InsufficientOperands {
                at,
                required,
                available,
            },
            Fault::Address { address, sp } => RuntimeError::AddressOutOfBounds { at, address, sp },
            Fault::FrameInvariant { sp, bp, capacity } => RuntimeError::FrameInvariantViolation {
                at,
                sp,
                bp,
                capacity,
            },
            Fault::NoEnclosingFrame => RuntimeError::NoEnclosingFrame { at },
            Fault::CorruptLink { saved } => RuntimeError::CorruptFrameLink { at, saved },
        }
    }
}

/// The operand stack together with the `sp` and `bp` registers.
#[derive(Debug, Clone)]
pub struct StackMemory {
    /// Live slots; `slots.len()` is `sp`.
    slots: Vec<Word>,
    bp: usize,
    capacity: usize,
}

impl StackMemory {
    /// Create an empty stack. Capacity is clamped to `Word::MAX` so that any
    /// base pointer can be saved in a slot. Slots are allocated as the stack
    /// grows; `capacity` only bounds `sp`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(Word::MAX as usize);
        Self {
            slots: Vec::new(),
            bp: 0,
            capacity,
        }
    }

    /// Stack pointer: one past the top live slot.
    pub fn sp(&self) -> usize {
        self.slots.len()
    }

    /// Base pointer of the current frame.
    pub fn bp(&self) -> usize {
        self.bp
    }

    /// Fixed slot capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The live slots `[0, sp)`.
    pub fn as_slice(&self) -> &[Word] {
        &self.slots
    }

    /// Number of values in the current frame.
    pub fn frame_len(&self) -> usize {
        self.sp().saturating_sub(self.bp)
    }

    /// `0 <= bp <= sp <= capacity`.
    pub(crate) fn check_invariants(&self) -> Result<(), Fault> {
        let sp = self.sp();
        if sp > self.capacity || self.bp > self.capacity || self.bp > sp {
            return Err(Fault::FrameInvariant {
                sp,
                bp: self.bp,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Require at least `n` values in the current frame.
    pub(crate) fn require(&self, n: usize) -> Result<(), Fault> {
        let available = self.frame_len();
        if available < n {
            return Err(Fault::Insufficient {
                required: n,
                available,
            });
        }
        Ok(())
    }

    /// Resolve an absolute address against the first `live` slots.
    fn checked_index(&self, address: i64, live: usize) -> Result<usize, Fault> {
        match usize::try_from(address) {
            Ok(index) if index < live => Ok(index),
            _ => Err(Fault::Address {
                address,
                sp: self.sp(),
            }),
        }
    }

    /// Absolute address of `bp + offset`.
    pub(crate) fn frame_address(&self, offset: Word) -> i64 {
        self.bp as i64 + offset as i64
    }

    pub(crate) fn read(&self, address: i64) -> Result<Word, Fault> {
        let index = self.checked_index(address, self.sp())?;
        Ok(self.slots[index])
    }

    pub(crate) fn write(&mut self, address: i64, value: Word) -> Result<(), Fault> {
        let index = self.checked_index(address, self.sp())?;
        self.slots[index] = value;
        Ok(())
    }

    /// The value `depth` slots below the top of the current frame.
    pub(crate) fn peek(&self, depth: usize) -> Result<Word, Fault> {
        self.require(depth + 1)?;
        self.read((self.sp() - 1 - depth) as i64)
    }

    pub(crate) fn push(&mut self, value: Word) -> Result<(), Fault> {
        if self.sp() >= self.capacity {
            return Err(Fault::Overflow {
                capacity: self.capacity,
            });
        }
        self.slots.push(value);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<Word, Fault> {
        let value = self.peek(0)?;
        self.slots.pop();
        Ok(value)
    }

    /// Reserve `n` zeroed slots.
    pub(crate) fn alloc(&mut self, n: usize) -> Result<(), Fault> {
        match self.sp().checked_add(n) {
            Some(sp) if sp <= self.capacity && self.slots.try_reserve(n).is_ok() => {
                self.slots.resize(sp, 0);
                Ok(())
            }
            _ => Err(Fault::Overflow {
                capacity: self.capacity,
            }),
        }
    }

    /// Pop `popped` values and write the deepest of them to `address`.
    ///
    /// The target must stay live after the pop; nothing is mutated on error.
    pub(crate) fn pop_and_store(&mut self, popped: usize, address: i64) -> Result<(), Fault> {
        self.require(popped)?;
        let live = self.sp() - popped;
        let value = self.read(live as i64)?;
        let index = self.checked_index(address, live)?;
        self.slots.truncate(live);
        self.slots[index] = value;
        Ok(())
    }

    /// Save `bp` on the stack and start a new, empty frame above it.
    pub(crate) fn open_frame(&mut self) -> Result<(), Fault> {
        self.push(self.bp as Word)?;
        self.bp = self.sp();
        Ok(())
    }

    /// Discard the current frame and restore the saved base pointer.
    pub(crate) fn close_frame(&mut self) -> Result<(), Fault> {
        if self.bp == 0 {
            return Err(Fault::NoEnclosingFrame);
        }
        let link = self.bp - 1;
        let saved = self.read(link as i64)?;
        let restored = match usize::try_from(saved) {
            Ok(bp) if bp <= link => bp,
            _ => return Err(Fault::CorruptLink { saved }),
        };
        self.slots.truncate(link);
        self.bp = restored;
        Ok(())
    }
}
