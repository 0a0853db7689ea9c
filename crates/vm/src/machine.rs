//! VM state: program, stack memory, registers and the output channel.

use std::io::Write;

use stackvm_common::{Program, Word};

use crate::config::VmConfig;
use crate::error::RuntimeError;
use crate::stack::{Fault, StackMemory};

/// Execution state. There is no paused state: a halted machine stays halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

/// Result of a run that reached the end of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Instructions executed.
    pub steps: u64,
}

/// The stack virtual machine.
///
/// Owns all mutable state of a run; independent machines share nothing.
pub struct Machine<'a, W: Write> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Operand stack, `sp` and `bp`.
    pub(crate) stack: StackMemory,
    /// Program counter (instruction index).
    pub(crate) pc: usize,
    /// Result carried from RETURN to the next UNFRAME.
    pub(crate) return_value: Word,
    pub(crate) state: State,
    pub(crate) steps: u64,
    pub(crate) out: W,
}

impl<'a, W: Write> Machine<'a, W> {
    /// Create a machine with the default configuration.
    pub fn new(program: &'a Program, out: W) -> Self {
        Self::with_config(program, VmConfig::default(), out)
    }

    /// Create a machine with an explicit configuration.
    pub fn with_config(program: &'a Program, config: VmConfig, out: W) -> Self {
        Self {
            program,
            stack: StackMemory::new(config.stack_capacity),
            pc: 0,
            return_value: 0,
            state: State::Running,
            steps: 0,
            out,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn sp(&self) -> usize {
        self.stack.sp()
    }

    pub fn bp(&self) -> usize {
        self.stack.bp()
    }

    pub fn return_value(&self) -> Word {
        self.return_value
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Live stack slots `[0, sp)`.
    pub fn stack(&self) -> &[Word] {
        self.stack.as_slice()
    }

    /// The output channel.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the machine, returning the output channel.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Attach the current instruction index to a memory fault.
    pub(crate) fn fault(&self, fault: Fault) -> RuntimeError {
        fault.at(self.pc)
    }

    pub(crate) fn push(&mut self, value: Word) -> Result<(), RuntimeError> {
        self.stack.push(value).map_err(|f| self.fault(f))
    }

    pub(crate) fn pop(&mut self) -> Result<Word, RuntimeError> {
        self.stack.pop().map_err(|f| self.fault(f))
    }

    /// Require `n` operands in the current frame.
    pub(crate) fn validate_stack_size(&self, n: usize) -> Result<(), RuntimeError> {
        self.stack.require(n).map_err(|f| self.fault(f))
    }

    /// Check the register invariants that must hold before every dispatch.
    pub(crate) fn check_invariants(&self) -> Result<(), RuntimeError> {
        self.stack.check_invariants().map_err(|f| self.fault(f))?;
        if self.pc >= self.program.len() {
            return Err(RuntimeError::ProgramCounterOutOfBounds {
                pc: self.pc as i64,
                len: self.program.len(),
            });
        }
        Ok(())
    }

    /// Turn a computed jump target into a program counter.
    ///
    /// Targets past the end are accepted here and caught at the next fetch;
    /// exactly `len` is a normal halt.
    pub(crate) fn jump_target(&self, target: i64) -> Result<usize, RuntimeError> {
        usize::try_from(target).map_err(|_| RuntimeError::ProgramCounterOutOfBounds {
            pc: target,
            len: self.program.len(),
        })
    }

    pub(crate) fn emit(&mut self, bytes: &[u8]) -> Result<(), RuntimeError> {
        self.out.write_all(bytes).map_err(|e| RuntimeError::Output {
            at: self.pc,
            message: e.to_string(),
        })
    }

    pub(crate) fn flush(&mut self) -> Result<(), RuntimeError> {
        self.out.flush().map_err(|e| RuntimeError::Output {
            at: self.pc,
            message: e.to_string(),
        })
    }
}
