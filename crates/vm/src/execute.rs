//! Main execution loop and opcode dispatch for the stack VM.

use std::io::Write;

use stackvm_common::{Instruction, Opcode, Word};
use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::machine::{Machine, State, Summary};

impl<'a, W: Write> Machine<'a, W> {
    /// Execute until the program counter reaches the end of the program or
    /// an error halts the machine. Output is flushed either way.
    pub fn run(&mut self) -> Result<Summary, RuntimeError> {
        debug!(
            instructions = self.program.len(),
            capacity = self.stack.capacity(),
            "starting run"
        );

        let result = loop {
            match self.step() {
                Ok(State::Running) => {}
                Ok(State::Halted) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        let flushed = self.flush();
        result?;
        flushed?;

        debug!(steps = self.steps, "halted");
        Ok(Summary { steps: self.steps })
    }

    /// Execute a single instruction and report the resulting state.
    ///
    /// Stepping a halted machine does nothing.
    pub fn step(&mut self) -> Result<State, RuntimeError> {
        if self.state == State::Halted {
            return Ok(State::Halted);
        }
        if self.pc == self.program.len() {
            self.state = State::Halted;
            return Ok(State::Halted);
        }

        if let Err(e) = self.execute_one() {
            debug!(error = %e, pc = self.pc, "fatal");
            self.state = State::Halted;
            return Err(e);
        }

        self.steps += 1;
        if self.pc == self.program.len() {
            self.state = State::Halted;
        }
        Ok(self.state)
    }

    /// Check invariants, fetch, dispatch, and advance `pc`.
    fn execute_one(&mut self) -> Result<(), RuntimeError> {
        self.check_invariants()?;
        let instr = *self
            .program
            .get(self.pc)
            .ok_or(RuntimeError::ProgramCounterOutOfBounds {
                pc: self.pc as i64,
                len: self.program.len(),
            })?;

        trace!(
            pc = self.pc,
            sp = self.sp(),
            bp = self.bp(),
            stack = ?self.stack(),
            "{instr}"
        );

        match self.dispatch(&instr)? {
            Some(target) => self.pc = target,
            None => self.pc += 1,
        }
        Ok(())
    }

    /// Run one instruction. Returns the new `pc` for control transfers, or
    /// `None` to fall through to the next instruction.
    fn dispatch(&mut self, instr: &Instruction) -> Result<Option<usize>, RuntimeError> {
        let at = self.pc;
        let arg = instr.operand();

        match instr.opcode() {
            // Arithmetic
            Opcode::AddI => self.exec_binary(Word::wrapping_add)?,
            Opcode::SubI => self.exec_binary(Word::wrapping_sub)?,
            Opcode::MulI => self.exec_binary(Word::wrapping_mul)?,
            Opcode::DivI => self.exec_divide(Word::wrapping_div)?,
            Opcode::ModI => self.exec_divide(Word::wrapping_rem)?,

            // Comparison
            Opcode::Less => self.exec_binary(|a, b| Word::from(a < b))?,
            Opcode::Leq => self.exec_binary(|a, b| Word::from(a <= b))?,
            Opcode::Eq => self.exec_binary(|a, b| Word::from(a == b))?,
            Opcode::Neq => self.exec_binary(|a, b| Word::from(a != b))?,
            Opcode::Geq => self.exec_binary(|a, b| Word::from(a >= b))?,
            Opcode::Greater => self.exec_binary(|a, b| Word::from(a > b))?,

            // Boolean
            Opcode::And => self.exec_binary(|a, b| Word::from(a != 0 && b != 0))?,
            Opcode::Or => self.exec_binary(|a, b| Word::from(a != 0 || b != 0))?,
            Opcode::Not => {
                let a = self.pop()?;
                self.push(Word::from(a == 0))?;
            }

            // Stack and memory
            Opcode::Push => self.push(arg)?,
            Opcode::Pop => {
                self.pop()?;
            }
            Opcode::Load => {
                let address = self.stack.frame_address(arg);
                let value = self.stack.read(address).map_err(|f| f.at(at))?;
                self.push(value)?;
            }
            Opcode::Store => {
                let address = self.stack.frame_address(arg);
                self.stack
                    .pop_and_store(1, address)
                    .map_err(|f| f.at(at))?;
            }
            Opcode::Alloc => {
                let n = usize::try_from(arg).map_err(|_| RuntimeError::InvalidOperand {
                    at,
                    opcode: Opcode::Alloc,
                    operand: arg,
                })?;
                self.stack.alloc(n).map_err(|f| f.at(at))?;
            }
            Opcode::StoreSp => self.push(self.sp() as Word)?,
            Opcode::StoreSpOffset => self.push(self.stack.frame_len() as Word)?,
            Opcode::StoreStack => {
                self.validate_stack_size(2)?;
                let offset = self.stack.peek(0).map_err(|f| f.at(at))?;
                let address = self.stack.frame_address(offset);
                self.stack
                    .pop_and_store(2, address)
                    .map_err(|f| f.at(at))?;
            }

            // Control transfer
            Opcode::Goto => return self.jump_target(arg as i64).map(Some),
            Opcode::Jump => return self.jump_target(at as i64 + arg as i64).map(Some),
            Opcode::Jmpt => return self.exec_branch(arg, |cond| cond != 0),
            Opcode::Jmpf => return self.exec_branch(arg, |cond| cond == 0),

            // Output
            Opcode::PrintC => {
                let value = self.pop()?;
                self.emit(&[value as u8])?;
            }
            Opcode::PrintInt => {
                let value = self.pop()?;
                self.emit(value.to_string().as_bytes())?;
            }

            // Call frames
            Opcode::Frame => {
                let address = Word::try_from(at as i64 + arg as i64).map_err(|_| {
                    RuntimeError::InvalidOperand {
                        at,
                        opcode: Opcode::Frame,
                        operand: arg,
                    }
                })?;
                self.push(address)?;
            }
            Opcode::Unframe => return self.exec_unframe().map(Some),
            Opcode::PushStack => self.stack.open_frame().map_err(|f| f.at(at))?,
            Opcode::PopStack => self.stack.close_frame().map_err(|f| f.at(at))?,
            Opcode::Return => self.return_value = self.pop()?,
        }

        Ok(None)
    }

    /// `[a, b] -> [op(a, b)]` within the current frame.
    fn exec_binary(&mut self, op: fn(Word, Word) -> Word) -> Result<(), RuntimeError> {
        self.validate_stack_size(2)?;
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(op(a, b))
    }

    /// Like [`Self::exec_binary`], but a zero divisor is fatal and leaves the stack untouched.
    fn exec_divide(&mut self, op: fn(Word, Word) -> Word) -> Result<(), RuntimeError> {
        self.validate_stack_size(2)?;
        let divisor = self.stack.peek(0).map_err(|f| f.at(self.pc))?;
        if divisor == 0 {
            return Err(RuntimeError::DivisionByZero { at: self.pc });
        }
        self.exec_binary(op)
    }

    /// Pop a condition and jump by `delta` if `taken(condition)`.
    ///
    /// The condition is popped whether or not the branch is taken.
    fn exec_branch(
        &mut self,
        delta: Word,
        taken: fn(Word) -> bool,
    ) -> Result<Option<usize>, RuntimeError> {
        self.validate_stack_size(1)?;
        let cond = self.stack.peek(0).map_err(|f| f.at(self.pc))?;
        let target = if taken(cond) {
            Some(self.jump_target(self.pc as i64 + delta as i64)?)
        } else {
            None
        };
        self.pop()?;
        Ok(target)
    }

    /// Return to the address on top of the stack, leaving the return value in its slot.
    fn exec_unframe(&mut self) -> Result<usize, RuntimeError> {
        let at = self.pc;
        let address = self.stack.peek(0).map_err(|f| f.at(at))?;
        let target = self.jump_target(address as i64)?;
        let slot = (self.sp() - 1) as i64;
        self.stack
            .write(slot, self.return_value)
            .map_err(|f| f.at(at))?;
        self.return_value = 0;
        Ok(target)
    }
}
