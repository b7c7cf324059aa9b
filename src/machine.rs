//! # machine
//!
//! state of a run:
//!  * tape           -- boxed cells, pointer starts at the origin
//!  * cell_low/high  -- furthest the pointer has been either way; only used to
//!                      window the hex dump, never shrinks
//!  * loop stack     -- pcs of the `[`s we're currently inside
//!  * output         -- everything `.` has produced, kept for the whole run
//!  * refresh count  -- bumped by `+ - . ,`, the instructions with a visible effect
//!
//! `]` with a nonzero cell jumps back to its `[`, which re-tests and pushes
//! itself again. `[` with a zero cell scans forward to its partner and
//! resumes just after it, so nothing inside the loop runs.

use crate::config::{MachineConfig, ROW_BYTES};
use crate::error::{MachineError, Result};
use crate::input::{Input, INPUT_DEFAULT};
use crate::program::{Instruction, Program};
use crate::snapshot::{HexRow, Snapshot};
use crate::tape::Tape;
use log::debug;

pub struct TapeMachine {
    program: Program,
    tape: Tape,
    position: usize,
    cell_low: usize,
    cell_high: usize,
    loop_stack: Vec<usize>,
    output: String,
    refresh_count: u64,
    refresh_interval: u64,
    last_pc: usize,
}

impl TapeMachine {
    pub fn new(program: Program, config: &MachineConfig) -> Result<TapeMachine> {
        config.validate()?;
        let tape = Tape::new(config);
        let origin = tape.origin();
        Ok(TapeMachine {
            program,
            tape,
            position: origin,
            cell_low: origin,
            cell_high: origin,
            loop_stack: Vec::new(),
            output: String::new(),
            refresh_count: 0,
            refresh_interval: config.refresh_interval,
            last_pc: 0,
        })
    }

    /// run the instruction at pc and say where to go next
    pub fn execute(&mut self, pc: usize, input: &mut dyn Input) -> Result<usize> {
        let instruction = self.program.get(pc).ok_or(MachineError::PcOutOfRange {
            pc,
            len: self.program.len(),
        })?;
        self.last_pc = pc;

        let pc_next = match instruction {
            Instruction::Increment => {
                self.set_cell(self.cell().wrapping_add(1));
                self.refresh_count += 1;
                pc + 1
            }
            Instruction::Decrement => {
                self.set_cell(self.cell().wrapping_sub(1));
                self.refresh_count += 1;
                pc + 1
            }
            Instruction::Right => {
                let next = self.position + 1;
                if !self.tape.contains(next) {
                    return Err(self.out_of_bounds(pc, instruction));
                }
                self.position = next;
                self.cell_high = self.cell_high.max(next);
                pc + 1
            }
            Instruction::Left => {
                let next = self
                    .position
                    .checked_sub(1)
                    .ok_or_else(|| self.out_of_bounds(pc, instruction))?;
                self.position = next;
                self.cell_low = self.cell_low.min(next);
                pc + 1
            }
            Instruction::LoopStart => {
                if self.cell() != 0 {
                    self.loop_stack.push(pc);
                    pc + 1
                } else {
                    self.skip_loop(pc)?
                }
            }
            Instruction::LoopEnd => {
                let start = self.loop_stack.pop().ok_or(MachineError::MalformedProgram {
                    pc,
                    instruction,
                    reason: "unmatched ']'",
                })?;
                if self.cell() != 0 {
                    start
                } else {
                    pc + 1
                }
            }
            Instruction::Output => {
                self.output.push(char::from(self.cell()));
                self.refresh_count += 1;
                pc + 1
            }
            Instruction::Input => {
                let byte = match input.read_key()? {
                    Some(b) => b,
                    None => {
                        debug!("no input at pc={}, using {:#04x}", pc, INPUT_DEFAULT);
                        INPUT_DEFAULT
                    }
                };
                self.set_cell(byte);
                self.refresh_count += 1;
                pc + 1
            }
        };
        Ok(pc_next)
    }

    /// false once pc has run off the end of the program
    pub fn is_active(&self, pc: usize) -> bool {
        pc < self.program.len()
    }

    /// redraw every `refresh_interval` visible effects, and always right
    /// before I/O so the user sees what's being printed or asked for
    pub fn needs_refresh(&self, pc_next: usize) -> bool {
        self.refresh_count % self.refresh_interval == 0
            || self.program.get(pc_next).map_or(false, Instruction::is_io)
    }

    /// a run that finishes inside a loop never closed it
    pub fn check_loops_closed(&self) -> Result<()> {
        match self.loop_stack.last() {
            Some(&pc) => Err(MachineError::MalformedProgram {
                pc,
                instruction: Instruction::LoopStart,
                reason: "loop never closed",
            }),
            None => Ok(()),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let start = self.cell_low - self.cell_low % ROW_BYTES;
        let end = self.cell_high - self.cell_high % ROW_BYTES + ROW_BYTES;
        let rows = (start..end)
            .step_by(ROW_BYTES)
            .map(|addr| HexRow::new(addr, self.tape.get_ro_slice(addr, ROW_BYTES)))
            .collect();
        Snapshot {
            pc: self.last_pc,
            instruction: self.program.get(self.last_pc),
            position: self.position,
            value: self.cell(),
            output: self.output.clone(),
            rows,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// value under the pointer
    pub fn cell(&self) -> u8 {
        self.tape.get(self.position)
    }

    /// value of any cell
    pub fn cell_at(&self, addr: usize) -> Option<u8> {
        self.tape.contains(addr).then(|| self.tape.get(addr))
    }

    pub fn origin(&self) -> usize {
        self.tape.origin()
    }

    /// lowest and highest pointer positions seen so far
    pub fn bounds(&self) -> (usize, usize) {
        (self.cell_low, self.cell_high)
    }

    pub fn loop_depth(&self) -> usize {
        self.loop_stack.len()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    fn set_cell(&mut self, value: u8) {
        self.tape.set(self.position, value);
    }

    /// from the `[` at pc, find the `]` that closes it and return the pc after
    fn skip_loop(&self, pc: usize) -> Result<usize> {
        let mut depth = 1usize;
        let mut n = pc;
        while depth > 0 {
            n += 1;
            match self.program.get(n) {
                Some(Instruction::LoopStart) => depth += 1,
                Some(Instruction::LoopEnd) => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(MachineError::MalformedProgram {
                        pc,
                        instruction: Instruction::LoopStart,
                        reason: "unmatched '['",
                    })
                }
            }
        }
        Ok(n + 1)
    }

    fn out_of_bounds(&self, pc: usize, instruction: Instruction) -> MachineError {
        MachineError::TapeBoundsExceeded {
            pc,
            instruction,
            position: self.position,
            capacity: self.tape.len(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::input::DummyInput;
    use proptest::prelude::*;

    fn small_config() -> MachineConfig {
        MachineConfig {
            tape_size: 64,
            ..MachineConfig::default()
        }
    }

    proptest! {
        #[test]
        fn cell_is_count_difference_mod_256(ops in prop::collection::vec(any::<bool>(), 0..2000)) {
            let source: String = ops.iter().map(|&up| if up { '+' } else { '-' }).collect();
            let mut m = TapeMachine::new(Program::parse(&source), &MachineConfig::default()).unwrap();
            let mut input = DummyInput::new(&[]);
            let mut pc = 0;
            while m.is_active(pc) {
                pc = m.execute(pc, &mut input).unwrap();
            }
            let ups = ops.iter().filter(|&&up| up).count() as i64;
            let downs = ops.len() as i64 - ups;
            prop_assert_eq!(m.cell() as i64, (ups - downs).rem_euclid(256));
        }

        #[test]
        fn pointer_stays_on_tape(source in "[<>+-]{0,200}") {
            let mut m = TapeMachine::new(Program::parse(&source), &small_config()).unwrap();
            let mut input = DummyInput::new(&[]);
            let mut pc = 0;
            while m.is_active(pc) {
                let before = m.position();
                match m.execute(pc, &mut input) {
                    Ok(next) => pc = next,
                    Err(MachineError::TapeBoundsExceeded { .. }) => {
                        prop_assert_eq!(m.position(), before);
                        break;
                    }
                    Err(e) => return Err(TestCaseError::fail(e.to_string())),
                }
                prop_assert!(m.position() < 64);
                let (low, high) = m.bounds();
                prop_assert!(low <= m.position() && m.position() <= high);
            }
        }

        #[test]
        fn zero_cell_loop_body_never_runs(body in "[<>+.-]{0,50}") {
            let source = format!("[{}]+", body);
            let mut m = TapeMachine::new(Program::parse(&source), &small_config()).unwrap();
            let mut input = DummyInput::new(&[]);
            let mut pc = 0;
            let mut executed = Vec::new();
            while m.is_active(pc) {
                executed.push(pc);
                pc = m.execute(pc, &mut input).unwrap();
            }
            prop_assert_eq!(executed, vec![0, body.len() + 2]);
            prop_assert_eq!(m.output(), "");
            prop_assert_eq!(m.cell(), 1);
            prop_assert_eq!(m.loop_depth(), 0);
        }
    }
}
