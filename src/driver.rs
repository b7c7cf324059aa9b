use crate::config::DriverConfig;
use crate::display::{Display, Prompt};
use crate::error::Result;
use crate::input::Input;
use crate::machine::TapeMachine;
use crate::program::{Instruction, Program};
use crate::snapshot::Snapshot;
use log::{debug, error, info};

/// what a finished run leaves behind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// instructions executed
    pub steps: u64,
    pub output: String,
    /// the machine as it was when pc ran off the end
    pub snapshot: Snapshot,
}

/// Runs one program against a display and a keyboard.
///
/// Single threaded; the only places it blocks are `,`, breakpoints, step
/// mode and the final acknowledgement.
pub struct ExecutionDriver<'a> {
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    config: DriverConfig,
}

impl<'a> ExecutionDriver<'a> {
    pub fn new(
        display: &'a mut impl Display,
        input: &'a mut impl Input,
        config: DriverConfig,
    ) -> ExecutionDriver<'a> {
        ExecutionDriver {
            display,
            input,
            config,
        }
    }

    pub fn run(&mut self, program: Program) -> Result<RunReport> {
        let mut machine = TapeMachine::new(program, &self.config.machine)?;
        info!(
            "running {} instructions, refresh every {}",
            machine.program().len(),
            self.config.machine.refresh_interval
        );

        let result = self.main_loop(&mut machine);
        if let Err(e) = &result {
            error!("run aborted: {}", e);
        }
        let steps = result?;

        let snapshot = machine.snapshot();
        self.display.render(&snapshot)?;
        self.pause(Prompt::Done)?;
        info!("finished after {} steps", steps);
        Ok(RunReport {
            steps,
            output: machine.output().to_string(),
            snapshot,
        })
    }

    fn main_loop(&mut self, machine: &mut TapeMachine) -> Result<u64> {
        let mut pc = 0;
        let mut steps = 0u64;
        while machine.is_active(pc) {
            if self.config.breakpoints.contains(&pc) {
                debug!("breakpoint at pc={}", pc);
                self.pause(Prompt::Break)?;
            } else if self.config.step {
                self.refresh(machine)?;
                self.pause(Prompt::Step)?;
            }

            let wants_key = machine.program().get(pc) == Some(Instruction::Input);
            if wants_key {
                self.display.prompt(Prompt::Input)?;
            }
            let pc_next = machine.execute(pc, self.input)?;
            if wants_key {
                self.display.clear()?;
            }
            steps += 1;

            if machine.needs_refresh(pc_next) {
                self.refresh(machine)?;
            }
            pc = pc_next;
        }
        machine.check_loops_closed()?;
        Ok(steps)
    }

    fn refresh(&mut self, machine: &TapeMachine) -> Result<()> {
        self.display.render(&machine.snapshot())?;
        if let Some(delay) = self.config.frame_delay {
            spin_sleep::sleep(delay);
        }
        Ok(())
    }

    /// show why we've stopped, wait for any key, then clear
    fn pause(&mut self, prompt: Prompt) -> Result<()> {
        self.display.prompt(prompt)?;
        self.input.read_key()?;
        self.display.clear()?;
        Ok(())
    }
}
