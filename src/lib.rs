//! Visual interpreter for the eight-instruction tape language.
//!
//! ## Design
//!
//! * the machine knows nothing about screens; it hands out `Snapshot`s
//! * abstract display and keyboard behind traits so either can be swapped,
//!   starting with TUI in-console (and dummies for tests)
//! * one thread, no scheduler. the run blocks only on `,`, breakpoints,
//!   step mode and the final keypress
//! * redraw every N visible effects, and always right before I/O, so compute
//!   heavy programs stay fast and I/O is never missed
//!
//! Model
//!
//! main
//!  |-- program (sanitized source), config
//!  |-- display, input
//!  `-- driver(display, input, config)
//!       |-- machine(program, config)
//!       |    |-- tape
//!       |    `-- loop stack, output buffer, refresh counter
//!       `-- loop
//!            |-- pause if pc is a breakpoint (or always, in step mode)
//!            |-- pc_next = machine.execute(pc)
//!            |-- if machine.needs_refresh(pc_next) { display.render(machine.snapshot()) }
//!            `-- pc = pc_next, until pc runs off the end
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod input;
pub mod machine;
pub mod program;
pub mod snapshot;
pub mod tape;

pub use config::{DriverConfig, MachineConfig};
pub use display::{Display, DummyDisplay, Prompt, TermDisplay};
pub use driver::{ExecutionDriver, RunReport};
pub use error::{MachineError, Result};
pub use input::{DummyInput, Input, TermInput};
pub use machine::TapeMachine;
pub use program::{Instruction, Program};
pub use snapshot::{HexRow, Snapshot};
