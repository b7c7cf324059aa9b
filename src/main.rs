use anyhow::Context;
use clap::Parser;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use tapeviz::config::{DEFAULT_REFRESH_INTERVAL, DEFAULT_TAPE_SIZE};
use tapeviz::{DriverConfig, ExecutionDriver, MachineConfig, Program, TermDisplay, TermInput};

#[derive(Parser)]
#[command(name = "tapeviz", about = "Step through a tape-language program with a live memory view")]
struct Cli {
    /// Source file; anything that isn't one of `+-<>[].,` is a comment.
    source: PathBuf,

    /// Redraw after this many `+ - . ,` instructions.
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL)]
    refresh_interval: u64,

    /// Pause before executing this pc (repeatable).
    #[arg(long = "breakpoint")]
    breakpoints: Vec<usize>,

    /// Pause and redraw before every instruction.
    #[arg(long)]
    step: bool,

    /// Sleep this many milliseconds after each redraw.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Tape cells, a multiple of 16; the pointer starts in the middle.
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,
}

impl Cli {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            machine: MachineConfig {
                refresh_interval: self.refresh_interval,
                tape_size: self.tape_size,
            },
            breakpoints: self.breakpoints.iter().copied().collect::<BTreeSet<_>>(),
            step: self.step,
            frame_delay: self.delay_ms.map(Duration::from_millis),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut f = File::open(&cli.source)
        .with_context(|| format!("can't open {}", cli.source.display()))?;
    let program = Program::load(&mut f)
        .with_context(|| format!("can't read {}", cli.source.display()))?;
    let config = cli.driver_config();
    config.validate()?;

    let mut display = TermDisplay::new()?;
    let mut input = TermInput::new()?;
    let report = ExecutionDriver::new(&mut display, &mut input, config).run(program);
    // NB. restore the terminal before anything is printed below
    drop(input);
    drop(display);
    let report = report.context("execution failed")?;

    // the alternate screen is gone, so leave the program's output behind
    print!("{}", report.output);
    Ok(())
}
