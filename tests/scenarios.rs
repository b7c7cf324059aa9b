use std::collections::BTreeSet;

use tapeviz::{
    DriverConfig, DummyDisplay, DummyInput, ExecutionDriver, Instruction, MachineConfig,
    MachineError, Program, Prompt, Result,
};

fn run_with(source: &str, keys: &[u8], config: DriverConfig) -> (Result<tapeviz::RunReport>, DummyDisplay) {
    let mut display = DummyDisplay::new();
    let mut input = DummyInput::new(keys);
    let result = ExecutionDriver::new(&mut display, &mut input, config).run(Program::parse(source));
    (result, display)
}

fn run(source: &str, keys: &[u8]) -> (Result<tapeviz::RunReport>, DummyDisplay) {
    run_with(source, keys, DriverConfig::default())
}

#[test]
fn test_multiply_into_newline() -> Result<()> {
    let (report, _) = run("++++>++++++[<+>-]<.", &[]);
    let report = report?;
    assert_eq!(report.output, "\n");

    let s = &report.snapshot;
    assert_eq!(s.position, 0x10000);
    assert_eq!(s.value, 10);
    // origin and its right-hand neighbour share the one dump row
    assert_eq!(s.rows.len(), 1);
    assert_eq!(s.rows[0].address, 0x10000);
    assert_eq!(s.rows[0].bytes[0], 10);
    assert_eq!(s.rows[0].bytes[1], 0);
    Ok(())
}

#[test]
fn test_unclosed_loop_is_malformed() {
    let (result, display) = run("+[-", &[]);
    match result {
        Err(MachineError::MalformedProgram { pc, instruction, .. }) => {
            assert_eq!(pc, 1);
            assert_eq!(instruction, Instruction::LoopStart);
        }
        other => panic!("expected MalformedProgram, got {:?}", other),
    }
    assert!(!display.prompts.contains(&Prompt::Done));
}

#[test]
fn test_skip_runs_past_end() {
    let (result, _) = run("[[]", &[]);
    assert!(matches!(
        result,
        Err(MachineError::MalformedProgram { pc: 0, .. })
    ));
}

#[test]
fn test_lone_close_fails_first_step() {
    let (result, display) = run("]", &[]);
    let err = result.unwrap_err();
    assert!(matches!(err, MachineError::MalformedProgram { pc: 0, .. }));
    assert!(err.to_string().contains("pc=0, code=']'"));
    assert!(display.snapshots.is_empty());
}

#[test]
fn test_hello_world() -> Result<()> {
    let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
    let (report, _) = run(source, &[]);
    assert_eq!(report?.output, "Hello World!\n");
    Ok(())
}

#[test]
fn test_echo_until_keys_run_out() -> Result<()> {
    // read, echo; once the script is dry every read is a newline
    let (report, display) = run(",.,.,.", b"ok");
    assert_eq!(report?.output, "ok\n");
    let inputs = display.prompts.iter().filter(|&&p| p == Prompt::Input).count();
    assert_eq!(inputs, 3);
    Ok(())
}

#[test]
fn test_refresh_before_every_output() -> Result<()> {
    let (report, display) = run("+.+.+.", &[]);
    report?;
    // each '+' is followed by a '.', the last '.' is followed by nothing
    let before_output: Vec<usize> = display.snapshots.iter().map(|s| s.pc).collect();
    assert_eq!(before_output, vec![0, 2, 4, 5]);
    Ok(())
}

#[test]
fn test_refresh_interval_throttles() -> Result<()> {
    let config = DriverConfig {
        machine: MachineConfig {
            refresh_interval: 4,
            ..MachineConfig::default()
        },
        ..DriverConfig::default()
    };
    let (report, display) = run_with(&"+".repeat(10), &[], config);
    report?;
    // counts 4 and 8, plus the final frame
    let pcs: Vec<usize> = display.snapshots.iter().map(|s| s.pc).collect();
    assert_eq!(pcs, vec![3, 7, 9]);
    Ok(())
}

#[test]
fn test_breakpoints_pause() -> Result<()> {
    let config = DriverConfig {
        breakpoints: BTreeSet::from([1, 3]),
        ..DriverConfig::default()
    };
    let (report, display) = run_with("+>+<", b"  ", config);
    assert_eq!(report?.steps, 4);
    assert_eq!(
        display.prompts,
        vec![Prompt::Break, Prompt::Break, Prompt::Done]
    );
    Ok(())
}

#[test]
fn test_breakpoint_in_loop_hits_each_pass() -> Result<()> {
    let config = DriverConfig {
        breakpoints: BTreeSet::from([4]),
        ..DriverConfig::default()
    };
    let (report, display) = run_with("+++[-]", &[], config);
    report?;
    let breaks = display.prompts.iter().filter(|&&p| p == Prompt::Break).count();
    assert_eq!(breaks, 3);
    Ok(())
}

#[test]
fn test_nested_loops_leave_stack_empty() -> Result<()> {
    // 3 * 4 into the third cell
    let (report, _) = run("+++[>++++[>+<-]<-]>>", &[]);
    let report = report?;
    assert_eq!(report.snapshot.value, 12);
    assert_eq!(report.snapshot.position, 0x10002);
    Ok(())
}

#[test]
fn test_tape_bounds_exceeded() {
    let config = DriverConfig {
        machine: MachineConfig {
            tape_size: 32,
            ..MachineConfig::default()
        },
        ..DriverConfig::default()
    };
    let (result, _) = run_with("+[<+]", &[], config);
    assert!(matches!(
        result,
        Err(MachineError::TapeBoundsExceeded { position: 0, capacity: 32, .. })
    ));
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let config = DriverConfig {
        machine: MachineConfig {
            tape_size: 30,
            ..MachineConfig::default()
        },
        ..DriverConfig::default()
    };
    let (result, display) = run_with("+", &[], config);
    assert!(matches!(result, Err(MachineError::InvalidConfig(_))));
    assert!(display.snapshots.is_empty());
}
