use crate::program::Instruction;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MachineError>;

/// everything that can stop a run
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("malformed program at pc={pc}, code='{instruction}': {reason}")]
    MalformedProgram {
        pc: usize,
        instruction: Instruction,
        reason: &'static str,
    },
    #[error(
        "tape bounds exceeded at pc={pc}, code='{instruction}': pointer at {position:x} cannot leave 0..{capacity:x}"
    )]
    TapeBoundsExceeded {
        pc: usize,
        instruction: Instruction,
        position: usize,
        capacity: usize,
    },
    #[error("pc={pc} is outside the program (length {len})")]
    PcOutOfRange { pc: usize, len: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_pc_and_code() {
        let e = MachineError::MalformedProgram {
            pc: 7,
            instruction: Instruction::LoopEnd,
            reason: "unmatched ']'",
        };
        assert_eq!(
            e.to_string(),
            "malformed program at pc=7, code=']': unmatched ']'"
        );

        let e = MachineError::TapeBoundsExceeded {
            pc: 3,
            instruction: Instruction::Left,
            position: 0,
            capacity: 0x20,
        };
        assert!(e.to_string().starts_with("tape bounds exceeded at pc=3, code='<'"));
    }
}
