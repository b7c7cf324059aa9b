use std::fmt;
use std::io;

/// the eight opcodes of the tape language
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `>`
    Right,
    /// `<`
    Left,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
    /// `.`
    Output,
    /// `,`
    Input,
}

impl Instruction {
    /// decode one source character; anything outside the alphabet is a comment
    pub fn from_char(c: char) -> Option<Instruction> {
        match c {
            '+' => Some(Instruction::Increment),
            '-' => Some(Instruction::Decrement),
            '>' => Some(Instruction::Right),
            '<' => Some(Instruction::Left),
            '[' => Some(Instruction::LoopStart),
            ']' => Some(Instruction::LoopEnd),
            '.' => Some(Instruction::Output),
            ',' => Some(Instruction::Input),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Right => '>',
            Instruction::Left => '<',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
            Instruction::Output => '.',
            Instruction::Input => ',',
        }
    }

    /// I/O instructions always get a screen refresh before they run
    pub fn is_io(self) -> bool {
        matches!(self, Instruction::Output | Instruction::Input)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Sanitized, immutable instruction stream, indexed by pc.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// strip everything that isn't an opcode
    pub fn parse(source: &str) -> Self {
        Program {
            instructions: source.chars().filter_map(Instruction::from_char).collect(),
        }
    }

    /// read a whole source file. works on raw bytes so comments in any
    /// encoding are simply discarded
    pub fn load(reader: &mut impl io::Read) -> Result<Self, io::Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Program {
            instructions: buf
                .iter()
                .filter_map(|&b| Instruction::from_char(b as char))
                .collect(),
        })
    }

    pub fn get(&self, pc: usize) -> Option<Instruction> {
        self.instructions.get(pc).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in &self.instructions {
            write!(f, "{}", i)?;
        }
        Ok(())
    }
}
