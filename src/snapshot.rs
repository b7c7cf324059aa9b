use crate::config::ROW_BYTES;
use crate::program::Instruction;
use std::fmt::{self, Write};

/// the status line is padded to this many columns
pub const LINE_WIDTH: usize = 100;

/// width of the `=====` rules between screen sections
pub const SEPARATOR_WIDTH: usize = 78;

/// One row of the hex dump: an address and the 16 cells from there.
///
/// Renders as
/// `00010000  0a 00 00 00 00 00 00 00  00 00 00 00 00 00 00 00   ........ ........`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexRow {
    pub address: usize,
    pub bytes: [u8; ROW_BYTES],
}

impl HexRow {
    /// short slices are zero padded
    pub fn new(address: usize, data: &[u8]) -> Self {
        let mut bytes = [0u8; ROW_BYTES];
        let n = data.len().min(ROW_BYTES);
        bytes[..n].copy_from_slice(&data[..n]);
        HexRow { address, bytes }
    }
}

/// what a cell looks like in the ascii gloss
fn printable(b: u8) -> char {
    if (0x20..0x7f).contains(&b) {
        b as char
    } else {
        '.'
    }
}

impl fmt::Display for HexRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}  ", self.address)?;
        for (i, b) in self.bytes.iter().enumerate() {
            if i == ROW_BYTES / 2 {
                f.write_char(' ')?;
            }
            write!(f, "{:02x} ", b)?;
        }
        f.write_str("  ")?;
        for (i, &b) in self.bytes.iter().enumerate() {
            if i == ROW_BYTES / 2 {
                f.write_char(' ')?;
            }
            f.write_char(printable(b))?;
        }
        Ok(())
    }
}

/// Read-only picture of the machine at one moment. Displays draw these
/// however they like; the text helpers give the classic layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// pc of the most recently executed instruction
    pub pc: usize,
    /// None for an empty program
    pub instruction: Option<Instruction>,
    pub position: usize,
    pub value: u8,
    pub output: String,
    pub rows: Vec<HexRow>,
}

impl Snapshot {
    /// `pc=<pc>, code='<symbol>', pos=<hex>, val=<decimal>`, padded
    pub fn status_line(&self) -> String {
        let code = self.instruction.map_or(' ', Instruction::symbol);
        let line = format!(
            "pc={}, code='{}', pos={:x}, val={}",
            self.pc, code, self.position, self.value
        );
        format!("{:<width$}", line, width = LINE_WIDTH)
    }

    /// every row, newline terminated
    pub fn hex_dump(&self) -> String {
        self.rows.iter().map(|row| format!("{}\n", row)).collect()
    }

    pub fn separator() -> String {
        "=".repeat(SEPARATOR_WIDTH)
    }
}
