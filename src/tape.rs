use crate::config::MachineConfig;

// NB. addresses are absolute indices into the tape; the origin is biased to
//     the middle so the pointer can wander in either direction

/// Fixed-capacity byte memory.
///
/// Default layout (0x20000 cells):
///   0x00000-0x0ffff  left of origin
///   0x10000          origin, where the pointer starts
///   0x10001-0x1ffff  right of origin
///
/// the tape never grows; moving off either end is the machine's problem to
/// report, the tape itself only hands out cells and windows
pub struct Tape {
    cells: Box<[u8]>,
    origin: usize,
}

impl Tape {
    pub fn new(config: &MachineConfig) -> Self {
        Tape {
            cells: vec![0u8; config.tape_size].into_boxed_slice(),
            origin: config.origin(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// where the pointer starts
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// true if addr is a real cell
    pub fn contains(&self, addr: usize) -> bool {
        addr < self.cells.len()
    }

    pub fn get(&self, addr: usize) -> u8 {
        self.cells[addr]
    }

    pub fn set(&mut self, addr: usize, value: u8) {
        self.cells[addr] = value;
    }

    /// get a r/o slice of the underlying cells (hex dump windows)
    pub fn get_ro_slice(&self, addr: usize, len: usize) -> &[u8] {
        &self.cells[addr..(addr + len)]
    }
}
