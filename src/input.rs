use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::VecDeque;
use std::io;

/// what `,` stores when no key is available
pub const INPUT_DEFAULT: u8 = 0x0a;

/// reads keypresses
pub trait Input {
    /// block until one key arrives. `Ok(None)` means no input is available
    /// (end of input, or a key with no byte value); callers pick a default
    fn read_key(&mut self) -> Result<Option<u8>, io::Error>;
}

/// map a key event to the byte a program would see, ord mod 256
fn key_to_byte(evt: KeyEvent) -> Result<Option<u8>, io::Error> {
    match evt.code {
        KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => Err(
            io::Error::new(io::ErrorKind::Interrupted, "interrupted by ctrl-c"),
        ),
        KeyCode::Char(c) => Ok(Some((c as u32 & 0xff) as u8)),
        KeyCode::Enter => Ok(Some(0x0a)),
        KeyCode::Tab => Ok(Some(0x09)),
        KeyCode::Backspace => Ok(Some(0x08)),
        KeyCode::Esc => Ok(Some(0x1b)),
        _ => Ok(None),
    }
}

/// keyboard Input, using crossterm in raw mode
pub struct TermInput;

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput)
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("couldn't leave raw mode: {}", e);
        }
    }
}

impl Input for TermInput {
    fn read_key(&mut self) -> Result<Option<u8>, io::Error> {
        loop {
            match read()? {
                Event::Key(evt) => return key_to_byte(evt),
                // resizes and mouse noise aren't keypresses
                _ => continue,
            }
        }
    }
}

/// scripted Input for testing; runs dry into `None`
pub struct DummyInput {
    bytes: VecDeque<u8>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            bytes: keys.iter().copied().collect(),
        }
    }

    /// keys not yet consumed
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl Input for DummyInput {
    fn read_key(&mut self) -> Result<Option<u8>, io::Error> {
        Ok(self.bytes.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_char_keys() -> Result<(), io::Error> {
        assert_eq!(key_to_byte(key(KeyCode::Char('A')))?, Some(0x41));
        // ord mod 256
        assert_eq!(key_to_byte(key(KeyCode::Char('\u{141}')))?, Some(0x41));
        Ok(())
    }

    #[test]
    fn test_control_keys() -> Result<(), io::Error> {
        assert_eq!(key_to_byte(key(KeyCode::Enter))?, Some(0x0a));
        assert_eq!(key_to_byte(key(KeyCode::Tab))?, Some(0x09));
        assert_eq!(key_to_byte(key(KeyCode::Up))?, None);
        Ok(())
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let evt = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let err = key_to_byte(evt).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn test_dummy_input_runs_dry() -> Result<(), io::Error> {
        let mut i = DummyInput::new(b"hi");
        assert_eq!(i.read_key()?, Some(b'h'));
        assert_eq!(i.read_key()?, Some(b'i'));
        assert_eq!(i.remaining(), 0);
        assert_eq!(i.read_key()?, None);
        Ok(())
    }
}
