use crossterm::event::{poll, read};
use std::io;
use std::sync::mpsc;
use std::time::Duration;

/// Source of keypresses for the memory mapped keyboard registers.
///
/// `check_input_available` must not block; once it has returned `true` the
/// pending character can be fetched with `get_input_character`.
pub trait KeyboardInputProvider {
    /// # Errors
    /// - polling the host input source failed
    fn check_input_available(&mut self) -> io::Result<bool>;
    /// # Panics
    /// - no input is pending, callers must check availability first
    fn get_input_character(&mut self) -> char;
}

/// Reads keypresses from the process terminal via zero-timeout event polling.
pub struct TerminalInputProvider {
    available_char: Option<char>,
}
impl TerminalInputProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            available_char: None,
        }
    }
}
impl Default for TerminalInputProvider {
    fn default() -> Self {
        Self::new()
    }
}
impl KeyboardInputProvider for TerminalInputProvider {
    fn check_input_available(&mut self) -> io::Result<bool> {
        if self.available_char.is_some() {
            return Ok(true);
        }
        if poll(Duration::from_secs(0))?
            && let Some(event) = read()?.as_key_event()
            && let Some(c) = event.code.as_char()
        {
            self.available_char = Some(c);
            return Ok(true);
        }
        Ok(false)
    }
    fn get_input_character(&mut self) -> char {
        self.available_char
            .take()
            .unwrap_or_else(|| panic!("No input available"))
    }
}

/// Keyboard fed through an [`mpsc`] channel instead of a terminal.
///
/// Lets embedders and tests inject keypresses programmatically.
pub struct ChannelInputProvider {
    receiver: mpsc::Receiver<u16>,
    pending: Option<u16>,
}
impl ChannelInputProvider {
    #[must_use]
    pub const fn new(receiver: mpsc::Receiver<u16>) -> Self {
        Self {
            receiver,
            pending: None,
        }
    }
}
impl KeyboardInputProvider for ChannelInputProvider {
    fn check_input_available(&mut self) -> io::Result<bool> {
        if self.pending.is_none() {
            self.pending = self.receiver.try_recv().ok();
        }
        Ok(self.pending.is_some())
    }
    fn get_input_character(&mut self) -> char {
        let bits = self
            .pending
            .take()
            .unwrap_or_else(|| panic!("No input available"));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "keyboard input is ASCII, only the low byte is meaningful"
        )]
        char::from(bits as u8)
    }
}
