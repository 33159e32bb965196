use crate::errors::LoadImageError;
use crate::errors::LoadImageError::ImageTooLong;
use crate::hardware::keyboard::{ChannelInputProvider, KeyboardInputProvider, TerminalInputProvider};
use std::io;
use std::ops::Index;
use std::sync::mpsc;

/// Number of addressable 16-bit words.
pub const MEMORY_SIZE: usize = 1 << 16;

/// Addresses owned by the memory mapped keyboard device.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMappedIOLocations {
    /// Keyboard status register, bit 15 signals a pending keypress
    Kbsr = 0xFE00,
    /// Keyboard data register, holds the last polled character
    Kbdr = 0xFE02,
}

/// An abstraction for the LC-3 memory including the memory mapped keyboard
/// registers.
///
/// Reading the keyboard status register polls the attached
/// [`KeyboardInputProvider`] without blocking, so a program that never
/// inspects KBSR never touches the keyboard.
pub struct Memory {
    /// Index equals memory address
    data: Vec<u16>,
    keyboard: Box<dyn KeyboardInputProvider>,
}
impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_keyboard(Box::new(TerminalInputProvider::new()))
    }
    #[must_use]
    pub fn with_keyboard(keyboard: Box<dyn KeyboardInputProvider>) -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE],
            keyboard,
        }
    }
    #[must_use]
    pub fn with_kbd_input_receiver(receiver: mpsc::Receiver<u16>) -> Self {
        Self::with_keyboard(Box::new(ChannelInputProvider::new(receiver)))
    }

    /// Reads one word, servicing the keyboard device first when the status
    /// register is addressed.
    ///
    /// # Errors
    /// - the keyboard poll failed on the host side
    pub fn read(&mut self, address: u16) -> io::Result<u16> {
        if address == MemoryMappedIOLocations::Kbsr as u16 {
            if self.keyboard.check_input_available()? {
                let c = self.keyboard.get_input_character();
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "the data register holds the low byte of the keypress"
                )]
                self.write(MemoryMappedIOLocations::Kbdr as u16, u16::from(c as u8));
                self.write(MemoryMappedIOLocations::Kbsr as u16, 1 << 15);
            } else {
                self.write(MemoryMappedIOLocations::Kbsr as u16, 0);
            }
        }
        Ok(self.data[usize::from(address)])
    }

    /// Writes one word unconditionally.
    pub fn write(&mut self, address: u16, value: u16) {
        self.data[usize::from(address)] = value;
    }

    /// Places `words` contiguously into memory starting at `origin`.
    ///
    /// # Errors
    /// - Image does not fit between `origin` and the end of the address space
    pub fn load_image(&mut self, origin: u16, words: &[u16]) -> Result<(), LoadImageError> {
        let start = usize::from(origin);
        if words.len() > MEMORY_SIZE - start {
            return Err(ImageTooLong {
                origin,
                word_count: words.len(),
            });
        }
        self.data[start..start + words.len()].copy_from_slice(words);
        Ok(())
    }
}
impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain cell access without keyboard polling, used by the string traps to
/// walk program data.
impl Index<u16> for Memory {
    type Output = u16;
    fn index(&self, address: u16) -> &u16 {
        &self.data[usize::from(address)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    const KBSR: u16 = MemoryMappedIOLocations::Kbsr as u16;
    const KBDR: u16 = MemoryMappedIOLocations::Kbdr as u16;

    fn memory_with_channel() -> (mpsc::Sender<u16>, Memory) {
        let (sender, receiver) = mpsc::channel();
        (sender, Memory::with_kbd_input_receiver(receiver))
    }

    #[gtest]
    pub fn test_read_write_round_trip() {
        let (_sender, mut memory) = memory_with_channel();
        memory.write(0x4000, 0x1234);
        expect_that!(memory.read(0x4000).unwrap(), eq(0x1234));
        expect_that!(memory[0x4000], eq(0x1234));
    }
    #[gtest]
    pub fn test_unwritten_cells_read_zero() {
        let (_sender, mut memory) = memory_with_channel();
        expect_that!(memory.read(0x0000).unwrap(), eq(0));
        expect_that!(memory.read(0xFFFF).unwrap(), eq(0));
    }
    #[gtest]
    pub fn test_kbsr_read_without_pending_key() {
        let (_sender, mut memory) = memory_with_channel();
        memory.write(KBDR, 0x0061);
        expect_that!(memory.read(KBSR).unwrap(), eq(0));
        // the data register keeps its previous content
        expect_that!(memory[KBDR], eq(0x0061));
    }
    #[gtest]
    pub fn test_kbsr_read_with_pending_key() {
        let (sender, mut memory) = memory_with_channel();
        sender.send(u16::from(b'a')).unwrap();
        expect_that!(memory.read(KBSR).unwrap(), eq(0x8000));
        expect_that!(memory.read(KBDR).unwrap(), eq(u16::from(b'a')));
        // the key was consumed, the next poll reports idle again
        expect_that!(memory.read(KBSR).unwrap(), eq(0));
    }
    #[gtest]
    pub fn test_plain_reads_do_not_poll() {
        let (sender, mut memory) = memory_with_channel();
        sender.send(u16::from(b'a')).unwrap();
        expect_that!(memory.read(0x3000).unwrap(), eq(0));
        expect_that!(memory[KBSR], eq(0));
    }
    #[gtest]
    pub fn test_load_image_at_origin() {
        let (_sender, mut memory) = memory_with_channel();
        memory.load_image(0x3000, &[0xF025, 0x1234]).unwrap();
        expect_that!(memory[0x3000], eq(0xF025));
        expect_that!(memory[0x3001], eq(0x1234));
        expect_that!(memory[0x3002], eq(0));
    }
    #[gtest]
    pub fn test_load_image_up_to_last_cell() {
        let (_sender, mut memory) = memory_with_channel();
        memory.load_image(0xFFFE, &[1, 2]).unwrap();
        expect_that!(memory[0xFFFE], eq(1));
        expect_that!(memory[0xFFFF], eq(2));
    }
    #[gtest]
    pub fn test_load_image_too_long() {
        let (_sender, mut memory) = memory_with_channel();
        let words = vec![0u16; 3];
        assert_that!(
            memory.load_image(0xFFFE, &words).unwrap_err().to_string(),
            eq("Image of 3 words does not fit into memory at origin 0xFFFE")
        );
    }
}
