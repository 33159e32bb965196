use crate::emulator;
use crate::emulator::Emulator;
use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::io;
use std::io::Write;
use std::sync::mpsc;

pub struct StringWriter {
    vec: Vec<u8>,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        let vec = Vec::<u8>::with_capacity(120);
        Self { vec }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// An [`Emulator`] wired to a channel keyboard and an in-memory stdout, for
/// driving programs and trap routines without a terminal.
///
/// Programs are placed at the canonical 0x3000 start address.
pub struct FakeEmulator {
    inner: Emulator,
    stdout: StringWriter,
    keyboard_input_sender: mpsc::Sender<u16>,
}
impl FakeEmulator {
    pub fn new(program_no_header: &[u16]) -> Self {
        let mut program = Vec::with_capacity(program_no_header.len() + 1);
        program.push(0x3000u16);
        program.extend_from_slice(program_no_header);
        let (keyboard_input_sender, receiver) = mpsc::channel();
        let emu =
            emulator::from_words_with_kbd_input_receiver(program.as_slice(), receiver).unwrap();
        Self {
            inner: emu,
            stdout: StringWriter::new(),
            keyboard_input_sender,
        }
    }
    /// Queues bytes as pending keypresses.
    pub fn add_stdin_input(&mut self, input: &[u8]) -> &mut Self {
        for b in input {
            self.keyboard_input_sender
                .send(u16::from(*b))
                .expect("keyboard channel closed");
        }
        self
    }
    pub fn get_parts(&mut self) -> (&mut Registers, &mut Memory, &mut StringWriter) {
        (
            &mut self.inner.registers,
            &mut self.inner.memory,
            &mut self.stdout,
        )
    }
    /// Runs the program to completion against the captured stdout.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        self.inner.execute_with_output(&mut self.stdout)
    }
    pub fn registers(&self) -> &Registers {
        self.inner.registers()
    }
    pub fn reset(&mut self) {
        self.inner.reset_registers();
    }
    pub fn output(&self) -> String {
        self.stdout.get_string()
    }
}
