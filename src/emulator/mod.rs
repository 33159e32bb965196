//! The interpreter: fetch, decode and execute until the program halts.

use crate::errors::{ExecutionError, LoadImageError};
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};
use crate::image::{self, Image};
use std::io;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::mpsc;
use tracing::trace;

pub mod instruction;
pub mod opcodes;
pub mod trap_routines;

#[cfg(test)]
pub mod test_helpers;

use instruction::Instruction;

/// The public facing emulator used to run LC-3 programs.
///
/// Construct one with [`from_program`], [`from_image`] or [`from_words`],
/// then drive it with [`Emulator::execute`]. Registers stay inspectable
/// after the run.
pub struct Emulator {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
}

impl std::fmt::Debug for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Emulator {{ registers: {:?}, memory: [...] }}",
            self.registers
        )
    }
}

/// Builds an emulator from an image file on disk.
///
/// # Errors
/// - image is not readable or malformed, see [`image::read_image`]
pub fn from_program(path: impl AsRef<Path>) -> Result<Emulator, LoadImageError> {
    from_image(&image::read_image(path)?)
}

/// Builds an emulator from an already parsed [`Image`].
///
/// # Errors
/// - image does not fit into memory at its origin
pub fn from_image(img: &Image) -> Result<Emulator, LoadImageError> {
    let mut memory = Memory::new();
    memory.load_image(img.origin(), img.words())?;
    Ok(Emulator {
        memory,
        registers: Registers::new(),
    })
}

/// Builds an emulator from words already in host byte order, the first one
/// naming the origin.
///
/// # Errors
/// - `words` is empty
/// - program does not fit into memory at its origin
pub fn from_words(words: &[u16]) -> Result<Emulator, LoadImageError> {
    from_words_with_memory(words, Memory::new())
}

/// Like [`from_words`] but with keypresses fed through a channel instead of
/// the process terminal.
///
/// # Errors
/// - see [`from_words`]
pub fn from_words_with_kbd_input_receiver(
    words: &[u16],
    receiver: mpsc::Receiver<u16>,
) -> Result<Emulator, LoadImageError> {
    from_words_with_memory(words, Memory::with_kbd_input_receiver(receiver))
}

fn from_words_with_memory(words: &[u16], mut memory: Memory) -> Result<Emulator, LoadImageError> {
    let (header, rest) = words
        .split_first()
        .ok_or(LoadImageError::ImageMissingOriginHeader)?;
    memory.load_image(*header, rest)?;
    Ok(Emulator {
        memory,
        registers: Registers::new(),
    })
}

impl Emulator {
    /// Runs the program against the process stdout until it halts.
    ///
    /// # Errors
    /// - reserved or unsupported opcode was fetched
    /// - unknown trap routine was requested
    /// - host I/O failed
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        let mut stdout = io::stdout();
        self.execute_with_output(&mut stdout)
    }

    /// Runs the program with trap output going to `output`.
    ///
    /// This is the testable core of [`Emulator::execute`].
    ///
    /// # Errors
    /// - see [`Emulator::execute`]
    pub fn execute_with_output(&mut self, output: &mut impl Write) -> Result<(), ExecutionError> {
        loop {
            let fetch_pc = self.registers.pc().as_binary();
            let instruction = Instruction::from(self.memory.read(fetch_pc)?);
            self.registers.inc_pc();
            trace!(pc = fetch_pc, opcode = instruction.op_code(), "executing");
            match instruction.op_code() {
                opcodes::OP_BR => opcodes::br(instruction, &mut self.registers),
                opcodes::OP_ADD => opcodes::add(instruction, &mut self.registers),
                opcodes::OP_LD => {
                    opcodes::ld(instruction, &mut self.registers, &mut self.memory)?;
                }
                opcodes::OP_ST => opcodes::st(instruction, &self.registers, &mut self.memory),
                opcodes::OP_JSR => opcodes::jsr(instruction, &mut self.registers),
                opcodes::OP_AND => opcodes::and(instruction, &mut self.registers),
                opcodes::OP_LDR => {
                    opcodes::ldr(instruction, &mut self.registers, &mut self.memory)?;
                }
                opcodes::OP_STR => opcodes::str(instruction, &self.registers, &mut self.memory),
                opcodes::OP_RTI => return Err(ExecutionError::RtiWithoutSupervisorMode),
                opcodes::OP_NOT => opcodes::not(instruction, &mut self.registers),
                opcodes::OP_LDI => {
                    opcodes::ldi(instruction, &mut self.registers, &mut self.memory)?;
                }
                opcodes::OP_STI => {
                    opcodes::sti(instruction, &self.registers, &mut self.memory)?;
                }
                opcodes::OP_JMP => opcodes::jmp_or_ret(instruction, &mut self.registers),
                opcodes::OP_RESERVED => {
                    return Err(ExecutionError::ReservedInstructionFound(
                        instruction.op_code(),
                    ));
                }
                opcodes::OP_LEA => opcodes::lea(instruction, &mut self.registers),
                opcodes::OP_TRAP => {
                    // the return address is the already incremented PC
                    self.registers
                        .set(7, from_binary(self.registers.pc().as_binary()));
                    if let ControlFlow::Break(result) = trap_routines::dispatch(
                        instruction,
                        &mut self.registers,
                        &mut self.memory,
                        output,
                    ) {
                        return result;
                    }
                }
                _ => unreachable!("op_code is four bits wide"),
            }
        }
    }

    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }
    /// Puts all registers back into their power-on state so a loaded image
    /// can be run again.
    pub fn reset_registers(&mut self) {
        self.registers = Registers::new();
    }
}
