//! This code does emulate the trap routines but does not implement them via the opcodes of the LC3
//! but directly.
//!
//! In the real system the code for these routines is at the target of the
//! [Trap Vector Tables](https://cs131.info/Assembly/Instructions/TRAPRoutines.html#trap-vector-table).

use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::memory::{Memory, MemoryMappedIOLocations};
use crate::hardware::registers::{Registers, from_binary};
use crate::terminal;
use crate::terminal::EchoOptions;
use std::io;
use std::io::Write;
use std::ops::ControlFlow;
use std::thread::sleep;
use std::time::Duration;

pub const TRAP_GETC: u16 = 0x20;
pub const TRAP_OUT: u16 = 0x21;
pub const TRAP_PUTS: u16 = 0x22;
pub const TRAP_IN: u16 = 0x23;
pub const TRAP_PUTSP: u16 = 0x24;
pub const TRAP_HALT: u16 = 0x25;

/// Runs the service routine selected by the trap vector of `i`.
///
/// `ControlFlow::Break` carries the reason the interpreter loop has to stop:
/// a clean HALT or a fatal error.
pub fn dispatch(
    i: Instruction,
    regs: &mut Registers,
    memory: &mut Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    match i.trap_vector() {
        TRAP_GETC => get_c(regs, memory, stdout),
        TRAP_OUT => out(regs, stdout),
        TRAP_PUTS => put_s(regs, memory, stdout),
        TRAP_IN => in_trap(regs, memory, stdout),
        TRAP_PUTSP => put_sp(regs, memory, stdout),
        TRAP_HALT => halt(stdout),
        unknown => ControlFlow::Break(Err(ExecutionError::UnknownTrapRoutine(unknown))),
    }
}

/// Blocks until the keyboard delivers a character, then stores it in R0.
///
/// Polling goes through [`Memory::read`] of the status register, the same
/// path a program would take by hand, so the data register stays consistent
/// with what the program observes.
fn read_character_from_console(
    regs: &mut Registers,
    eo: EchoOptions,
    memory: &mut Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    loop {
        let status = match memory.read(MemoryMappedIOLocations::Kbsr as u16) {
            Ok(status) => status,
            Err(e) => return wrap_io_error_in_cf(&e),
        };
        if status >> 15 == 1 {
            let c = match memory.read(MemoryMappedIOLocations::Kbdr as u16) {
                Ok(c) => c & 0xFF,
                Err(e) => return wrap_io_error_in_cf(&e),
            };
            regs.set(0, from_binary(c));
            regs.update_conditional_register(0);
            if eo == EchoOptions::EchoOn {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "the data register only ever holds one byte"
                )]
                let arr = &[c as u8];
                let output = String::from_utf8_lossy(arr);
                return write_str_out(output.as_ref(), stdout);
            }
            return ControlFlow::Continue(());
        }
        sleep(Duration::from_millis(20));
    }
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(
    regs: &mut Registers,
    memory: &mut Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    read_character_from_console(regs, EchoOptions::EchoOff, memory, stdout)
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    memory: &mut Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    write_str_out("Enter a character: ", stdout)?;
    read_character_from_console(regs, EchoOptions::EchoOn, memory, stdout)
}

/// OUT: Write a character in R0\[7:0\] to the console display.
pub fn out(regs: &Registers, stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    let c: char = (regs.get(0).as_binary() & 0xFF) as u8 as char;
    write_str_out(&String::from(c), stdout)
}

fn put_one_char_per_u16(input: u16, append_to: &mut String) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation is what is expected here"
    )]
    let c = (input as u8) as char;
    append_to.push(c);
}

fn put_two_chars_per_u16(input: u16, append_to: &mut String) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation is what is expected here"
    )]
    let c = (input as u8) as char;
    append_to.push(c);
    let c = ((input >> 8) as u8) as char;
    if c != '\0' {
        append_to.push(c);
    }
}

fn put(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
    handle_char: fn(u16, &mut String),
) -> ControlFlow<Result<(), ExecutionError>> {
    let address = regs.get(0).as_binary();
    let mut end = address;
    let mut s = String::with_capacity(120);
    while mem[end] != 0 {
        handle_char(mem[end], &mut s);
        end = end.wrapping_add(1);
    }
    write_str_out(s.as_str(), stdout)
}

/// PUTS: print null-delimited char* from register 0's address
pub fn put_s(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits \[7:0\] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x0000 word.
pub fn put_sp(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_two_chars_per_u16)
}

/// HALT: End program and stdout a message
pub fn halt(stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    write_str_out("\nProgram halted\n", stdout)?;
    ControlFlow::Break(Ok(()))
}

fn write_str_out(
    message: &str,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    match terminal::print(stdout, message) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

fn wrap_io_error_in_cf(error: &io::Error) -> ControlFlow<Result<(), ExecutionError>, ()> {
    ControlFlow::Break(Err(ExecutionError::IOInputOutputError(error.to_string())))
}
