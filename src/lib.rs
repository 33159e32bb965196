//! # LC-3 Emulator.
//!
//! `lc3-vm` is an emulator of the LC-3 system, a 16-bit educational
//! computer with eight general purpose registers, a flat 65,536 word
//! address space, a memory mapped keyboard and trap routines for console
//! I/O. Usage starts with one of the constructors in [`emulator`], then
//! [`Emulator::execute`] runs the program until it halts.
//!
//!  # Example
//! ```
//! use lc3_vm::emulator;
//! // a program image: origin 0x3000 followed by a single HALT trap
//! let mut emu = emulator::from_words(&[0x3000u16, 0xF025]).unwrap();
//! emu.execute().unwrap();
//! ```
//! # Errors
//! - Image is missing its origin header (shorter than one `u16` word)
//! - Image does not fit into memory at its origin
//! - Program executes a reserved opcode, RTI or an unknown trap routine

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod image;
pub mod terminal;

mod numbers;

pub use emulator::Emulator;
