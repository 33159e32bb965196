//! Errors that can occur using this crate.
//!
//! The crate's code is designed in a way that functions/methods _can_ trigger all the enum variants
//! specified in the returned [`Result`]

use displaydoc::Display;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;

/// Possible errors while reading and placing a program image.
///
/// Issues are invalid images or errors during attempts to load them.
/// `Display` and `Debug` provide all necessary details.
#[rustfmt::skip]
#[derive(Display, PartialEq, Eq)]
pub enum LoadImageError {
    /// Image is missing its origin header
    ImageMissingOriginHeader,
    /// Images must be an even amount of bytes (origin plus 16-bit words), but this one is {0} bytes long
    ImageNotEvenSize(u64),
    /// Image of {word_count} words does not fit into memory at origin {origin:#06X}
    ImageTooLong { origin: u16, word_count: usize },
    /// Cannot read image from file '{file}': {message}
    ImageNotReadable {
        file: String,
        message: String
    },
}
impl Debug for LoadImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
impl Error for LoadImageError {}

/// Possible errors during program execution.
///
/// `Display` and `Debug` provide all necessary details.
#[rustfmt::skip]
#[derive(Display, PartialEq, Eq)]
pub enum ExecutionError {
    /// The reserved opcode {0:#06b} was found which is not specified. Most probably an invalid program.
    ReservedInstructionFound(u8),
    /// The RTI opcode requires supervisor mode which this emulator does not provide
    RtiWithoutSupervisorMode,
    /// Error during reading Stdin or writing program output to Stdout: {0}
    IOInputOutputError(String),
    /// Unknown trap routine found: {0:#06X}
    UnknownTrapRoutine(u16),
}
impl Debug for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
impl Error for ExecutionError {}

impl From<io::Error> for ExecutionError {
    fn from(error: io::Error) -> Self {
        Self::IOInputOutputError(error.to_string())
    }
}
