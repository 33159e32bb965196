//! Loading of assembled LC-3 program images.
//!
//! An image is a byte stream: the first 16-bit word names the origin, every
//! following word is placed contiguously from that address on. All words are
//! stored big-endian and converted to the host representation while reading.

use crate::errors::LoadImageError;
use crate::hardware::memory::MEMORY_SIZE;
use byteorder::{BigEndian, ReadBytesExt};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A parsed program image, not yet placed into memory.
///
/// Parsing completes before any machine state is touched, so a broken image
/// can never leave memory partially populated.
pub struct Image {
    origin: u16,
    words: Vec<u16>,
}
impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Image {{ origin: {:#06X}, words: {} }}",
            self.origin,
            self.words.len()
        )
    }
}
impl Image {
    #[must_use]
    pub const fn origin(&self) -> u16 {
        self.origin
    }
    #[must_use]
    pub fn words(&self) -> &[u16] {
        &self.words
    }
}

/// Reads an image file from `path`.
///
/// # Errors
/// - file is not readable
/// - see [`from_bytes`] for the format errors
pub fn read_image(path: impl AsRef<Path>) -> Result<Image, LoadImageError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| LoadImageError::ImageNotReadable {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;
    from_bytes(&bytes)
}

/// Parses an image from its raw bytes.
///
/// Words that would fall beyond the end of the address space are ignored,
/// matching what fits between the origin and the last memory cell.
///
/// # Errors
/// - stream is shorter than the two origin bytes
/// - stream has an odd number of bytes
pub fn from_bytes(bytes: &[u8]) -> Result<Image, LoadImageError> {
    if bytes.len() < 2 {
        return Err(LoadImageError::ImageMissingOriginHeader);
    }
    if bytes.len() % 2 != 0 {
        return Err(LoadImageError::ImageNotEvenSize(bytes.len() as u64));
    }
    let mut reader = bytes;
    let origin = reader
        .read_u16::<BigEndian>()
        .map_err(|_| LoadImageError::ImageMissingOriginHeader)?;

    let capacity = MEMORY_SIZE - usize::from(origin);
    let mut words = Vec::with_capacity((bytes.len() / 2 - 1).min(capacity));
    while words.len() < capacity {
        match reader.read_u16::<BigEndian>() {
            Ok(word) => words.push(word),
            Err(_) => break,
        }
    }
    debug!(origin, words = words.len(), "parsed program image");
    Ok(Image { origin, words })
}
