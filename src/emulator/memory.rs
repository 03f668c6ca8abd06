use crate::emulator::error::{Error, Result};
use crate::util::nibble_pair::le_u16;

/// Size of the code/work memory.
pub const CODE_MEMORY_SIZE: usize = 32 * 1024;

/// Size of the graphics memory.
pub const GRAPHICS_MEMORY_SIZE: usize = 64 * 1024;

/// A fixed-size, bounds-checked byte buffer.
///
/// The buffer is allocated once and never resized.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Memory({} bytes)", self.bytes.len())
    }
}

impl Memory {

    /// Allocate a zero-filled buffer of `size` bytes.
    pub fn new(size: usize) -> Memory {
        Memory {
            bytes: vec![0; size].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn check(&self, offset: usize, width: usize) -> Result<()> {
        let end = offset.checked_add(width).filter(|end| *end <= self.bytes.len());
        match end {
            Some(_) => Ok(()),
            None => Err(Error::OutOfBounds {
                offset,
                width,
                len: self.bytes.len(),
            }),
        }
    }

    /// Read a single byte.
    pub fn read(&self, offset: usize) -> Result<u8> {
        self.check(offset, 1)?;
        Ok(self.bytes[offset])
    }

    /// Read a little-endian `u16`, least significant byte first.
    pub fn read_u16_le(&self, offset: usize) -> Result<u16> {
        self.check(offset, 2)?;
        Ok(le_u16(self.bytes[offset], self.bytes[offset + 1]))
    }

    /// Read a little-endian `i16`.
    pub fn read_i16_le(&self, offset: usize) -> Result<i16> {
        self.read_u16_le(offset).map(|value| value as i16)
    }

    /// Copy `bytes` into memory starting at `start`.
    ///
    /// The source is truncated to whatever fits, and the number of bytes
    /// actually written is returned.
    pub fn write_range(&mut self, start: usize, bytes: &[u8]) -> Result<usize> {
        if start > self.bytes.len() {
            return Err(Error::OutOfBounds {
                offset: start,
                width: bytes.len(),
                len: self.bytes.len(),
            });
        }
        let count = std::cmp::min(bytes.len(), self.bytes.len() - start);
        self.bytes[start..start + count].copy_from_slice(&bytes[..count]);
        Ok(count)
    }
}
