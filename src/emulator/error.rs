use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while booting or running a cartridge.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cartridge not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error("invalid format: expected magic tag \"BIRTH_EXEC\", got {tag:?}")]
    InvalidFormat { tag: String },

    #[error("truncated cartridge: {section} section declares {expected} bytes but only {actual} are present")]
    TruncatedCartridge {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("out of bounds access of {width} byte(s) at offset {offset:#06x} (buffer length {len:#06x})")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("segfault: jump to {target:#06x} is out of bounds (code size {code_size:#06x})")]
    OutOfBoundsJump { target: u16, code_size: usize },

    #[error("undefined opcode {opcode:#04x} at {pc:#06x}")]
    UndefinedOpcode { opcode: u8, pc: usize },

    #[error("image of {width}x{height} pixels does not fit the 16-bit bitmap header")]
    ImageTooLarge { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
