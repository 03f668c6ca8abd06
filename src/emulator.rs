//! The console: memory, processor, tile graphics and the frame loop that
//! ties them to an output device.

pub mod cartridge;
pub mod config;
pub mod console;
pub mod emulator;
pub mod error;
pub mod filesystem;
pub mod instruction;
pub mod memory;
pub mod output;
pub mod tile;

pub use self::emulator::Emulator;
pub use self::error::{Error, Result};
