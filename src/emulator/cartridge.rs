//! The `.BGF` cartridge container.
//!
//! ```text
//! offset 0       10 bytes  ASCII magic "BIRTH_EXEC"
//! offset 10      u32 LE    entry point (not used by execution)
//! offset 14      u32 LE    code length C
//! offset 18      u32 LE    graphics length G
//! offset 22      C bytes   code
//! offset 22 + C  G bytes   graphics
//! ```

use std::io::{self, Read, Write};

use crate::emulator::error::{Error, Result};

pub const MAGIC: &[u8; 10] = b"BIRTH_EXEC";
pub const HEADER_LEN: usize = 22;

/// A parsed cartridge image. Nothing has been copied into console memory yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cartridge {
    pub entry_point: u32,
    pub code: Vec<u8>,
    pub graphics: Vec<u8>,
}

impl Cartridge {

    pub fn new(code: Vec<u8>, graphics: Vec<u8>) -> Cartridge {
        Cartridge {
            entry_point: 0,
            code,
            graphics,
        }
    }

    /// Parse a whole cartridge from `reader`.
    ///
    /// Fails with `InvalidFormat` when the magic tag doesn't match, and with
    /// `TruncatedCartridge` when the stream ends before a declared section does.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Cartridge> {
        let mut magic = [0u8; 10];
        let got = read_up_to(reader, &mut magic)?;
        if got < magic.len() || &magic != MAGIC {
            return Err(Error::InvalidFormat {
                tag: String::from_utf8_lossy(&magic[..got]).into_owned(),
            });
        }

        let mut header = [0u8; HEADER_LEN - 10];
        let got = read_up_to(reader, &mut header)?;
        if got < header.len() {
            return Err(Error::TruncatedCartridge {
                section: "header",
                expected: HEADER_LEN,
                actual: magic.len() + got,
            });
        }
        let entry_point = u32_le(&header[0..4]);
        let code_len = u32_le(&header[4..8]) as usize;
        let graphics_len = u32_le(&header[8..12]) as usize;

        let code = read_section(reader, "code", code_len)?;
        let graphics = read_section(reader, "graphics", graphics_len)?;

        Ok(Cartridge {
            entry_point,
            code,
            graphics,
        })
    }

    pub fn from_bytes(mut bytes: &[u8]) -> Result<Cartridge> {
        Cartridge::read_from(&mut bytes)
    }

    /// Write the cartridge in its binary layout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&self.entry_point.to_le_bytes())?;
        writer.write_all(&(self.code.len() as u32).to_le_bytes())?;
        writer.write_all(&(self.graphics.len() as u32).to_le_bytes())?;
        writer.write_all(&self.code)?;
        writer.write_all(&self.graphics)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.code.len() + self.graphics.len());
        // Writing to a Vec can't fail
        let _ = self.write_to(&mut bytes);
        bytes
    }
}

/// Like `read_exact`, but reports how much was read instead of failing at EOF.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

fn u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn read_section<R: Read>(reader: &mut R, section: &'static str, len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() < len {
        return Err(Error::TruncatedCartridge {
            section,
            expected: len,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;

    fn image(code: &[u8], graphics: &[u8]) -> Vec<u8> {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&(code.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(graphics.len() as u32).to_le_bytes());
        bytes.extend_from_slice(code);
        bytes.extend_from_slice(graphics);
        bytes
    }

    #[test]
    fn parses_header_and_sections() {
        let cartridge = Cartridge::from_bytes(&image(&[0x01, 0x2A, 0xFF], &[8, 0, 8, 0])).unwrap();
        assert_eq!(cartridge.entry_point, 7);
        assert_eq!(cartridge.code, vec![0x01, 0x2A, 0xFF]);
        assert_eq!(cartridge.graphics, vec![8, 0, 8, 0]);
    }

    #[test]
    fn bad_magic_reports_tag() {
        let mut bytes = image(&[0xFF], &[]);
        bytes[..10].copy_from_slice(b"BIRTH_EXEX");
        match Cartridge::from_bytes(&bytes) {
            Err(Error::InvalidFormat { tag }) => assert_eq!(tag, "BIRTH_EXEX"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn short_magic_is_invalid_format() {
        assert!(matches!(Cartridge::from_bytes(b"BIRTH"), Err(Error::InvalidFormat { .. })));
    }

    #[test]
    fn truncated_header_is_reported() {
        let bytes = image(&[], &[]);
        assert!(matches!(
            Cartridge::from_bytes(&bytes[..16]),
            Err(Error::TruncatedCartridge { section: "header", .. })
        ));
    }

    #[test]
    fn truncated_code_is_reported() {
        let mut bytes = image(&[1, 2, 3, 4], &[]);
        bytes.truncate(HEADER_LEN + 2);
        match Cartridge::from_bytes(&bytes) {
            Err(Error::TruncatedCartridge { section, expected, actual }) => {
                assert_eq!((section, expected, actual), ("code", 4, 2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn written_image_matches_layout() {
        let cartridge = Cartridge {
            entry_point: 7,
            code: vec![0x00, 0xFF],
            graphics: vec![1, 2, 3],
        };
        assert_eq!(cartridge.to_bytes(), image(&[0x00, 0xFF], &[1, 2, 3]));
        assert_eq!(Cartridge::from_bytes(&cartridge.to_bytes()).unwrap(), cartridge);
    }
}
