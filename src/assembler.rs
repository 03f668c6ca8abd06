//! A small two-pass assembler for cartridge code.
//!
//! ```text
//! ; comments run to the end of the line
//! @Start:             ; a label, usable as a jump target
//!     SET_A 42
//!     SET_X 0xFFFF
//!     DRAW_BTP 10, 20
//!     JMP @Start
//!     HALT
//! ```

use std::collections::HashMap;
use thiserror::Error;

use crate::emulator::cartridge::Cartridge;
use crate::emulator::instruction::{Addr, Const, Instruction, Point, Wide};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: unknown mnemonic {mnemonic:?}")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: {mnemonic} expects {expected} operand(s), got {got}")]
    OperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: {value} does not fit in 16 bits")]
    OutOfRange { line: usize, value: i64 },

    #[error("line {line}: unknown label {label:?}")]
    UnknownLabel { line: usize, label: String },

    #[error("line {line}: label {label:?} defined twice")]
    DuplicateLabel { line: usize, label: String },
}

pub type Result<T> = std::result::Result<T, AsmError>;

struct Statement<'a> {
    line: usize,
    mnemonic: String,
    operands: Vec<&'a str>,
}

/// Operand count and encoded size of a mnemonic.
fn shape(mnemonic: &str) -> Option<(usize, usize)> {
    match mnemonic {
        "NOP" | "HALT" => Some((0, 1)),
        "SET_A" => Some((1, 2)),
        "SET_X" | "JMP" => Some((1, 3)),
        "DRAW_BTP" => Some((2, 5)),
        _ => None,
    }
}

fn parse_number(line: usize, token: &str) -> Result<i64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    };
    match parsed {
        Ok(value) if negative => Ok(-value),
        Ok(value) => Ok(value),
        Err(_) => Err(AsmError::InvalidNumber { line, token: token.to_string() }),
    }
}

fn parse_u16(line: usize, token: &str) -> Result<u16> {
    let value = parse_number(line, token)?;
    if value < 0 || value > u16::MAX as i64 {
        return Err(AsmError::OutOfRange { line, value });
    }
    Ok(value as u16)
}

/// Coordinates may be written signed or as their unsigned 16-bit pattern.
fn parse_coordinate(line: usize, token: &str) -> Result<i16> {
    let value = parse_number(line, token)?;
    if value < i16::MIN as i64 || value > u16::MAX as i64 {
        return Err(AsmError::OutOfRange { line, value });
    }
    Ok(value as u16 as i16)
}

/// Assemble `source` into code bytes.
pub fn assemble(source: &str) -> Result<Vec<u8>> {
    let mut labels: HashMap<&str, u16> = HashMap::new();
    let mut statements = Vec::new();
    let mut offset = 0usize;

    // First pass: record labels and statement sizes
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split(';').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        if text.starts_with('@') {
            let label = text.trim_end_matches(':').trim();
            if labels.insert(label, offset as u16).is_some() {
                return Err(AsmError::DuplicateLabel { line, label: label.to_string() });
            }
            continue;
        }

        let mut parts = text.split(|c: char| c == ',' || c.is_whitespace()).filter(|part| !part.is_empty());
        let mnemonic = parts.next().unwrap_or("").to_uppercase();
        let operands: Vec<&str> = parts.collect();

        let (expected, size) = match shape(&mnemonic) {
            Some(shape) => shape,
            None => return Err(AsmError::UnknownMnemonic { line, mnemonic }),
        };
        if operands.len() != expected {
            return Err(AsmError::OperandCount { line, mnemonic, expected, got: operands.len() });
        }

        offset += size;
        statements.push(Statement { line, mnemonic, operands });
    }

    // Second pass: encode
    let mut code = Vec::with_capacity(offset);
    for Statement { line, mnemonic, operands } in statements {
        let instruction = match mnemonic.as_str() {
            "NOP" => Instruction::Nop,
            "HALT" => Instruction::Halt,
            // Values are forced into 8 bits
            "SET_A" => Instruction::SetA(Const(parse_number(line, operands[0])? as u8)),
            "SET_X" => Instruction::SetX(Wide(parse_u16(line, operands[0])?)),
            "JMP" => {
                let target = operands[0];
                let addr = if target.starts_with('@') {
                    match labels.get(target) {
                        Some(addr) => *addr,
                        None => return Err(AsmError::UnknownLabel { line, label: target.to_string() }),
                    }
                } else {
                    parse_u16(line, target)?
                };
                Instruction::Jump(Addr(addr))
            }
            "DRAW_BTP" => Instruction::DrawBitmap(Point {
                x: parse_coordinate(line, operands[0])?,
                y: parse_coordinate(line, operands[1])?,
            }),
            _ => unreachable!("mnemonics are checked in the first pass"),
        };
        instruction.encode_into(&mut code);
    }

    log::info!("Assembled {} bytes, {} label(s)", code.len(), labels.len());
    Ok(code)
}

/// Assemble `source` and package it with `graphics` into a cartridge.
pub fn assemble_cartridge(source: &str, graphics: Vec<u8>) -> Result<Cartridge> {
    Ok(Cartridge::new(assemble(source)?, graphics))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::emulator::console::Console;
    use test_case::test_case;

    #[test]
    fn assembles_every_mnemonic() {
        let source = "
            NOP
            set_a 42        ; lower case works too
            SET_X 0xFFFF
            DRAW_BTP 10, -2
            JMP 0
            HALT
        ";
        assert_eq!(
            assemble(source).unwrap(),
            vec![0x00, 0x01, 42, 0x02, 0xFF, 0xFF, 0x08, 10, 0, 0xFE, 0xFF, 0x04, 0, 0, 0xFF]
        );
    }

    #[test]
    fn labels_resolve_forward_and_backward() {
        let source = "
            JMP @End
            @Loop:
            NOP
            JMP @Loop
            @End:
            HALT
        ";
        assert_eq!(assemble(source).unwrap(), vec![0x04, 7, 0, 0x00, 0x04, 3, 0, 0xFF]);
    }

    #[test]
    fn set_a_is_masked_to_8_bits() {
        assert_eq!(assemble("SET_A 300").unwrap(), vec![0x01, 44]);
    }

    #[test_case("PLOT" => AsmError::UnknownMnemonic { line: 1, mnemonic: "PLOT".to_string() } ; "unsupported mnemonic")]
    #[test_case("SET_X" => AsmError::OperandCount { line: 1, mnemonic: "SET_X".to_string(), expected: 1, got: 0 } ; "missing operand")]
    #[test_case("SET_X 70000" => AsmError::OutOfRange { line: 1, value: 70000 } ; "too wide")]
    #[test_case("JMP @Nowhere" => AsmError::UnknownLabel { line: 1, label: "@Nowhere".to_string() } ; "unknown label")]
    #[test_case("SET_A ten" => AsmError::InvalidNumber { line: 1, token: "ten".to_string() } ; "bad number")]
    #[test_case("@A:\n@A:" => AsmError::DuplicateLabel { line: 2, label: "@A".to_string() } ; "duplicate label")]
    fn rejects_bad_source(source: &str) -> AsmError {
        assemble(source).unwrap_err()
    }

    #[test]
    fn assembled_cartridge_runs() {
        let cartridge = assemble_cartridge("SET_A 42\nHALT", Vec::new()).unwrap();
        let mut console = Console::new();
        console.load(&cartridge).unwrap();
        while console.step().unwrap() {}
        assert_eq!(console.registers().a, 42);
        assert_eq!(console.registers().pc, 3);
    }
}
