use crate::emulator::error::Result;
use crate::emulator::memory::Memory;
use crate::util::nibble_pair::split_le_u16;

pub const NOP: u8 = 0x00;
pub const SET_A: u8 = 0x01;
pub const SET_X: u8 = 0x02;
pub const JMP: u8 = 0x04;
pub const DRAW_BTP: u8 = 0x08;
pub const HALT: u8 = 0xFF;

/// A wrapper for code addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for 8-bit constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A wrapper for 16-bit constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wide(pub u16);

/// A signed screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

/// A single instruction. One opcode byte, followed by
/// little-endian operands:
/// - NN: 8-bit constant
/// - NNNN: 16-bit constant or address
/// - XXXX YYYY: signed 16-bit screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Nop, // 00
    SetA(Const), // 01 NN
    SetX(Wide), // 02 NNNN
    Jump(Addr), // 04 NNNN
    DrawBitmap(Point), // 08 XXXX YYYY
    Halt, // FF
    Undefined(u8), // anything else, no operands
}

impl Instruction {

    /// Decode the instruction whose opcode sits at `pc`.
    /// Operands are read from the bytes that follow, and may lie past the
    /// loaded code as long as they are inside `memory`.
    pub fn fetch(memory: &Memory, pc: usize) -> Result<Instruction> {
        let opcode = memory.read(pc)?;
        let operand = pc + 1;
        let instruction = match opcode {
            NOP => Instruction::Nop,
            SET_A => Instruction::SetA(Const(memory.read(operand)?)),
            SET_X => Instruction::SetX(Wide(memory.read_u16_le(operand)?)),
            JMP => Instruction::Jump(Addr(memory.read_u16_le(operand)?)),
            DRAW_BTP => Instruction::DrawBitmap(Point {
                x: memory.read_i16_le(operand)?,
                y: memory.read_i16_le(operand + 2)?,
            }),
            HALT => Instruction::Halt,
            other => Instruction::Undefined(other),
        };
        Ok(instruction)
    }

    pub fn opcode(&self) -> u8 {
        match self {
            Instruction::Nop => NOP,
            Instruction::SetA(_) => SET_A,
            Instruction::SetX(_) => SET_X,
            Instruction::Jump(_) => JMP,
            Instruction::DrawBitmap(_) => DRAW_BTP,
            Instruction::Halt => HALT,
            Instruction::Undefined(opcode) => *opcode,
        }
    }

    /// Encoded length in bytes, opcode included.
    pub fn len(&self) -> usize {
        match self {
            Instruction::SetA(_) => 2,
            Instruction::SetX(_) | Instruction::Jump(_) => 3,
            Instruction::DrawBitmap(_) => 5,
            _ => 1,
        }
    }

    /// Append the encoded instruction to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.opcode());
        match *self {
            Instruction::SetA(Const(n)) => out.push(n),
            Instruction::SetX(Wide(n)) | Instruction::Jump(Addr(n)) => {
                let (low, high) = split_le_u16(n);
                out.extend_from_slice(&[low, high]);
            }
            Instruction::DrawBitmap(Point { x, y }) => {
                out.extend_from_slice(&x.to_le_bytes());
                out.extend_from_slice(&y.to_le_bytes());
            }
            _ => {}
        }
    }
}
