//! Processor state, memory and the fetch-decode-execute step.

use std::collections::VecDeque;

use crate::emulator::cartridge::Cartridge;
use crate::emulator::error::{Error, Result};
use crate::emulator::instruction::*;
use crate::emulator::memory::{Memory, CODE_MEMORY_SIZE, GRAPHICS_MEMORY_SIZE};

/// A request to draw the bitmap at `source` in graphics memory with its top
/// left corner at `origin`. Queued by `DRAW_BTP`, consumed by the render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawIntent {
    pub origin: Point,
    pub source: usize,
}

/// The register file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    /// 8-bit accumulator
    pub a: u8,
    /// 16-bit index register
    pub x: u16,
    pub pc: usize,
}

/// The whole machine: both memories, the registers and the loaded code size.
/// Execution is halted whenever `pc >= code_size`.
#[derive(Debug)]
pub struct Console {
    code: Memory,
    graphics: Memory,
    registers: Registers,
    code_size: usize,
    entry_point: u32,
    draw_queue: VecDeque<DrawIntent>,
    strict_opcodes: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {

    /// Create a console with zeroed memory and nothing loaded.
    pub fn new() -> Console {
        Console {
            code: Memory::new(CODE_MEMORY_SIZE),
            graphics: Memory::new(GRAPHICS_MEMORY_SIZE),
            registers: Registers::default(),
            code_size: 0,
            entry_point: 0,
            draw_queue: VecDeque::new(),
            strict_opcodes: false,
        }
    }

    /// Make undefined opcodes fail instead of being skipped.
    pub fn set_strict_opcodes(&mut self, strict: bool) {
        self.strict_opcodes = strict;
    }

    /// Copy a cartridge into memory, rewind the program counter and drop
    /// draw intents queued by the previous cartridge.
    /// Payloads larger than a memory region are truncated to fit.
    pub fn load(&mut self, cartridge: &Cartridge) -> Result<()> {
        let code = self.code.write_range(0, &cartridge.code)?;
        if code < cartridge.code.len() {
            log::warn!("Code truncated from {} to {} bytes", cartridge.code.len(), code);
        }

        let graphics = self.graphics.write_range(0, &cartridge.graphics)?;
        if graphics < cartridge.graphics.len() {
            log::warn!("Graphics truncated from {} to {} bytes", cartridge.graphics.len(), graphics);
        }

        self.code_size = code;
        self.entry_point = cartridge.entry_point;
        self.registers.pc = 0;
        self.draw_queue.clear();

        log::info!("Cartridge loaded");
        log::info!("   Code: {} bytes", code);
        log::info!("   GFX:  {} bytes", graphics);
        Ok(())
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn code_size(&self) -> usize {
        self.code_size
    }

    pub fn entry_point(&self) -> u32 {
        self.entry_point
    }

    pub fn code_memory(&self) -> &Memory {
        &self.code
    }

    pub fn graphics_memory(&self) -> &Memory {
        &self.graphics
    }

    pub fn is_halted(&self) -> bool {
        self.registers.pc >= self.code_size
    }

    /// Move to the halt boundary.
    pub fn halt(&mut self) {
        self.registers.pc = self.code_size;
    }

    /// Take every draw intent queued since the last call.
    pub fn drain_draw_intents(&mut self) -> Vec<DrawIntent> {
        self.draw_queue.drain(..).collect()
    }

    /// Fetch, decode and execute one instruction.
    /// Returns `false` without doing anything if the console is halted.
    pub fn step(&mut self) -> Result<bool> {
        if self.is_halted() {
            return Ok(false);
        }

        let pc = self.registers.pc;
        let instruction = Instruction::fetch(&self.code, pc)?;
        log::trace!("{:#06x}: {:?}", pc, instruction);

        self.registers.pc += instruction.len();
        self.execute_single(instruction, pc)?;
        Ok(true)
    }

    /// Run up to `quota` instructions, stopping early on halt.
    /// Faults are logged and halt the console. Returns how many
    /// instructions ran.
    pub fn run_quota(&mut self, quota: usize) -> usize {
        let mut executed = 0;
        while executed < quota && !self.is_halted() {
            match self.step() {
                Ok(_) => executed += 1,
                Err(e) => {
                    log::error!("{}", e);
                    self.halt();
                }
            }
        }
        executed
    }

    /// Execute a single instruction fetched from `pc`.
    fn execute_single(&mut self, instruction: Instruction, pc: usize) -> Result<()> {
        match instruction {

            Instruction::Nop => {}

            Instruction::SetA(Const(n)) => {
                self.registers.a = n;
            }

            Instruction::SetX(Wide(n)) => {
                self.registers.x = n;
            }

            // Only jump inside the loaded code, anything else halts
            Instruction::Jump(Addr(target)) => {
                if (target as usize) < self.code_size {
                    self.registers.pc = target as usize;
                } else {
                    log::error!("{}", Error::OutOfBoundsJump { target, code_size: self.code_size });
                    self.halt();
                }
            }

            // The bitmap always lives at the start of graphics memory
            Instruction::DrawBitmap(origin) => {
                self.draw_queue.push_back(DrawIntent { origin, source: 0 });
            }

            Instruction::Halt => self.halt(),

            Instruction::Undefined(opcode) => {
                if self.strict_opcodes {
                    return Err(Error::UndefinedOpcode { opcode, pc });
                }
                log::warn!("Skipping undefined opcode {:#04x} at {:#06x}", opcode, pc);
            }
        }

        Ok(())
    }
}
