//! The frame loop: run a quota of instructions, then render one frame.

use std::convert::TryFrom;

use crate::emulator::cartridge::Cartridge;
use crate::emulator::config::Config;
use crate::emulator::console::Console;
use crate::emulator::error::{Error, Result};
use crate::emulator::filesystem::Filesystem;
use crate::emulator::output::{DummyOutput, EmulatorOutput, Palette};
use crate::emulator::tile;

/// Logical screen size, before scaling.
pub const SCREEN_WIDTH: u32 = 380;
pub const SCREEN_HEIGHT: u32 = 240;
pub const WINDOW_TITLE: &str = "(not)SEGA BIRTH - DevKit v1.0";

const TEXT_SIZE: i32 = 20;

pub struct Emulator<O: EmulatorOutput> {
    console: Console,
    output: O,
    config: Config,
    palette: Palette,
}

impl<O: EmulatorOutput> Emulator<O> {

    /// Create a new emulator drawing to `output`
    pub fn with_output(output: O, config: Config) -> Emulator<O> {
        let mut console = Console::new();
        console.set_strict_opcodes(config.strict_opcodes);
        Emulator {
            console,
            output,
            config,
            palette: Palette::default(),
        }
    }

    /// Create a new emulator with a dummy output
    pub fn new(config: Config) -> Emulator<DummyOutput> {
        Emulator::with_output(DummyOutput::new(), config)
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and load the configured cartridge.
    /// Nothing is written to memory unless the whole image is valid.
    pub fn boot<F: Filesystem>(&mut self, filesystem: &F) -> Result<()> {
        let path = self.config.cartridge_path.clone();
        if !filesystem.exists(&path) {
            return Err(Error::FileNotFound(path));
        }

        log::info!("Booting {:?}", path);
        let mut reader = filesystem.open_for_read(&path)?;
        let cartridge = Cartridge::read_from(&mut reader)?;
        self.load(&cartridge)
    }

    pub fn load(&mut self, cartridge: &Cartridge) -> Result<()> {
        self.console.load(cartridge)
    }

    /// Open the window and run frames until it is closed.
    pub fn run(&mut self) {
        let scale = self.config.scale;
        self.output.open_window(
            SCREEN_WIDTH.saturating_mul(scale),
            SCREEN_HEIGHT.saturating_mul(scale),
            WINDOW_TITLE,
        );
        self.output.set_target_frame_rate(self.config.frame_rate);

        while !self.output.should_close() {
            self.frame();
        }

        self.output.close_window();
    }

    /// Run up to one quota of instructions, then render once.
    /// Returns the number of instructions executed.
    pub fn frame(&mut self) -> usize {
        let executed = self.console.run_quota(self.config.opcodes_per_frame);
        self.render();
        executed
    }

    /// Draw everything queued since the last frame, then the register overlay.
    pub fn render(&mut self) {
        let palette = self.palette;
        // Configs built in code skip the command line range check
        let scale = i32::try_from(self.config.scale).unwrap_or(i32::MAX);

        self.output.begin_frame();
        self.output.clear(palette.background);

        for intent in self.console.drain_draw_intents() {
            let graphics = self.console.graphics_memory().as_slice().get(intent.source..).unwrap_or(&[]);
            let output = &mut self.output;
            tile::decode(graphics, intent.origin.x, intent.origin.y, |pixel| {
                let color = if pixel.is_lit() { palette.lit } else { palette.unlit };
                output.fill_rect(pixel.x.saturating_mul(scale), pixel.y.saturating_mul(scale), scale, scale, color);
            });
        }

        let registers = self.console.registers();
        self.output.draw_text(&format!("PC: {}", registers.pc), 10, 10, TEXT_SIZE, palette.text);
        self.output.draw_text(&format!("RegA: {}", registers.a), 10, 30, TEXT_SIZE, palette.text);
        self.output.draw_text(&format!("RegX: {}", registers.x), 10, 50, TEXT_SIZE, palette.text);

        self.output.end_frame();
    }
}
