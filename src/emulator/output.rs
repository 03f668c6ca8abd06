/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const GREEN: Color = Color { r: 0, g: 228, b: 48 };
}

/// The colours the render pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub lit: Color,
    pub unlit: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Color::BLACK,
            lit: Color::WHITE,
            unlit: Color::BLACK,
            text: Color::GREEN,
        }
    }
}

/// Represents a window that can be drawn to, one frame at a time.
pub trait EmulatorOutput {
    fn open_window(&mut self, width: u32, height: u32, title: &str);
    fn set_target_frame_rate(&mut self, fps: u32);
    /// Whether the user asked to close the window.
    fn should_close(&mut self) -> bool;
    fn begin_frame(&mut self);
    fn clear(&mut self, color: Color);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color);
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);
    /// Present the frame and wait for the next tick.
    fn end_frame(&mut self);
    fn close_window(&mut self);
}

/// A draw call recorded by `DummyOutput`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    Text { text: String, x: i32, y: i32, size: i32, color: Color },
    Rect { x: i32, y: i32, width: i32, height: i32, color: Color },
}

/// An output device that keeps the draw calls of the latest frame in memory.
/// It asks to be closed once `frame_limit` frames have been presented.
#[derive(Debug, Default)]
pub struct DummyOutput {
    frame_limit: Option<usize>,
    frames: usize,
    open: bool,
    frame: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput::default()
    }

    /// Request close after `frames` frames.
    pub fn with_frame_limit(frames: usize) -> DummyOutput {
        DummyOutput {
            frame_limit: Some(frames),
            ..DummyOutput::default()
        }
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Draw calls of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.presented
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCommand> {
        self.presented.iter().filter(|command| matches!(command, DrawCommand::Rect { .. }))
    }
}

impl EmulatorOutput for DummyOutput {
    fn open_window(&mut self, _: u32, _: u32, _: &str) {
        self.open = true;
    }
    fn set_target_frame_rate(&mut self, _: u32) {}
    fn should_close(&mut self) -> bool {
        match self.frame_limit {
            Some(limit) => self.frames >= limit,
            None => false,
        }
    }
    fn begin_frame(&mut self) {
        self.frame.clear();
    }
    fn clear(&mut self, color: Color) {
        self.frame.push(DrawCommand::Clear(color));
    }
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color) {
        self.frame.push(DrawCommand::Text { text: text.to_string(), x, y, size, color });
    }
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.frame.push(DrawCommand::Rect { x, y, width, height, color });
    }
    fn end_frame(&mut self) {
        self.presented = std::mem::take(&mut self.frame);
        self.frames += 1;
    }
    fn close_window(&mut self) {
        self.open = false;
    }
}
