use birth_console::emulator::output::{Color, EmulatorOutput};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{self, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

/// Pixels covered by one terminal cell.
const CELL_WIDTH: i32 = 4;
const CELL_HEIGHT: i32 = 8;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    symbol: char,
    foreground: Color,
    background: Color,
    painted: bool,
}

impl Cell {
    fn blank(background: Color) -> Cell {
        Cell {
            symbol: ' ',
            foreground: background,
            background,
            painted: false,
        }
    }
}

/// A "window" drawn on the terminal, one cell per 4x8 pixels.
pub struct CrosstermOutput {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
    clear_color: Color,
    frame_time: Option<Duration>,
    frame_start: Instant,
    close_requested: bool,
    open: bool,
}

impl CrosstermOutput {
    pub fn new() -> CrosstermOutput {
        CrosstermOutput {
            columns: 0,
            rows: 0,
            cells: Vec::new(),
            clear_color: Color::BLACK,
            frame_time: None,
            frame_start: Instant::now(),
            close_requested: false,
            open: false,
        }
    }

    fn cell_mut(&mut self, column: i32, row: i32) -> Option<&mut Cell> {
        if column < 0 || row < 0 || column as usize >= self.columns || row as usize >= self.rows {
            return None;
        }
        let index = row as usize * self.columns + column as usize;
        self.cells.get_mut(index)
    }

    fn enter(&mut self) -> crossterm::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(())
    }

    fn leave(&mut self) -> crossterm::Result<()> {
        execute!(stdout(), style::ResetColor, cursor::Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn present(&mut self) -> crossterm::Result<()> {
        let mut out = stdout();
        for row in 0..self.rows {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for cell in &self.cells[row * self.columns..(row + 1) * self.columns] {
                queue!(
                    out,
                    SetBackgroundColor(to_crossterm(cell.background)),
                    SetForegroundColor(to_crossterm(cell.foreground)),
                    Print(cell.symbol)
                )?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn poll_close(&mut self) -> crossterm::Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(KeyEvent { code, modifiers }) = event::read()? {
                log::debug!("Got key {:?}", code);
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
                    _ => {}
                }
            }
        }
        Ok(false)
    }
}

impl Default for CrosstermOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        if self.open {
            report(self.leave());
        }
    }
}

impl EmulatorOutput for CrosstermOutput {
    fn open_window(&mut self, width: u32, height: u32, title: &str) {
        log::info!("Opening {}x{} window {:?}", width, height, title);
        let (term_columns, term_rows) = terminal::size().unwrap_or((80, 24));
        self.columns = std::cmp::min(width as usize / CELL_WIDTH as usize, term_columns as usize);
        self.rows = std::cmp::min(height as usize / CELL_HEIGHT as usize, term_rows as usize);
        self.cells = vec![Cell::blank(self.clear_color); self.columns * self.rows];
        report(self.enter());
        self.open = true;
    }

    fn set_target_frame_rate(&mut self, fps: u32) {
        self.frame_time = if fps == 0 {
            None
        } else {
            Some(Duration::from_secs(1) / fps)
        };
    }

    fn should_close(&mut self) -> bool {
        if !self.close_requested {
            match self.poll_close() {
                Ok(close) => self.close_requested = close,
                Err(e) => log::warn!("Could not read terminal events: {}", e),
            }
        }
        self.close_requested
    }

    fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        for cell in self.cells.iter_mut() {
            *cell = Cell::blank(color);
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _size: i32, color: Color) {
        let row = y.div_euclid(CELL_HEIGHT);
        for (i, symbol) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(x.div_euclid(CELL_WIDTH) + i as i32, row) {
                cell.symbol = symbol;
                cell.foreground = color;
                cell.painted = true;
            }
        }
    }

    // Several pixels share a cell; the clear colour never paints over another colour.
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let clear_color = self.clear_color;
        for row in y.div_euclid(CELL_HEIGHT)..=y.saturating_add(height - 1).div_euclid(CELL_HEIGHT) {
            for column in x.div_euclid(CELL_WIDTH)..=x.saturating_add(width - 1).div_euclid(CELL_WIDTH) {
                if let Some(cell) = self.cell_mut(column, row) {
                    if color == clear_color && cell.painted {
                        continue;
                    }
                    cell.background = color;
                    cell.painted = color != clear_color;
                }
            }
        }
    }

    fn end_frame(&mut self) {
        report(self.present());
        if let Some(frame_time) = self.frame_time {
            let elapsed = self.frame_start.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
    }

    fn close_window(&mut self) {
        if self.open {
            report(self.leave());
            self.open = false;
        }
    }
}

fn to_crossterm(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn report(result: crossterm::Result<()>) {
    if let Err(e) = result {
        log::warn!("Terminal error: {}", e);
    }
}
