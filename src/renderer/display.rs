use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{BufWriter, Stdout, Write};

use super::cell::{CellData, RgbColor};
use super::surface::{CellCanvas, Surface};
use crate::glitch::vignette::Vignette;
use crate::shared::constants;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum DisplayMode {
    /// Plain glyphs, no color escapes.
    Ascii,
    /// 24-bit foreground and background colors.
    #[default]
    Rgb,
}

/// Terminal-backed drawing surface.
///
/// Frames are drawn into an in-memory canvas and `present` writes only the
/// cells that changed since the previous frame.
pub struct DisplayManager {
    stdout: BufWriter<Stdout>,
    mode: DisplayMode,
    canvas: CellCanvas,
    last_cells: Option<Vec<CellData>>,
    render_buffer: Vec<u8>,
}

impl DisplayManager {
    pub fn new(mode: DisplayMode) -> Result<Self> {
        let stdout = BufWriter::with_capacity(1024 * 1024, std::io::stdout());
        let (columns, rows) = terminal::size().context("failed to query terminal size")?;
        let mut dm = Self {
            stdout,
            mode,
            canvas: CellCanvas::new(columns as usize, rows as usize),
            last_cells: None,
            render_buffer: Vec::with_capacity(1024 * 1024),
        };

        dm.initialize_terminal()?;

        Ok(dm)
    }

    fn initialize_terminal(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.stdout.execute(cursor::Hide)?;

        // Disable line wrapping (DECRAWM) so the last column never scrolls
        self.stdout.execute(Print("\x1b[?7l"))?;

        // Disable cursor blinking
        self.stdout.execute(Print("\x1b[?12l"))?;

        Ok(())
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Container size in glyph pixels for a terminal of `columns × rows` cells.
    pub fn terminal_size_px(columns: u16, rows: u16) -> (u32, u32) {
        (
            columns as u32 * constants::CHAR_WIDTH_PX,
            rows as u32 * constants::CHAR_HEIGHT_PX,
        )
    }

    fn render_diff(&mut self) -> Result<()> {
        let start_render = std::time::Instant::now();

        self.render_buffer.clear();
        let cells = self.canvas.cells();
        let width = self.canvas.columns();

        let force_redraw = self.last_cells.as_ref().map(|v| v.len()) != Some(cells.len());
        if force_redraw {
            self.last_cells = Some(vec![CellData::default(); cells.len()]);
        }
        let Some(last_cells) = self.last_cells.as_mut() else {
            return Ok(());
        };

        encode_diff(
            cells,
            last_cells,
            width,
            self.mode,
            force_redraw,
            &mut self.render_buffer,
        );

        let diff_time = start_render.elapsed();

        self.stdout.write_all(&self.render_buffer)?;
        self.stdout.flush()?;

        let total_time = start_render.elapsed();
        if total_time.as_millis() > 10 {
            crate::utils::logger::debug(&format!(
                "SLOW RENDER: Total={}us | Diff={}us | Bytes={} | Cells: {}",
                total_time.as_micros(),
                diff_time.as_micros(),
                self.render_buffer.len(),
                cells.len()
            ));
        }

        Ok(())
    }
}

impl Surface for DisplayManager {
    fn size_px(&self) -> Option<(u32, u32)> {
        self.canvas.size_px()
    }

    fn set_size_px(&mut self, width_px: u32, height_px: u32) {
        self.canvas.set_size_px(width_px, height_px);
        // Next present repaints the whole screen
        self.last_cells = None;
    }

    fn clear(&mut self, background: RgbColor) {
        self.canvas.clear(background);
    }

    fn draw_glyph(&mut self, x_px: u32, y_px: u32, glyph: char, color: RgbColor) {
        self.canvas.draw_glyph(x_px, y_px, glyph, color);
    }

    fn apply_vignettes(&mut self, layers: &[Vignette]) {
        self.canvas.apply_vignettes(layers);
    }

    fn present(&mut self) -> Result<()> {
        self.render_diff()
    }
}

impl Drop for DisplayManager {
    fn drop(&mut self) {
        let _ = self.stdout.execute(Print("\x1b[0m\x1b[?7h"));
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// Zero-allocation decimal writer
fn write_decimal(buffer: &mut Vec<u8>, n: u32) {
    if n >= 10 {
        write_decimal(buffer, n / 10);
    }
    buffer.push(b'0' + (n % 10) as u8);
}

fn write_color(buffer: &mut Vec<u8>, prefix: &[u8], color: RgbColor) {
    buffer.extend_from_slice(prefix);
    write_decimal(buffer, color.0 as u32);
    buffer.push(b';');
    write_decimal(buffer, color.1 as u32);
    buffer.push(b';');
    write_decimal(buffer, color.2 as u32);
    buffer.push(b'm');
}

/// Append escape sequences that turn `last_cells` into `cells`, updating
/// `last_cells` as it goes. Wrapped in a synchronized update.
pub fn encode_diff(
    cells: &[CellData],
    last_cells: &mut [CellData],
    width: usize,
    mode: DisplayMode,
    force_redraw: bool,
    buffer: &mut Vec<u8>,
) {
    if width == 0 || cells.len() != last_cells.len() {
        return;
    }

    buffer.extend_from_slice(b"\x1b[?2026h");
    if force_redraw {
        buffer.extend_from_slice(b"\x1b[2J");
    }

    let mut last_fg: Option<RgbColor> = None;
    let mut last_bg: Option<RgbColor> = None;
    let mut cursor: Option<usize> = None;

    for (i, cell) in cells.iter().enumerate() {
        if !force_redraw && *cell == last_cells[i] {
            cursor = None;
            continue;
        }

        if cursor != Some(i) {
            buffer.extend_from_slice(b"\x1b[");
            write_decimal(buffer, (i / width) as u32 + 1);
            buffer.push(b';');
            write_decimal(buffer, (i % width) as u32 + 1);
            buffer.push(b'H');
        }

        if mode == DisplayMode::Rgb {
            if last_fg != Some(cell.fg) {
                write_color(buffer, b"\x1b[38;2;", cell.fg);
                last_fg = Some(cell.fg);
            }
            if last_bg != Some(cell.bg) {
                write_color(buffer, b"\x1b[48;2;", cell.bg);
                last_bg = Some(cell.bg);
            }
        }

        let mut utf8 = [0u8; 4];
        buffer.extend_from_slice(cell.char.encode_utf8(&mut utf8).as_bytes());
        last_cells[i] = *cell;

        // Line wrap is off, so the cursor sticks at the last column
        cursor = if (i + 1) % width == 0 { None } else { Some(i + 1) };
    }

    buffer.extend_from_slice(b"\x1b[0m");
    buffer.extend_from_slice(b"\x1b[?2026l");
}
