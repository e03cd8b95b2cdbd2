use anyhow::Result;

use super::cell::{CellData, RgbColor};
use crate::glitch::vignette::Vignette;
use crate::shared::constants;

/// A 2D drawing target addressed in glyph pixels.
pub trait Surface {
    /// Pixel size of the drawable area, or `None` when there is nothing to draw on yet.
    fn size_px(&self) -> Option<(u32, u32)>;

    /// Reallocate for a new container size. Partial glyph slots are kept.
    fn set_size_px(&mut self, width_px: u32, height_px: u32);

    fn clear(&mut self, background: RgbColor);

    fn draw_glyph(&mut self, x_px: u32, y_px: u32, glyph: char, color: RgbColor);

    /// Composite static overlays in paint order.
    fn apply_vignettes(&mut self, layers: &[Vignette]);

    /// Push the finished frame to wherever it is displayed.
    fn present(&mut self) -> Result<()>;
}

/// In-memory character canvas: one `CellData` per glyph slot.
pub struct CellCanvas {
    columns: usize,
    rows: usize,
    cells: Vec<CellData>,
}

impl CellCanvas {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![CellData::default(); columns * rows],
        }
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
        self.cells = vec![CellData::default(); columns * rows];
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cells(&self) -> &[CellData] {
        &self.cells
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&CellData> {
        if column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }
}

impl Surface for CellCanvas {
    fn size_px(&self) -> Option<(u32, u32)> {
        if self.columns == 0 || self.rows == 0 {
            return None;
        }
        Some((
            self.columns as u32 * constants::CHAR_WIDTH_PX,
            self.rows as u32 * constants::CHAR_HEIGHT_PX,
        ))
    }

    fn set_size_px(&mut self, width_px: u32, height_px: u32) {
        self.resize(
            width_px.div_ceil(constants::CHAR_WIDTH_PX) as usize,
            height_px.div_ceil(constants::CHAR_HEIGHT_PX) as usize,
        );
    }

    fn clear(&mut self, background: RgbColor) {
        for cell in &mut self.cells {
            *cell = CellData {
                char: ' ',
                fg: background,
                bg: background,
            };
        }
    }

    fn draw_glyph(&mut self, x_px: u32, y_px: u32, glyph: char, color: RgbColor) {
        let column = (x_px / constants::CHAR_WIDTH_PX) as usize;
        let row = (y_px / constants::CHAR_HEIGHT_PX) as usize;
        if column >= self.columns || row >= self.rows {
            return;
        }
        let cell = &mut self.cells[row * self.columns + column];
        cell.char = glyph;
        cell.fg = color;
    }

    fn apply_vignettes(&mut self, layers: &[Vignette]) {
        let Some((width, height)) = self.size_px() else {
            return;
        };
        if layers.is_empty() {
            return;
        }

        let (width, height) = (width as f32, height as f32);
        let half_w = constants::CHAR_WIDTH_PX as f32 / 2.0;
        let half_h = constants::CHAR_HEIGHT_PX as f32 / 2.0;

        for (i, cell) in self.cells.iter_mut().enumerate() {
            let x = (i % self.columns) as f32 * constants::CHAR_WIDTH_PX as f32 + half_w;
            let y = (i / self.columns) as f32 * constants::CHAR_HEIGHT_PX as f32 + half_h;
            for layer in layers {
                cell.fg = layer.shade(cell.fg, x, y, width, height);
                cell.bg = layer.shade(cell.bg, x, y, width, height);
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}
