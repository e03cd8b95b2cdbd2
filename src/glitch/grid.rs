use rand::Rng;

use super::theme::ThemeStyle;
use crate::renderer::cell::RgbColor;
use crate::renderer::surface::Surface;
use crate::shared::constants;

/// One glyph slot with its own character and color state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub character: char,
    pub current_color: RgbColor,
    pub target_color: RgbColor,
    // Color the running fade started from.
    start_color: RgbColor,
    // Progress in 1/TRANSITION_STEPS units; TRANSITION_STEPS means settled.
    progress_steps: u8,
}

impl Cell {
    fn settled(character: char, current: RgbColor, target: RgbColor) -> Self {
        Self {
            character,
            current_color: current,
            target_color: target,
            start_color: current,
            progress_steps: constants::TRANSITION_STEPS,
        }
    }

    pub fn transition_progress(&self) -> f32 {
        self.progress_steps as f32 / constants::TRANSITION_STEPS as f32
    }

    pub fn is_settled(&self) -> bool {
        self.progress_steps >= constants::TRANSITION_STEPS
    }

    pub fn start_color(&self) -> RgbColor {
        self.start_color
    }
}

/// Alphabet and palette random draws come from.
#[derive(Debug, Clone)]
pub struct GlyphSource {
    alphabet: Vec<char>,
    palette: [RgbColor; 3],
}

impl GlyphSource {
    pub fn new(characters: &str, style: &ThemeStyle) -> Self {
        Self {
            alphabet: characters.chars().collect(),
            palette: style.palette,
        }
    }

    pub fn random_char<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        if self.alphabet.is_empty() {
            return ' ';
        }
        self.alphabet[rng.gen_range(0..self.alphabet.len())]
    }

    pub fn random_color<R: Rng + ?Sized>(&self, rng: &mut R) -> RgbColor {
        self.palette[rng.gen_range(0..self.palette.len())]
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn palette(&self) -> &[RgbColor; 3] {
        &self.palette
    }
}

/// Row-major `columns × rows` arrangement of cells.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&Cell> {
        if column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }
}

/// Grid dimensions for a container, rounding partial cells up.
pub fn compute_grid(width_px: u32, height_px: u32) -> (usize, usize) {
    (
        width_px.div_ceil(constants::CHAR_WIDTH_PX) as usize,
        height_px.div_ceil(constants::CHAR_HEIGHT_PX) as usize,
    )
}

/// Fresh grid with every cell independently randomized and settled.
pub fn initialize_grid<R: Rng + ?Sized>(
    columns: usize,
    rows: usize,
    source: &GlyphSource,
    rng: &mut R,
) -> Grid {
    let cells = (0..columns * rows)
        .map(|_| {
            let character = source.random_char(rng);
            let current = source.random_color(rng);
            let target = source.random_color(rng);
            Cell::settled(character, current, target)
        })
        .collect();

    Grid { columns, rows, cells }
}

/// How many selections a mutation pass makes for `total` cells.
pub fn mutation_count(total: usize) -> usize {
    total.div_ceil(constants::MUTATION_DIVISOR)
}

/// Re-randomize a 5% sample of cells, drawn with replacement.
///
/// In smooth mode the selected cells start fading from their current color;
/// otherwise they jump straight to the new target. Returns the number of
/// selections made (repeats included).
pub fn mutation_pass<R: Rng + ?Sized>(
    grid: &mut Grid,
    source: &GlyphSource,
    smooth: bool,
    rng: &mut R,
) -> usize {
    if grid.cells.is_empty() {
        return 0;
    }

    let count = mutation_count(grid.cells.len());
    for _ in 0..count {
        let index = rng.gen_range(0..grid.cells.len());
        let character = source.random_char(rng);
        let target = source.random_color(rng);

        let cell = &mut grid.cells[index];
        cell.character = character;
        cell.target_color = target;

        if smooth {
            cell.start_color = cell.current_color;
            cell.progress_steps = 0;
        } else {
            cell.current_color = target;
            cell.start_color = target;
            cell.progress_steps = constants::TRANSITION_STEPS;
        }
    }

    count
}

/// Advance every pending fade by one step. Returns true if any cell changed.
pub fn transition_pass(grid: &mut Grid) -> bool {
    let mut changed = false;

    for cell in grid.cells.iter_mut().filter(|c| !c.is_settled()) {
        cell.progress_steps = (cell.progress_steps + 1).min(constants::TRANSITION_STEPS);
        cell.current_color = RgbColor::lerp_steps(
            cell.start_color,
            cell.target_color,
            cell.progress_steps as u32,
            constants::TRANSITION_STEPS as u32,
        );
        changed = true;
    }

    changed
}

/// Paint the grid onto `surface`, then the theme's overlays.
///
/// Does nothing when the surface has no drawable area.
pub fn render<S: Surface + ?Sized>(grid: &Grid, style: &ThemeStyle, surface: &mut S) {
    match surface.size_px() {
        Some((w, h)) if w > 0 && h > 0 => {}
        _ => return,
    }
    if grid.columns == 0 {
        return;
    }

    surface.clear(style.background);

    for (index, cell) in grid.cells.iter().enumerate() {
        let x = (index % grid.columns) as u32 * constants::CHAR_WIDTH_PX;
        let y = (index / grid.columns) as u32 * constants::CHAR_HEIGHT_PX;
        surface.draw_glyph(x, y, cell.character, cell.current_color);
    }

    surface.apply_vignettes(&style.vignettes());
}
