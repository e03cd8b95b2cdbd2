use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use super::config::GlitchConfig;
use super::debounce::Debounce;
use super::grid::{self, GlyphSource, Grid};
use super::theme::ThemeStyle;
use crate::renderer::surface::Surface;
use crate::shared::constants;

/// Id of the active frame schedule. The schedule runs while the animator
/// holds a handle; `cancel_frame` clears it.
#[derive(Debug, PartialEq, Eq)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimatorStats {
    pub frames: u64,
    pub renders: u64,
    pub mutation_passes: u64,
    pub rebuilds: u64,
}

/// What a single frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub rebuilt: bool,
    pub mutated: bool,
    pub transitioned: bool,
    pub rendered: bool,
}

/// Owns the grid and drives mutation, transition, resize and rendering.
///
/// Everything is advanced from `tick`, which the frame loop calls once per
/// frame with the current time.
pub struct GlitchAnimator<R: Rng = StdRng> {
    config: GlitchConfig,
    style: ThemeStyle,
    source: GlyphSource,
    grid: Grid,
    rng: R,
    last_glitch: Instant,
    frame: Option<FrameHandle>,
    next_frame_id: u64,
    resize: Debounce<(u32, u32)>,
    stats: AnimatorStats,
}

impl GlitchAnimator<StdRng> {
    pub fn new(config: GlitchConfig, style: ThemeStyle) -> Self {
        Self::with_rng(config, style, StdRng::from_entropy())
    }
}

impl<R: Rng> GlitchAnimator<R> {
    pub fn with_rng(config: GlitchConfig, style: ThemeStyle, rng: R) -> Self {
        let source = GlyphSource::new(&config.characters, &style);
        Self {
            config,
            style,
            source,
            grid: Grid::default(),
            rng,
            last_glitch: Instant::now(),
            frame: None,
            next_frame_id: 0,
            resize: Debounce::new(Duration::from_millis(constants::RESIZE_DEBOUNCE_MS)),
            stats: AnimatorStats::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn style(&self) -> &ThemeStyle {
        &self.style
    }

    pub fn config(&self) -> &GlitchConfig {
        &self.config
    }

    pub fn stats(&self) -> AnimatorStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Size the grid to `surface`, draw it once and start the frame schedule.
    pub fn mount<S: Surface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> Result<()> {
        let (width, height) = surface.size_px().unwrap_or((0, 0));
        self.rebuild(surface, width, height, now)?;
        Ok(())
    }

    /// Stop the frame schedule and drop any pending resize.
    pub fn unmount(&mut self) {
        self.cancel_frame();
        if self.resize.cancel().is_some() {
            crate::utils::logger::debug("Dropped pending resize on unmount");
        }
    }

    /// Queue a container resize; it is applied once resizes stop for the debounce window.
    /// Ignored while unmounted.
    pub fn on_resize(&mut self, width_px: u32, height_px: u32, now: Instant) {
        if self.frame.is_none() {
            return;
        }
        self.resize.schedule(now, (width_px, height_px));
    }

    /// Swap the palette and vignettes. The grid is rebuilt so every cell picks
    /// up the new palette immediately.
    pub fn restyle<S: Surface + ?Sized>(
        &mut self,
        style: ThemeStyle,
        surface: &mut S,
        now: Instant,
    ) -> Result<()> {
        self.source = GlyphSource::new(&self.config.characters, &style);
        self.style = style;
        self.mount(surface, now)
    }

    /// One animation frame.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> Result<FrameOutcome> {
        let mut outcome = FrameOutcome::default();

        if self.frame.is_none() {
            return Ok(outcome);
        }

        if let Some((width, height)) = self.resize.poll(now) {
            outcome.rendered = self.rebuild(surface, width, height, now)?;
            outcome.rebuilt = true;
            return Ok(outcome);
        }
        self.stats.frames += 1;

        let due = now.saturating_duration_since(self.last_glitch) >= self.config.interval();
        if due && !self.grid.is_empty() {
            grid::mutation_pass(&mut self.grid, &self.source, self.config.smooth, &mut self.rng);
            self.last_glitch = now;
            self.stats.mutation_passes += 1;
            outcome.mutated = true;
        }

        if self.config.smooth && grid::transition_pass(&mut self.grid) {
            outcome.transitioned = true;
        }

        // Mutation and transition share one render per frame.
        if outcome.mutated || outcome.transitioned {
            outcome.rendered = self.draw(surface)?;
        }

        Ok(outcome)
    }

    fn rebuild<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        width_px: u32,
        height_px: u32,
        now: Instant,
    ) -> Result<bool> {
        self.cancel_frame();

        surface.set_size_px(width_px, height_px);
        let (columns, rows) = grid::compute_grid(width_px, height_px);
        self.grid = grid::initialize_grid(columns, rows, &self.source, &mut self.rng);
        self.stats.rebuilds += 1;

        crate::utils::logger::debug(&format!(
            "Grid rebuilt: {}x{} px -> {}x{} = {} cells",
            width_px,
            height_px,
            columns,
            rows,
            self.grid.len()
        ));

        let rendered = self.draw(surface)?;
        self.start_frame(now);
        Ok(rendered)
    }

    /// Render and present; false when there was nothing to draw on.
    fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<bool> {
        if surface.size_px().is_none() || self.grid.is_empty() {
            return Ok(false);
        }
        grid::render(&self.grid, &self.style, surface);
        surface.present()?;
        self.stats.renders += 1;
        Ok(true)
    }

    fn start_frame(&mut self, now: Instant) {
        self.next_frame_id += 1;
        let handle = FrameHandle(self.next_frame_id);
        crate::utils::logger::debug(&format!("Frame schedule {} started", handle.id()));
        self.frame = Some(handle);
        self.last_glitch = now;
    }

    fn cancel_frame(&mut self) {
        self.frame = None;
    }
}

impl<R: Rng> Drop for GlitchAnimator<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glitch::theme::Theme;
    use crate::renderer::surface::CellCanvas;

    fn animator(smooth: bool) -> GlitchAnimator<StdRng> {
        let config = GlitchConfig {
            smooth,
            ..GlitchConfig::default()
        };
        GlitchAnimator::with_rng(config, ThemeStyle::for_theme(Theme::Dark), StdRng::seed_from_u64(42))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_mount_sizes_grid_to_surface() {
        let mut canvas = CellCanvas::new(10, 5);
        let mut anim = animator(true);
        anim.mount(&mut canvas, Instant::now()).unwrap();

        assert!(anim.is_running());
        assert_eq!(anim.grid().len(), 50);
        assert_eq!(anim.stats().renders, 1);
        // The canvas shows exactly the grid's glyphs
        let expected: Vec<char> = anim.grid().cells().iter().map(|c| c.character).collect();
        let shown: Vec<char> = canvas.cells().iter().map(|c| c.char).collect();
        assert_eq!(shown, expected);
    }

    #[test]
    fn test_mutation_waits_for_interval() {
        let mut canvas = CellCanvas::new(10, 5);
        let mut anim = animator(false);
        let t0 = Instant::now();
        anim.mount(&mut canvas, t0).unwrap();

        let early = anim.tick(&mut canvas, t0 + ms(49)).unwrap();
        assert!(!early.mutated);
        assert!(!early.rendered);

        let due = anim.tick(&mut canvas, t0 + ms(50)).unwrap();
        assert!(due.mutated);
        assert!(due.rendered);
        assert!(!due.transitioned);

        // Timer was reset by the pass
        let after = anim.tick(&mut canvas, t0 + ms(60)).unwrap();
        assert!(!after.mutated);
        assert_eq!(anim.stats().mutation_passes, 1);
    }

    #[test]
    fn test_smooth_frames_fade_between_mutations() {
        let mut canvas = CellCanvas::new(10, 5);
        let mut anim = animator(true);
        let t0 = Instant::now();
        anim.mount(&mut canvas, t0).unwrap();

        let first = anim.tick(&mut canvas, t0 + ms(50)).unwrap();
        assert!(first.mutated);
        // Freshly reset cells advance in the same frame
        assert!(first.transitioned);

        let next = anim.tick(&mut canvas, t0 + ms(66)).unwrap();
        assert!(!next.mutated);
        assert!(next.transitioned);
        assert!(next.rendered);

        // Twenty frames later everything has settled
        for i in 0..20 {
            anim.tick(&mut canvas, t0 + ms(67 + i)).unwrap();
        }
        assert!(anim.grid().cells().iter().all(|c| c.is_settled()));
        let idle = anim.tick(&mut canvas, t0 + ms(90)).unwrap();
        assert_eq!(idle, FrameOutcome::default());
    }

    #[test]
    fn test_resize_is_debounced_and_rerandomizes() {
        let mut canvas = CellCanvas::new(10, 5);
        let mut anim = animator(true);
        let t0 = Instant::now();
        anim.mount(&mut canvas, t0).unwrap();
        let before = anim.grid().clone();

        anim.on_resize(300, 100, t0 + ms(10));
        anim.on_resize(200, 100, t0 + ms(50));
        assert!(anim.resize_pending());

        let waiting = anim.tick(&mut canvas, t0 + ms(140)).unwrap();
        assert!(!waiting.rebuilt);
        assert_eq!(anim.grid().len(), 50);

        let applied = anim.tick(&mut canvas, t0 + ms(150)).unwrap();
        assert!(applied.rebuilt);
        assert!(!anim.resize_pending());
        assert!(anim.is_running());
        assert_eq!((anim.grid().columns(), anim.grid().rows()), (20, 5));
        assert_eq!(canvas.columns(), 20);
        assert!(anim.grid().cells().iter().all(|c| c.is_settled()));

        // Same seed stream continues, so characters and colors are a fresh draw
        let snapshot = |cells: &[crate::glitch::grid::Cell]| -> Vec<_> {
            cells.iter().map(|c| (c.character, c.current_color, c.target_color)).collect()
        };
        let old = snapshot(before.cells());
        let new = snapshot(&anim.grid().cells()[..50]);
        assert_ne!(old, new);
        let old_colors: Vec<_> = old.iter().map(|c| (c.1, c.2)).collect();
        let new_colors: Vec<_> = new.iter().map(|c| (c.1, c.2)).collect();
        assert_ne!(old_colors, new_colors);
    }

    #[test]
    fn test_zero_sized_surface_is_a_no_op() {
        let mut canvas = CellCanvas::new(0, 0);
        let mut anim = animator(true);
        let t0 = Instant::now();
        anim.mount(&mut canvas, t0).unwrap();

        assert!(anim.grid().is_empty());
        assert_eq!(anim.stats().renders, 0);
        let outcome = anim.tick(&mut canvas, t0 + ms(100)).unwrap();
        assert!(!outcome.rendered);
    }

    #[test]
    fn test_unmount_stops_frames_and_pending_resize() {
        let mut canvas = CellCanvas::new(10, 5);
        let mut anim = animator(true);
        let t0 = Instant::now();
        anim.mount(&mut canvas, t0).unwrap();
        anim.on_resize(500, 500, t0);

        anim.unmount();
        assert!(!anim.is_running());
        assert!(!anim.resize_pending());
        let outcome = anim.tick(&mut canvas, t0 + ms(500)).unwrap();
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(anim.grid().len(), 50);
    }

    #[test]
    fn test_resize_after_unmount_is_ignored() {
        let mut canvas = CellCanvas::new(10, 5);
        let mut anim = animator(true);
        let t0 = Instant::now();
        anim.mount(&mut canvas, t0).unwrap();
        anim.unmount();

        anim.on_resize(300, 100, t0 + ms(10));
        assert!(!anim.resize_pending());
        let outcome = anim.tick(&mut canvas, t0 + ms(200)).unwrap();
        assert_eq!(outcome, FrameOutcome::default());
        assert!(!anim.is_running());
        assert_eq!(anim.grid().len(), 50);
        assert_eq!(anim.stats().rebuilds, 1);
    }

    #[test]
    fn test_restyle_switches_palette() {
        let mut canvas = CellCanvas::new(10, 5);
        let mut anim = animator(false);
        let t0 = Instant::now();
        anim.mount(&mut canvas, t0).unwrap();

        let light = ThemeStyle::for_theme(Theme::Light);
        anim.restyle(light.clone(), &mut canvas, t0).unwrap();
        assert!(anim
            .grid()
            .cells()
            .iter()
            .all(|c| light.palette.contains(&c.current_color)));
        assert!(anim.style().vignettes().is_empty());
    }
}
