use crate::renderer::cell::RgbColor;

/// Where the gradient ramp sits, as a fraction of the farthest-corner radius.
const RAMP_EDGE: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VignetteKind {
    /// Darkens the edges: clear up to the ramp edge, full strength at the corners.
    Outer,
    /// Tints the middle: full strength at the center, clear from the ramp edge out.
    Center,
}

/// A static circular gradient overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vignette {
    pub kind: VignetteKind,
    pub color: RgbColor,
    pub opacity: f32,
}

impl Vignette {
    pub fn for_theme(kind: VignetteKind, is_dark: bool) -> Self {
        let (color, opacity) = match (kind, is_dark) {
            (VignetteKind::Outer, true) => (RgbColor::BLACK, 1.0),
            (VignetteKind::Outer, false) => (RgbColor::BLACK, 0.45),
            (VignetteKind::Center, true) => (RgbColor::BLACK, 0.8),
            (VignetteKind::Center, false) => (RgbColor::WHITE, 0.85),
        };
        Self { kind, color, opacity }
    }

    /// Overlay opacity at normalized distance `t` (0 = center, 1 = corner).
    pub fn alpha_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let ramp = match self.kind {
            VignetteKind::Outer if t <= RAMP_EDGE => 0.0,
            VignetteKind::Outer => (t - RAMP_EDGE) / (1.0 - RAMP_EDGE),
            VignetteKind::Center if t >= RAMP_EDGE => 0.0,
            VignetteKind::Center => 1.0 - t / RAMP_EDGE,
        };
        ramp * self.opacity
    }

    /// Composite this overlay onto `base` at pixel `(x, y)` of a `width × height` area.
    pub fn shade(&self, base: RgbColor, x: f32, y: f32, width: f32, height: f32) -> RgbColor {
        base.blend(self.color, self.alpha_at(normalized_distance(x, y, width, height)))
    }
}

/// Distance from the area's center, divided by the distance to its farthest corner.
pub fn normalized_distance(x: f32, y: f32, width: f32, height: f32) -> f32 {
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = (cx * cx + cy * cy).sqrt();
    if radius <= f32::EPSILON {
        return 0.0;
    }
    ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_ramp() {
        let v = Vignette::for_theme(VignetteKind::Outer, true);
        assert_eq!(v.alpha_at(0.0), 0.0);
        assert_eq!(v.alpha_at(0.6), 0.0);
        assert!((v.alpha_at(0.8) - 0.5).abs() < 1e-5);
        assert!((v.alpha_at(1.0) - 1.0).abs() < 1e-5);

        let light = Vignette::for_theme(VignetteKind::Outer, false);
        assert!((light.alpha_at(1.0) - 0.45).abs() < 1e-5);
    }

    #[test]
    fn test_center_ramp() {
        let v = Vignette::for_theme(VignetteKind::Center, true);
        assert!((v.alpha_at(0.0) - 0.8).abs() < 1e-5);
        assert!((v.alpha_at(0.3) - 0.4).abs() < 1e-5);
        assert_eq!(v.alpha_at(0.6), 0.0);
        assert_eq!(v.alpha_at(0.9), 0.0);
    }

    #[test]
    fn test_normalized_distance() {
        assert_eq!(normalized_distance(50.0, 50.0, 100.0, 100.0), 0.0);
        assert!((normalized_distance(0.0, 0.0, 100.0, 100.0) - 1.0).abs() < 1e-5);
        assert_eq!(normalized_distance(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_shade_corner_goes_black() {
        let v = Vignette::for_theme(VignetteKind::Outer, true);
        let shaded = v.shade(RgbColor(200, 100, 50), 100.0, 100.0, 100.0, 100.0);
        assert_eq!(shaded, RgbColor::BLACK);
    }
}
