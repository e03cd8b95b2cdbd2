/// Represents a 24-bit RGB color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor(255, 255, 255);

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    /// Alpha is accepted and discarded.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits[..6].to_string(),
            _ => return None,
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Per-channel linear interpolation, rounded to the nearest integer.
    pub fn lerp(start: RgbColor, end: RgbColor, factor: f32) -> RgbColor {
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f32 + (b as f32 - a as f32) * factor;
            v.round().clamp(0.0, 255.0) as u8
        };
        RgbColor(mix(start.0, end.0), mix(start.1, end.1), mix(start.2, end.2))
    }

    /// Interpolate at `step / steps` in exact integer arithmetic, rounding
    /// halves up. `step` past `steps` yields `end`.
    pub fn lerp_steps(start: RgbColor, end: RgbColor, step: u32, steps: u32) -> RgbColor {
        if steps == 0 || step >= steps {
            return end;
        }
        let mix = |a: u8, b: u8| -> u8 {
            let (a, b) = (a as i64, b as i64);
            let (step, steps) = (step as i64, steps as i64);
            // Numerator of a + (b - a) * step / steps over `steps`; never negative
            let num = a * steps + (b - a) * step;
            ((2 * num + steps) / (2 * steps)).clamp(0, 255) as u8
        };
        RgbColor(mix(start.0, end.0), mix(start.1, end.1), mix(start.2, end.2))
    }

    /// Composite `over` on top of `self` with the given opacity.
    pub fn blend(self, over: RgbColor, alpha: f32) -> RgbColor {
        RgbColor::lerp(self, over, alpha.clamp(0.0, 1.0))
    }
}

/// Represents a single character cell on the terminal
///
/// Uses TrueColor (RGB) for maximum quality
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CellData {
    pub char: char,
    pub fg: RgbColor,
    pub bg: RgbColor,
}

impl Default for CellData {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: RgbColor::BLACK,
            bg: RgbColor::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_forms() {
        assert_eq!(RgbColor::from_hex("#61dca3"), Some(RgbColor(0x61, 0xdc, 0xa3)));
        assert_eq!(RgbColor::from_hex("61DCA3"), Some(RgbColor(0x61, 0xdc, 0xa3)));
        assert_eq!(RgbColor::from_hex("#fa0"), Some(RgbColor(0xff, 0xaa, 0x00)));
        // Alpha is ignored
        assert_eq!(RgbColor::from_hex("#192d37ff"), Some(RgbColor(0x19, 0x2d, 0x37)));
        assert_eq!(RgbColor::from_hex("#12345"), None);
        assert_eq!(RgbColor::from_hex("#zzzzzz"), None);
        assert_eq!(RgbColor::from_hex(""), None);
    }

    #[test]
    fn test_lerp_rounds_each_channel() {
        let start = RgbColor(0, 100, 255);
        let end = RgbColor(10, 0, 0);

        assert_eq!(RgbColor::lerp(start, end, 0.0), start);
        assert_eq!(RgbColor::lerp(start, end, 1.0), end);
        // 0 + 10*0.25 = 2.5 -> 3, 100 - 25 = 75, 255 - 63.75 = 191.25 -> 191
        assert_eq!(RgbColor::lerp(start, end, 0.25), RgbColor(3, 75, 191));
    }

    #[test]
    fn test_lerp_steps_ties_round_up() {
        // 0 + 90 * 13/20 = 58.5
        assert_eq!(RgbColor::lerp_steps(RgbColor::BLACK, RgbColor(90, 0, 0), 13, 20), RgbColor(59, 0, 0));
        // 90 - 90 * 7/20 = 58.5
        assert_eq!(RgbColor::lerp_steps(RgbColor(90, 0, 0), RgbColor::BLACK, 7, 20), RgbColor(59, 0, 0));
        assert_eq!(RgbColor::lerp_steps(RgbColor::BLACK, RgbColor(170, 0, 0), 13, 20).0, 111);
        assert_eq!(RgbColor::lerp_steps(RgbColor(1, 2, 3), RgbColor(4, 5, 6), 25, 20), RgbColor(4, 5, 6));
    }

    #[test]
    fn test_lerp_steps_matches_exact_rounding_everywhere() {
        for a in 0..=255u32 {
            for b in 0..=255u32 {
                for step in 0..=20u32 {
                    // round(a + (b - a) * step / 20) with halves rounded up, in twentieths
                    let twentieths = 20 * a as i64 + (b as i64 - a as i64) * step as i64;
                    let expected = (twentieths + 10).div_euclid(20) as u8;
                    let got = RgbColor::lerp_steps(RgbColor(a as u8, 0, 0), RgbColor(b as u8, 0, 0), step, 20);
                    assert_eq!(got.0, expected, "{} -> {} at step {}", a, b, step);
                }
            }
        }
    }

    #[test]
    fn test_blend_clamps_alpha() {
        let base = RgbColor(200, 200, 200);
        assert_eq!(base.blend(RgbColor::BLACK, 0.0), base);
        assert_eq!(base.blend(RgbColor::BLACK, 1.0), RgbColor::BLACK);
        assert_eq!(base.blend(RgbColor::BLACK, 2.0), RgbColor::BLACK);
        assert_eq!(base.blend(RgbColor::BLACK, 0.5), RgbColor(100, 100, 100));
    }
}
