use serde::{Deserialize, Serialize};

use super::vignette::{Vignette, VignetteKind};
use crate::renderer::cell::RgbColor;
use crate::shared::constants;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }

    /// `System` falls through to dark; everything else flips light/dark.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::System => Theme::Dark,
        }
    }

    /// Resolve `System` against the terminal's advertised background.
    pub fn resolve(self) -> Theme {
        self.resolve_with(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// `COLORFGBG` looks like `"15;0"` or `"0;default;15"`; the last field is
    /// the background palette index. 7 and 15 are the light greys/white.
    pub fn resolve_with(self, colorfgbg: Option<&str>) -> Theme {
        match self {
            Theme::System => {
                let background = colorfgbg
                    .and_then(|v| v.rsplit(';').next())
                    .and_then(|idx| idx.trim().parse::<u8>().ok());
                match background {
                    Some(7) | Some(15) => Theme::Light,
                    _ => Theme::Dark,
                }
            }
            other => other,
        }
    }
}

/// Everything the grid needs to know about the active theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeStyle {
    pub theme: Theme,
    pub palette: [RgbColor; 3],
    pub background: RgbColor,
    pub outer_vignette: bool,
    pub center_vignette: bool,
}

impl ThemeStyle {
    /// Pure mapping from a theme to its style record. `System` is resolved
    /// as dark here; callers resolve it first when they care.
    pub fn for_theme(theme: Theme) -> Self {
        let is_dark = theme != Theme::Light;
        let (hexes, background) = if is_dark {
            (constants::DARK_PALETTE, constants::DARK_BACKGROUND)
        } else {
            (constants::LIGHT_PALETTE, constants::LIGHT_BACKGROUND)
        };

        Self {
            theme: if is_dark { Theme::Dark } else { Theme::Light },
            palette: hexes.map(|hex| RgbColor::from_hex(hex).unwrap_or_default()),
            background: RgbColor::from_hex(background).unwrap_or_default(),
            outer_vignette: is_dark,
            center_vignette: is_dark,
        }
    }

    /// Visible overlays in paint order (outer first, center on top).
    pub fn vignettes(&self) -> Vec<Vignette> {
        let is_dark = self.theme == Theme::Dark;
        let mut layers = Vec::with_capacity(2);
        if self.outer_vignette {
            layers.push(Vignette::for_theme(VignetteKind::Outer, is_dark));
        }
        if self.center_vignette {
            layers.push(Vignette::for_theme(VignetteKind::Center, is_dark));
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_style_shows_both_vignettes() {
        let style = ThemeStyle::for_theme(Theme::Dark);
        assert_eq!(style.palette[0], RgbColor(0x24, 0x24, 0x24));
        assert_eq!(style.palette[1], RgbColor(0x55, 0x55, 0x55));
        assert_eq!(style.palette[2], RgbColor(0x19, 0x2d, 0x37));
        assert!(style.outer_vignette && style.center_vignette);
        assert_eq!(style.vignettes().len(), 2);
        assert_eq!(style.vignettes()[0].kind, VignetteKind::Outer);
    }

    #[test]
    fn test_light_style_hides_vignettes() {
        let style = ThemeStyle::for_theme(Theme::Light);
        assert_eq!(style.palette[0], RgbColor(0xec, 0xec, 0xec));
        assert!(!style.outer_vignette && !style.center_vignette);
        assert!(style.vignettes().is_empty());
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::System.toggled(), Theme::Dark);
    }

    #[test]
    fn test_system_resolution() {
        assert_eq!(Theme::System.resolve_with(Some("0;15")), Theme::Light);
        assert_eq!(Theme::System.resolve_with(Some("0;default;7")), Theme::Light);
        assert_eq!(Theme::System.resolve_with(Some("15;0")), Theme::Dark);
        assert_eq!(Theme::System.resolve_with(None), Theme::Dark);
        assert_eq!(Theme::Light.resolve_with(Some("15;0")), Theme::Light);
    }

    #[test]
    fn test_parse_and_serde_names() {
        assert_eq!(Theme::parse(" Light "), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), "\"system\"");
    }
}
