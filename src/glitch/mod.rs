pub mod animator;
pub mod config;
pub mod debounce;
pub mod grid;
pub mod theme;
pub mod vignette;

pub use animator::{FrameOutcome, GlitchAnimator};
pub use config::GlitchConfig;
pub use theme::{Theme, ThemeStyle};
