pub const APP_NAME: &str = "glitchgrid";

pub const ERROR_LOG_FILE: &str = "glitchgrid-error.log";
pub const DEBUG_LOG_FILE: &str = "glitchgrid-debug.log";

pub const CONFIG_DIR_NAME: &str = "glitchgrid";
pub const CONFIG_FILE: &str = "config.json";
pub const LOCAL_CONFIG_FILE: &str = "glitchgrid.config.json";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Preference store keys. Kept identical to the web build so exported
/// preference files stay interchangeable.
pub const THEME_STORAGE_KEY: &str = "ui-theme";
pub const LANGUAGE_STORAGE_KEY: &str = "i18nextLng";

// Pixel footprint of one glyph; one terminal cell stands for one glyph.
pub const CHAR_WIDTH_PX: u32 = 10;
pub const CHAR_HEIGHT_PX: u32 = 20;

pub const DEFAULT_GLITCH_SPEED_MS: u64 = 50;
pub const DEFAULT_SMOOTH: bool = true;
pub const DEFAULT_CHARACTERS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$&*()-_+=/[]{};:<>.,0123456789";

/// One selection per twenty cells (5%), rounded up.
pub const MUTATION_DIVISOR: usize = 20;
/// Number of transition passes a color fade takes (a step of 0.05 each).
pub const TRANSITION_STEPS: u8 = 20;

pub const RESIZE_DEBOUNCE_MS: u64 = 100;
pub const TARGET_FPS: f64 = 60.0;

pub const DARK_PALETTE: [&str; 3] = ["#242424ff", "#555555ff", "#192d37ff"];
pub const LIGHT_PALETTE: [&str; 3] = ["#ecececff", "#c9c9c9ff", "#edededff"];
pub const DARK_BACKGROUND: &str = "#0a0a0a";
pub const LIGHT_BACKGROUND: &str = "#ffffff";

pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "de", "de-CH", "fr", "es", "it", "pt-BR", "ja"];
pub const FALLBACK_LANGUAGE: &str = "en";

pub const MENU_LOGO: &[&str] = &[
    "       _ _ _       _                   _     _ ",
    "  __ _| (_) |_ ___| |__   __ _ _ __ __| | __| |",
    " / _` | | | __/ __| '_ \\ / _` | '__/ _` |/ _` |",
    "| (_| | | | || (__| | | | (_| | | | (_| | (_| |",
    " \\__, |_|_|\\__\\___|_| |_|\\__, |_|  \\__,_|\\__,_|",
    " |___/                   |___/                 ",
];
