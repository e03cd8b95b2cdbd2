mod core;
mod glitch;
mod renderer;
mod shared;
mod sync;
mod ui;
mod utils;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::{self as app_config, ConfigOverrides};
use crate::core::language;
use crate::core::player::{self, RunOptions};
use crate::core::preferences::Preferences;
use crate::glitch::grid::{compute_grid, mutation_count};
use crate::glitch::Theme;
use crate::renderer::DisplayMode;
use crate::shared::constants;

#[derive(Parser)]
#[command(author, version, about = "Animated glitching character grid for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the glitch animation (default)
    Run {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Show or change the stored theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Show or change the interface language
    Language {
        #[command(subcommand)]
        action: Option<LanguageAction>,
    },
    /// Print the grid dimensions for a pixel area
    Grid {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Interactive theme and language settings
    Settings,
}

#[derive(clap::Args, Default)]
struct RunArgs {
    /// Milliseconds between mutation passes
    #[arg(short, long)]
    speed: Option<u64>,
    /// Snap colors instead of fading
    #[arg(long, default_value_t = false)]
    no_smooth: bool,
    /// Alphabet to draw glyphs from
    #[arg(short, long)]
    characters: Option<String>,
    /// Theme for this run only (not saved)
    #[arg(short, long, value_enum)]
    theme: Option<Theme>,
    #[arg(short, long, value_enum, default_value_t = DisplayMode::Rgb)]
    mode: DisplayMode,
    /// Config file to use instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },
}

#[derive(Subcommand)]
enum LanguageAction {
    List,
    Show,
    Set { code: String },
}

fn main() -> Result<()> {
    let log_dir = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());
    crate::utils::logger::init(&log_dir);

    let cli = Cli::parse();
    let mut prefs = Preferences::load_default()?;

    let command = cli.command.unwrap_or(Commands::Run {
        args: RunArgs::default(),
    });
    if command.is_full_screen() {
        reset_terminal();
    }

    match command {
        Commands::Run { args } => run(args, &mut prefs)?,
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => {
                let theme = prefs.theme();
                if theme == Theme::System {
                    println!("{} ({})", theme.as_str(), theme.resolve().as_str());
                } else {
                    println!("{}", theme.as_str());
                }
            }
            ThemeAction::Toggle => {
                let theme = prefs.toggle_theme()?;
                println!("{}", theme.as_str());
            }
            ThemeAction::Set { theme } => {
                prefs.set_theme(theme)?;
                println!("{}", theme.as_str());
            }
        },
        Commands::Language { action } => {
            let current = language::current_language(prefs.language());
            match action.unwrap_or(LanguageAction::Show) {
                LanguageAction::List => {
                    for code in language::language_list(constants::SUPPORTED_LANGUAGES, &current) {
                        let marker = if code == current { "*" } else { " " };
                        println!("{} {:<6} {}", marker, code, language::label_for(&code));
                    }
                }
                LanguageAction::Show => {
                    println!("{} {}", current, language::label_for(&current));
                }
                LanguageAction::Set { code } => {
                    let Some(supported) = constants::SUPPORTED_LANGUAGES
                        .iter()
                        .find(|s| s.eq_ignore_ascii_case(&code))
                    else {
                        bail!(
                            "unsupported language '{}' (expected one of: {})",
                            code,
                            constants::SUPPORTED_LANGUAGES.join(", ")
                        );
                    };
                    prefs.set_language(supported)?;
                    println!("{} {}", supported, language::label_for(supported));
                }
            }
        }
        Commands::Grid { width, height } => {
            let (columns, rows) = compute_grid(width, height);
            let total = columns * rows;
            println!("{}x{} = {} cells", columns, rows, total);
            println!("{} mutations per pass", mutation_count(total));
        }
        Commands::Settings => {
            if crate::ui::menu::run_settings(&mut prefs)?.is_none() {
                println!("Settings unchanged");
            }
        }
    }

    Ok(())
}

impl Commands {
    /// Commands that take over the terminal. The rest print plain text.
    fn is_full_screen(&self) -> bool {
        matches!(self, Commands::Run { .. } | Commands::Settings)
    }
}

/// Undo raw mode and the alternate screen left behind by a crashed run.
fn reset_terminal() {
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
}

fn run(args: RunArgs, prefs: &mut Preferences) -> Result<()> {
    let overrides = ConfigOverrides {
        glitch_speed_ms: args.speed,
        smooth: args.no_smooth.then_some(false),
        characters: args.characters,
    };
    let config = app_config::load(args.config.as_deref(), &overrides)?;

    let result = player::run(
        RunOptions {
            config,
            theme_override: args.theme,
            mode: args.mode,
        },
        prefs,
    );

    if let Err(e) = &result {
        crate::utils::logger::error(&format!("Run failed: {:#}", e));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_runs() {
        let cli = Cli::try_parse_from(["glitchgrid"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_only_full_screen_commands_reset_terminal() {
        let command = |args: &[&str]| Cli::try_parse_from(args).unwrap().command;

        assert!(command(&["glitchgrid", "run"]).unwrap().is_full_screen());
        assert!(command(&["glitchgrid", "settings"]).unwrap().is_full_screen());
        assert!(!command(&["glitchgrid", "grid", "--width", "100", "--height", "100"])
            .unwrap()
            .is_full_screen());
        assert!(!command(&["glitchgrid", "theme", "show"]).unwrap().is_full_screen());
        assert!(!command(&["glitchgrid", "language", "list"]).unwrap().is_full_screen());
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "glitchgrid", "run", "--speed", "80", "--no-smooth", "--theme", "light", "--mode", "ascii",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run { args }) => {
                assert_eq!(args.speed, Some(80));
                assert!(args.no_smooth);
                assert_eq!(args.theme, Some(Theme::Light));
                assert_eq!(args.mode, DisplayMode::Ascii);
            }
            _ => panic!("expected run"),
        }
    }
}
