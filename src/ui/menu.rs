use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{io, time::Duration};

use crate::core::language;
use crate::core::preferences::Preferences;
use crate::glitch::Theme;
use crate::shared::constants;

type UiTerminal = Terminal<CrosstermBackend<io::Stderr>>;

const THEME_CHOICES: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::System];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Theme,
    Language,
    Confirm,
}

impl Step {
    fn title(self) -> &'static str {
        match self {
            Step::Theme => "Theme",
            Step::Language => "Language",
            Step::Confirm => "Confirm",
        }
    }

    fn progress(self) -> &'static str {
        match self {
            Step::Theme => "1/3",
            Step::Language => "2/3",
            Step::Confirm => "3/3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSelection {
    pub theme: Theme,
    pub language: String,
}

struct SettingsApp {
    step: Step,
    status: String,
    should_quit: bool,
    languages: Vec<String>,
    theme_index: usize,
    language_index: usize,
    selection: Option<SettingsSelection>,
}

impl SettingsApp {
    fn new(current_theme: Theme, current_language: &str) -> Self {
        let languages = language::language_list(constants::SUPPORTED_LANGUAGES, current_language);
        let theme_index = THEME_CHOICES
            .iter()
            .position(|t| *t == current_theme)
            .unwrap_or(0);

        Self {
            step: Step::Theme,
            status: "Pick a theme".to_string(),
            should_quit: false,
            languages,
            theme_index,
            // Current language is always listed first
            language_index: 0,
            selection: None,
        }
    }

    fn on_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        match self.step {
            Step::Theme => {
                if let Some(next) = move_selection(key, self.theme_index, THEME_CHOICES.len()) {
                    self.theme_index = next;
                } else if key == KeyCode::Char('t') {
                    let toggled = THEME_CHOICES[self.theme_index].toggled();
                    self.theme_index = THEME_CHOICES.iter().position(|t| *t == toggled).unwrap_or(0);
                } else if key == KeyCode::Enter {
                    self.step = Step::Language;
                    self.status = "Pick a language".to_string();
                }
            }
            Step::Language => {
                if let Some(next) = move_selection(key, self.language_index, self.languages.len()) {
                    self.language_index = next;
                } else if key == KeyCode::Backspace {
                    self.step = Step::Theme;
                    self.status = "Pick a theme".to_string();
                } else if key == KeyCode::Enter {
                    self.step = Step::Confirm;
                    self.status = "Enter to save, Backspace to go back".to_string();
                }
            }
            Step::Confirm => match key {
                KeyCode::Backspace => {
                    self.step = Step::Language;
                    self.status = "Pick a language".to_string();
                }
                KeyCode::Enter => {
                    self.selection = Some(SettingsSelection {
                        theme: THEME_CHOICES[self.theme_index],
                        language: self.languages[self.language_index].clone(),
                    });
                    self.should_quit = true;
                }
                _ => {}
            },
        }
    }
}

fn move_selection(key: KeyCode, index: usize, len: usize) -> Option<usize> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => Some(index.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(if index + 1 < len { index + 1 } else { index }),
        _ => None,
    }
}

/// Interactive theme / language picker. Saves the choice to `prefs`.
pub fn run_settings(prefs: &mut Preferences) -> Result<Option<SettingsSelection>> {
    let current_language = language::current_language(prefs.language());
    let mut app = SettingsApp::new(prefs.theme(), &current_language);

    let mut terminal = setup_terminal()?;
    let run_result = run_app(&mut terminal, &mut app);
    let restore_result = restore_terminal(&mut terminal);

    if let Err(err) = restore_result {
        crate::utils::logger::error(&format!("Failed to restore terminal from settings: {}", err));
    }

    run_result?;

    if let Some(selection) = &app.selection {
        prefs.set_theme(selection.theme)?;
        prefs.set_language(&selection.language)?;
        crate::utils::logger::info(&format!(
            "settings saved: theme={} language={}",
            selection.theme.as_str(),
            selection.language
        ));
    }

    Ok(app.selection)
}

fn setup_terminal() -> Result<UiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;

    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, Hide).context("failed to switch to alternate screen")?;

    let backend = CrosstermBackend::new(stderr);
    let terminal = Terminal::new(backend).context("failed to initialize terminal backend")?;

    Ok(terminal)
}

fn restore_terminal(terminal: &mut UiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

fn run_app(terminal: &mut UiTerminal, app: &mut SettingsApp) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_menu(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }
    }

    Ok(())
}

fn draw_menu(frame: &mut Frame<'_>, app: &SettingsApp) {
    let area = frame.size();

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        format!(
            " {} | {} ({}) ",
            constants::APP_NAME,
            app.step.title(),
            app.step.progress()
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(inner);

    draw_logo(frame, layout[0]);

    match app.step {
        Step::Theme => draw_theme_list(frame, layout[1], app),
        Step::Language => draw_language_list(frame, layout[1], app),
        Step::Confirm => draw_confirm(frame, layout[1], app),
    }

    draw_footer(frame, layout[2], &app.status);
}

fn draw_logo(frame: &mut Frame<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = constants::MENU_LOGO
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                *line,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_theme_list(frame: &mut Frame<'_>, area: Rect, app: &SettingsApp) {
    let items = THEME_CHOICES
        .iter()
        .map(|theme| ListItem::new(theme.as_str()))
        .collect::<Vec<_>>();

    draw_select_list(frame, area, "Theme  [t] toggle", items, app.theme_index);
}

fn draw_language_list(frame: &mut Frame<'_>, area: Rect, app: &SettingsApp) {
    let items = app
        .languages
        .iter()
        .map(|code| ListItem::new(format!("{}  ({})", language::label_for(code), code)))
        .collect::<Vec<_>>();

    draw_select_list(frame, area, "Language", items, app.language_index);
}

fn draw_confirm(frame: &mut Frame<'_>, area: Rect, app: &SettingsApp) {
    let code = &app.languages[app.language_index];
    let confirm = Paragraph::new(vec![
        Line::from(Span::styled(
            "Save settings",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Theme: {}", THEME_CHOICES[app.theme_index].as_str())),
        Line::from(format!("Language: {} ({})", language::label_for(code), code)),
        Line::from(""),
        Line::from("Enter: save   Backspace: back   Esc: cancel"),
    ])
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(confirm, area);
}

fn draw_select_list(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    items: Vec<ListItem<'_>>,
    selected: usize,
) {
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, status: &str) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "[↑↓/j,k] move  [Enter] select  [Esc/q] cancel  ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(status, Style::default().fg(Color::White)),
    ]))
    .alignment(Alignment::Left)
    .wrap(Wrap { trim: true });

    frame.render_widget(footer, area);
}
