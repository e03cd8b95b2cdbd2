use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::preferences::Preferences;
use crate::glitch::{GlitchAnimator, GlitchConfig, Theme, ThemeStyle};
use crate::renderer::{DisplayManager, DisplayMode};
use crate::shared::constants;
use crate::sync::FramePacer;

pub struct RunOptions {
    pub config: GlitchConfig,
    /// One-off theme for this run; not written to the preference store.
    pub theme_override: Option<Theme>,
    pub mode: DisplayMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopAction {
    Continue,
    Quit,
    ToggleTheme,
    Resize(u16, u16),
}

fn classify_event(event: &Event) -> LoopAction {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Esc => LoopAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => LoopAction::Quit,
            KeyCode::Char('t') => LoopAction::ToggleTheme,
            _ => LoopAction::Continue,
        },
        Event::Resize(columns, rows) => LoopAction::Resize(*columns, *rows),
        _ => LoopAction::Continue,
    }
}

/// Forward terminal events to the frame loop until `running` clears or the
/// receiver goes away.
fn spawn_input_reader(sender: Sender<Event>, running: Arc<AtomicBool>) -> JoinHandle<Result<()>> {
    thread::spawn(move || {
        while running.load(Ordering::SeqCst) {
            if event::poll(Duration::from_millis(50))? {
                let ev = event::read()?;
                if sender.send(ev).is_err() {
                    break;
                }
            }
        }
        Ok(())
    })
}

/// Run the animation on the alternate screen until the user quits.
pub fn run(options: RunOptions, prefs: &mut Preferences) -> Result<()> {
    let mut theme = options.theme_override.unwrap_or_else(|| prefs.theme());
    let style = ThemeStyle::for_theme(theme.resolve());

    crate::utils::logger::info(&format!(
        "run: theme={} speed={}ms smooth={} alphabet={} chars",
        theme.as_str(),
        options.config.glitch_speed_ms,
        options.config.smooth,
        options.config.characters.chars().count()
    ));

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut display = DisplayManager::new(options.mode)?;
    crate::utils::logger::debug(&format!("Display mode: {:?}", display.mode()));
    let mut animator = GlitchAnimator::new(options.config, style);

    let (event_sender, event_receiver) = crossbeam_channel::bounded(64);
    let input_handle = spawn_input_reader(event_sender, running.clone());

    let start_time = Instant::now();
    let mut pacer = FramePacer::new(constants::TARGET_FPS);
    animator.mount(&mut display, start_time)?;

    let loop_result = frame_loop(
        &mut animator,
        &mut display,
        &mut pacer,
        &event_receiver,
        &running,
        prefs,
        &mut theme,
    );

    // Teardown: stop the schedule before the surface goes away
    animator.unmount();
    running.store(false, Ordering::SeqCst);
    drop(event_receiver);
    let input_result = input_handle
        .join()
        .map_err(|_| anyhow!("input thread panicked"))?;
    drop(display);

    let elapsed = start_time.elapsed();
    let stats = animator.stats();
    crate::utils::logger::info(&format!(
        "run finished: frames={} renders={} mutation_passes={} rebuilds={} fps={:.1} resyncs={}",
        stats.frames,
        stats.renders,
        stats.mutation_passes,
        stats.rebuilds,
        pacer.stats().effective_fps(elapsed),
        pacer.stats().resyncs
    ));

    loop_result?;
    if let Err(e) = input_result {
        crate::utils::logger::error(&format!("Input reader failed: {:#}", e));
        return Err(e);
    }
    Ok(())
}

fn frame_loop(
    animator: &mut GlitchAnimator,
    display: &mut DisplayManager,
    pacer: &mut FramePacer,
    events: &Receiver<Event>,
    running: &AtomicBool,
    prefs: &mut Preferences,
    theme: &mut Theme,
) -> Result<()> {
    while running.load(Ordering::SeqCst) {
        let now = pacer.wait_for_next_frame();

        loop {
            let ev = match events.try_recv() {
                Ok(ev) => ev,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Reader thread died; its error surfaces after teardown
                    running.store(false, Ordering::SeqCst);
                    break;
                }
            };

            match classify_event(&ev) {
                LoopAction::Continue => {}
                LoopAction::Quit => running.store(false, Ordering::SeqCst),
                LoopAction::ToggleTheme => {
                    *theme = theme.toggled();
                    if let Err(e) = prefs.set_theme(*theme) {
                        crate::utils::logger::error(&format!("Failed to save theme: {:#}", e));
                    }
                    crate::utils::logger::info(&format!("Theme toggled to {}", theme.as_str()));
                    animator.restyle(ThemeStyle::for_theme(theme.resolve()), display, now)?;
                }
                LoopAction::Resize(columns, rows) => {
                    let (width, height) = DisplayManager::terminal_size_px(columns, rows);
                    animator.on_resize(width, height, now);
                }
            }
        }

        if !running.load(Ordering::SeqCst) {
            break;
        }

        if let Err(e) = animator.tick(display, now) {
            crate::utils::logger::error(&format!("Render error: {:#}", e));
            return Err(e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(classify_event(&key(KeyCode::Char('q'), KeyModifiers::NONE)), LoopAction::Quit);
        assert_eq!(classify_event(&key(KeyCode::Esc, KeyModifiers::NONE)), LoopAction::Quit);
        assert_eq!(
            classify_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            LoopAction::Quit
        );
        assert_eq!(
            classify_event(&key(KeyCode::Char('c'), KeyModifiers::NONE)),
            LoopAction::Continue
        );
    }

    #[test]
    fn test_theme_and_resize_events() {
        assert_eq!(
            classify_event(&key(KeyCode::Char('t'), KeyModifiers::NONE)),
            LoopAction::ToggleTheme
        );
        assert_eq!(classify_event(&Event::Resize(120, 40)), LoopAction::Resize(120, 40));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(classify_event(&release), LoopAction::Continue);
    }
}
