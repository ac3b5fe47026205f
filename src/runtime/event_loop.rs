use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::audio::{AudioPlayer, Backend, PlayReporter, PlaybackEngine};
use crate::config;
use crate::error::Result;
use crate::runtime::shortcuts::Shortcut;
use crate::ui;

/// Longest the loop blocks on input, so session events are drained promptly
/// even when no sampler tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Main terminal event loop: drains session events, runs sampler ticks,
/// draws when something changed and dispatches keys. Returns `Ok(())` when
/// the user quits.
pub fn run<B: Backend, R: PlayReporter>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut AudioPlayer<B, R>,
) -> Result<()> {
    let redraw = app.redraw_handle();
    player.engine_mut().subscribe(move |_| redraw.set(true));

    loop {
        player.pump();

        let engine = player.engine();
        app.clamp_selection(engine.queue().len());
        app.follow(engine.queue().cursor());

        if app.take_dirty() {
            terminal.draw(|f| {
                ui::draw(
                    f,
                    app,
                    engine.state(),
                    engine.phase(),
                    engine.queue(),
                    settings,
                )
            })?;
        }

        let timeout = player.poll_timeout(Instant::now(), IDLE_POLL);
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, app, player.engine_mut()) {
                    break;
                }
            }
            Event::Resize(..) => app.mark_dirty(),
            _ => {}
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event<B: Backend, R: PlayReporter>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    engine: &mut PlaybackEngine<B, R>,
) -> bool {
    app.mark_dirty();

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Esc if app.metadata_window => app.toggle_metadata_window(),
        KeyCode::Char('j') => {
            app.follow_playback_off();
            app.next(engine.queue().len());
        }
        KeyCode::Char('k') => {
            app.follow_playback_off();
            app.prev(engine.queue().len());
        }
        KeyCode::Enter => {
            let tracks = engine.queue().tracks().to_vec();
            if let Some(track) = tracks.get(app.selected).cloned() {
                debug!(index = app.selected, track = %track.id, "playing selected entry");
                app.follow_playback_on();
                engine.play_track_with_queue(track, tracks, app.selected);
            }
        }
        KeyCode::Char('x') => engine.stop(),
        KeyCode::Char('C') => engine.clear_queue(),
        _ => {
            if let Some(shortcut) = Shortcut::from_key(&key) {
                if matches!(shortcut, Shortcut::Next | Shortcut::Previous) {
                    app.follow_playback_on();
                }
                shortcut.apply(engine, &settings.controls);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::audio::testing::{FakeBackend, RecordingReporter, track};
    use crate::audio::{EngineOptions, PlaybackPhase, SessionId};

    type Engine = PlaybackEngine<FakeBackend, RecordingReporter>;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (Engine, App, config::Settings) {
        let mut engine = PlaybackEngine::new(
            FakeBackend::default(),
            RecordingReporter::default(),
            EngineOptions::default(),
        );
        engine.play_album(vec![track("a", 60.0), track("b", 60.0), track("c", 60.0)], 0);
        (engine, App::new(true), config::Settings::default())
    }

    #[test]
    fn quit_key_ends_loop() {
        let (mut engine, mut app, settings) = setup();
        assert!(handle_key_event(press(KeyCode::Char('q')), &settings, &mut app, &mut engine));
        assert!(!handle_key_event(press(KeyCode::Char('j')), &settings, &mut app, &mut engine));
    }

    #[test]
    fn enter_plays_selected_queue_entry() {
        let (mut engine, mut app, settings) = setup();

        handle_key_event(press(KeyCode::Char('j')), &settings, &mut app, &mut engine);
        handle_key_event(press(KeyCode::Char('j')), &settings, &mut app, &mut engine);
        assert!(!app.follow_playback);
        handle_key_event(press(KeyCode::Enter), &settings, &mut app, &mut engine);

        assert!(app.follow_playback);
        assert_eq!(engine.queue().cursor(), Some(2));
        assert_eq!(engine.queue().len(), 3);
        assert_eq!(engine.active_session(), Some(SessionId(2)));
        assert_eq!(
            engine.state().current_track.as_ref().map(|t| t.id.as_str()),
            Some("c")
        );
    }

    #[test]
    fn stop_and_clear_keys() {
        let (mut engine, mut app, settings) = setup();

        handle_key_event(press(KeyCode::Char('C')), &settings, &mut app, &mut engine);
        assert!(engine.queue().is_empty());
        assert!(engine.has_session());

        handle_key_event(press(KeyCode::Char('x')), &settings, &mut app, &mut engine);
        assert_eq!(engine.phase(), PlaybackPhase::Idle);
        assert!(engine.state().current_track.is_none());
    }

    #[test]
    fn metadata_popup_toggles_and_escape_closes() {
        let (mut engine, mut app, settings) = setup();

        handle_key_event(press(KeyCode::Char('K')), &settings, &mut app, &mut engine);
        assert!(app.metadata_window);
        handle_key_event(press(KeyCode::Esc), &settings, &mut app, &mut engine);
        assert!(!app.metadata_window);
    }

    #[test]
    fn transport_keys_fall_through_to_shortcuts() {
        let (mut engine, mut app, settings) = setup();
        app.follow_playback_off();

        handle_key_event(press(KeyCode::Char('n')), &settings, &mut app, &mut engine);

        assert!(app.follow_playback);
        assert_eq!(engine.queue().cursor(), Some(1));
    }
}
