//! Transport shortcuts: key events mapped onto engine commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::audio::{Backend, PlayReporter, PlaybackEngine};
use crate::config::ControlsSettings;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlay,
    SeekForward,
    SeekBackward,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    ToggleMute,
}

impl Shortcut {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let shortcut = match key.code {
            KeyCode::Char(' ') => Self::TogglePlay,
            KeyCode::Right if shift => Self::Next,
            KeyCode::Right => Self::SeekForward,
            KeyCode::Left if shift => Self::Previous,
            KeyCode::Left => Self::SeekBackward,
            KeyCode::Up => Self::VolumeUp,
            KeyCode::Down => Self::VolumeDown,
            KeyCode::Char('m') => Self::ToggleMute,
            KeyCode::Char('n') => Self::Next,
            KeyCode::Char('p') => Self::Previous,
            _ => return None,
        };
        Some(shortcut)
    }

    /// Run the command this shortcut is bound to.
    pub fn apply<B: Backend, R: PlayReporter>(
        self,
        engine: &mut PlaybackEngine<B, R>,
        controls: &ControlsSettings,
    ) {
        let state = engine.state();
        let (time, duration, volume) = (state.current_time, state.duration, state.volume);

        match self {
            Self::TogglePlay => engine.toggle_play(),
            Self::SeekForward => engine.seek((time + controls.seek_seconds).min(duration)),
            Self::SeekBackward => engine.seek((time - controls.seek_seconds).max(0.0)),
            Self::Next => engine.next(),
            Self::Previous => engine.previous(),
            Self::VolumeUp => engine.set_volume((volume + controls.volume_step).min(1.0)),
            Self::VolumeDown => engine.set_volume((volume - controls.volume_step).max(0.0)),
            Self::ToggleMute => engine.toggle_mute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{Call, FakeBackend, RecordingReporter, track};
    use crate::audio::{EngineOptions, SessionEvent, SessionEventKind, SessionId};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn playing(duration: f64) -> (PlaybackEngine<FakeBackend, RecordingReporter>, FakeBackend) {
        let backend = FakeBackend::default();
        let handle = FakeBackend {
            ledger: backend.ledger.clone(),
        };
        let mut engine =
            PlaybackEngine::new(backend, RecordingReporter::default(), EngineOptions::default());
        let tracks = vec![track("a", duration), track("b", duration)];
        engine.play_album(tracks, 0);
        engine.handle_event(SessionEvent::new(
            SessionId(1),
            SessionEventKind::Loaded {
                duration_seconds: duration,
            },
        ));
        engine.handle_event(SessionEvent::new(SessionId(1), SessionEventKind::Playing));
        (engine, handle)
    }

    #[test]
    fn maps_transport_keys() {
        let none = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let cases = [
            (key(KeyCode::Char(' '), none), Some(Shortcut::TogglePlay)),
            (key(KeyCode::Right, none), Some(Shortcut::SeekForward)),
            (key(KeyCode::Right, shift), Some(Shortcut::Next)),
            (key(KeyCode::Left, none), Some(Shortcut::SeekBackward)),
            (key(KeyCode::Left, shift), Some(Shortcut::Previous)),
            (key(KeyCode::Up, none), Some(Shortcut::VolumeUp)),
            (key(KeyCode::Down, none), Some(Shortcut::VolumeDown)),
            (key(KeyCode::Char('m'), none), Some(Shortcut::ToggleMute)),
            (key(KeyCode::Char('n'), none), Some(Shortcut::Next)),
            (key(KeyCode::Char('p'), none), Some(Shortcut::Previous)),
            (key(KeyCode::Char('q'), none), None),
            (key(KeyCode::Enter, none), None),
        ];
        for (event, expected) in cases {
            assert_eq!(Shortcut::from_key(&event), expected, "{event:?}");
        }
    }

    #[test]
    fn seek_forward_stops_at_duration() {
        let (mut engine, handle) = playing(15.0);
        let controls = ControlsSettings::default();

        Shortcut::SeekForward.apply(&mut engine, &controls);
        assert_eq!(engine.state().current_time, 10.0);
        Shortcut::SeekForward.apply(&mut engine, &controls);
        assert_eq!(engine.state().current_time, 15.0);

        assert_eq!(
            handle.ledger.borrow().calls_for(SessionId(1)).last(),
            Some(&Call::Seek(15.0))
        );
    }

    #[test]
    fn seek_backward_stops_at_zero() {
        let (mut engine, _) = playing(300.0);
        let controls = ControlsSettings::default();
        engine.seek(4.0);

        Shortcut::SeekBackward.apply(&mut engine, &controls);

        assert_eq!(engine.state().current_time, 0.0);
    }

    #[test]
    fn volume_steps_are_clamped() {
        let (mut engine, _) = playing(60.0);
        let controls = ControlsSettings {
            volume_step: 0.25,
            ..ControlsSettings::default()
        };

        Shortcut::VolumeUp.apply(&mut engine, &controls);
        assert_eq!(engine.state().volume, 1.0);
        for _ in 0..5 {
            Shortcut::VolumeDown.apply(&mut engine, &controls);
        }
        assert_eq!(engine.state().volume, 0.0);
    }

    #[test]
    fn next_and_mute_reach_the_engine() {
        let (mut engine, handle) = playing(60.0);
        let controls = ControlsSettings::default();

        Shortcut::ToggleMute.apply(&mut engine, &controls);
        assert!(engine.state().is_muted);

        Shortcut::Next.apply(&mut engine, &controls);
        assert_eq!(engine.queue().cursor(), Some(1));
        assert_eq!(handle.ledger.borrow().last_created(), Some(SessionId(2)));

        Shortcut::TogglePlay.apply(&mut engine, &controls);
        assert_eq!(
            handle.ledger.borrow().calls_for(SessionId(2)).last(),
            Some(&Call::Play)
        );
    }
}
