//! The `rodio` implementation of the backend seam.
//!
//! `RodioBackend` owns the output stream; each `RodioSession` is one `Sink`
//! fed by a decoder over an HTTP range reader. Loading happens on a
//! per-session thread so `create` never blocks.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder};
use tracing::warn;

use super::backend::{Backend, Session};
use super::thread::{spawn_session_thread, SessionThread, Shared, SharedSession};
use super::types::{SessionEvent, SessionEventKind, SessionId};
use crate::error::{Error, Result};

pub struct RodioBackend {
    stream: OutputStream,
    agent: ureq::Agent,
    events: Sender<SessionEvent>,
    end_poll: Duration,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open(agent: ureq::Agent, events: Sender<SessionEvent>, end_poll: Duration) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| Error::AudioOutput(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            agent,
            events,
            end_poll,
        })
    }
}

impl Backend for RodioBackend {
    type Session = RodioSession;

    fn create(&mut self, id: SessionId, stream_url: &str, initial_volume: f32) -> RodioSession {
        let shared: SharedSession = Arc::new(Mutex::new(Shared::new(initial_volume)));

        let spawned = spawn_session_thread(SessionThread {
            id,
            url: stream_url.to_string(),
            agent: self.agent.clone(),
            mixer: self.stream.mixer().clone(),
            shared: shared.clone(),
            events: self.events.clone(),
            end_poll: self.end_poll,
        });
        if let Err(e) = spawned {
            warn!(session = id.0, error = %e, "could not spawn session thread");
            let _ = self.events.send(SessionEvent::new(
                id,
                SessionEventKind::LoadError {
                    reason: e.to_string(),
                },
            ));
        }

        RodioSession {
            id,
            shared,
            events: self.events.clone(),
        }
    }
}

pub struct RodioSession {
    id: SessionId,
    shared: SharedSession,
    events: Sender<SessionEvent>,
}

impl RodioSession {
    fn with_shared<T>(&self, f: impl FnOnce(&mut Shared) -> T) -> Option<T> {
        let mut shared = self.shared.lock().ok()?;
        if shared.released {
            return None;
        }
        Some(f(&mut shared))
    }

    fn emit(&self, kind: SessionEventKind) {
        let _ = self.events.send(SessionEvent::new(self.id, kind));
    }
}

impl Session for RodioSession {
    fn play(&mut self) {
        let started = self.with_shared(|s| {
            s.want_playing = true;
            match s.sink.as_ref() {
                // A drained sink has nothing left to play.
                Some(sink) if !sink.empty() => {
                    sink.play();
                    true
                }
                _ => false,
            }
        });
        if started == Some(true) {
            self.emit(SessionEventKind::Playing);
        }
    }

    fn pause(&mut self) {
        let paused = self.with_shared(|s| {
            s.want_playing = false;
            s.sink.as_ref().map(|sink| sink.pause()).is_some()
        });
        if paused == Some(true) {
            self.emit(SessionEventKind::Paused);
        }
    }

    fn seek(&mut self, seconds: f64) -> f64 {
        let id = self.id;
        self.with_shared(|s| match s.sink.as_ref() {
            Some(sink) => {
                if let Err(e) = sink.try_seek(Duration::from_secs_f64(seconds)) {
                    warn!(session = id.0, error = %e, "seek failed");
                }
                sink.get_pos().as_secs_f64()
            }
            None => {
                s.pending_seek = Some(seconds);
                seconds
            }
        })
        .unwrap_or(0.0)
    }

    fn set_volume(&mut self, volume: f32) {
        self.with_shared(|s| {
            s.volume = volume;
            if let Some(sink) = s.sink.as_ref() {
                sink.set_volume(volume);
            }
        });
    }

    fn position(&self) -> f64 {
        self.with_shared(|s| match s.sink.as_ref() {
            Some(sink) => sink.get_pos().as_secs_f64(),
            None => s.pending_seek.unwrap_or(0.0),
        })
        .unwrap_or(0.0)
    }

    fn is_playing(&self) -> bool {
        self.with_shared(|s| {
            s.sink
                .as_ref()
                .is_some_and(|sink| !sink.is_paused() && !sink.empty())
        })
        .unwrap_or(false)
    }

    fn unload(&mut self) {
        if let Ok(mut shared) = self.shared.lock() {
            shared.released = true;
            shared.want_playing = false;
            if let Some(sink) = shared.sink.take() {
                sink.stop();
            }
        }
    }
}

impl Drop for RodioSession {
    fn drop(&mut self) {
        self.unload();
    }
}
