use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::error::Result;
use crate::library::{HttpPlayReporter, LibraryClient};

use super::backend::{Backend, PlayReporter};
use super::engine::{EngineOptions, PlaybackEngine};
use super::sink::RodioBackend;
use super::types::SessionEvent;

/// The engine plus the channel its sessions report on.
///
/// Session threads only ever send events; everything that touches engine
/// state happens inside `pump` on the caller's thread.
pub struct AudioPlayer<B: Backend, R: PlayReporter> {
    engine: PlaybackEngine<B, R>,
    events: Receiver<SessionEvent>,
}

pub type StreamingPlayer = AudioPlayer<RodioBackend, HttpPlayReporter>;

impl StreamingPlayer {
    /// Open the default output device and wire sessions to `client`.
    pub fn open(client: &LibraryClient, settings: &Settings) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<SessionEvent>();
        let backend = RodioBackend::open(
            client.agent(),
            tx,
            Duration::from_millis(settings.audio.end_poll_ms),
        )?;
        let reporter = HttpPlayReporter::new(client.clone());
        let options = EngineOptions::from_settings(&settings.audio, &settings.controls);

        Ok(Self::new(PlaybackEngine::new(backend, reporter, options), rx))
    }
}

impl<B: Backend, R: PlayReporter> AudioPlayer<B, R> {
    pub fn new(engine: PlaybackEngine<B, R>, events: Receiver<SessionEvent>) -> Self {
        Self { engine, events }
    }

    /// Deliver queued session events, then run the sampler if it is due.
    ///
    /// Returns how many events were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.engine.handle_event(event);
            handled += 1;
        }
        self.engine.tick(Instant::now());
        handled
    }

    /// How long the caller may block before `pump` has work, capped at `max`.
    pub fn poll_timeout(&self, now: Instant, max: Duration) -> Duration {
        match self.engine.next_tick_due() {
            Some(due) => due.saturating_duration_since(now).min(max),
            None => max,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine<B, R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlaybackEngine<B, R> {
        &mut self.engine
    }

    /// Release the active session before the output stream goes away.
    pub fn shutdown(&mut self) {
        self.engine.stop();
    }
}
