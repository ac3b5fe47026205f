//! The playback state machine.
//!
//! `PlaybackEngine` owns the single active session, the play queue and the
//! progress sampler, and publishes `PlayerState` to observers. It runs on one
//! thread: commands, session events and sampler ticks are each handled to
//! completion before the next one starts, so the at-most-one-session rule
//! holds by construction. Every command is total; nothing here returns an
//! error or panics on an unexpected state.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::backend::{Backend, PlayReporter, Session};
use super::queue::Queue;
use super::sampler::ProgressSampler;
use super::types::{PlaybackPhase, PlayerState, SessionEvent, SessionEventKind, SessionId};
use crate::config::{AudioSettings, ControlsSettings};
use crate::library::Track;

/// Tunables the engine reads once at construction.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub initial_volume: f32,
    pub progress_interval: Duration,
    /// `previous` past this many seconds restarts the track instead.
    pub restart_threshold: f64,
}

impl EngineOptions {
    pub fn from_settings(audio: &AudioSettings, controls: &ControlsSettings) -> Self {
        Self {
            initial_volume: audio.initial_volume,
            progress_interval: Duration::from_millis(audio.progress_interval_ms),
            restart_threshold: controls.restart_threshold_seconds,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_settings(&AudioSettings::default(), &ControlsSettings::default())
    }
}

pub type Observer = Box<dyn FnMut(&PlayerState)>;

struct ActiveSession<S> {
    id: SessionId,
    session: S,
    /// Played to the end and kept because there was nothing to advance to.
    ended: bool,
}

pub struct PlaybackEngine<B: Backend, R: PlayReporter> {
    backend: B,
    reporter: R,
    active: Option<ActiveSession<B::Session>>,
    last_session: u64,
    queue: Queue,
    sampler: ProgressSampler,
    state: PlayerState,
    restart_threshold: f64,
    observers: Vec<Observer>,
}

impl<B: Backend, R: PlayReporter> PlaybackEngine<B, R> {
    pub fn new(backend: B, reporter: R, options: EngineOptions) -> Self {
        Self {
            backend,
            reporter,
            active: None,
            last_session: 0,
            queue: Queue::new(),
            sampler: ProgressSampler::new(options.progress_interval),
            state: PlayerState::with_volume(options.initial_volume.clamp(0.0, 1.0)),
            restart_threshold: options.restart_threshold,
            observers: Vec::new(),
        }
    }

    /// Register an observer called synchronously after every state change.
    pub fn subscribe(&mut self, observer: impl FnMut(&PlayerState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn has_session(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.active.is_none() {
            PlaybackPhase::Idle
        } else if self.state.is_playing {
            PlaybackPhase::Playing
        } else if self.state.is_loading {
            PlaybackPhase::Loading
        } else {
            PlaybackPhase::Paused
        }
    }

    /// When the next sampler tick wants to run, if one is scheduled.
    pub fn next_tick_due(&self) -> Option<Instant> {
        self.sampler.next_due()
    }

    /// Play `track` from the start, keeping the current queue.
    ///
    /// Always tears down and recreates the session, even when `track` is the
    /// one already playing.
    pub fn play_track(&mut self, track: Track) {
        self.start_session(track);
    }

    /// Play `track` and replace the queue with `queue`, cursor at `index`.
    pub fn play_track_with_queue(&mut self, track: Track, queue: Vec<Track>, index: usize) {
        self.queue.replace(queue, index);
        self.start_session(track);
    }

    /// Queue all of `tracks` and start at `start_index`.
    pub fn play_album(&mut self, tracks: Vec<Track>, start_index: usize) {
        let Some(track) = tracks.get(start_index).cloned() else {
            return;
        };
        self.play_track_with_queue(track, tracks, start_index);
    }

    /// Pause or resume. A session that already played to its end restarts
    /// the track from the beginning instead.
    pub fn toggle_play(&mut self) {
        if self.restart_if_ended() {
            return;
        }
        let playing = self.state.is_playing;
        if let Some(active) = self.active.as_mut() {
            if playing {
                active.session.pause();
            } else {
                active.session.play();
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.session.pause();
        }
    }

    pub fn resume(&mut self) {
        if self.restart_if_ended() {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.session.play();
        }
    }

    /// Release the session and reset the published state. Idempotent.
    pub fn stop(&mut self) {
        self.release_session();
        self.publish(|s| {
            s.current_track = None;
            s.is_playing = false;
            s.is_loading = false;
            s.current_time = 0.0;
            s.duration = 0.0;
        });
    }

    /// Skip forward in the queue; stops once the queue is exhausted.
    pub fn next(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        match self.queue.advance() {
            Some(track) => self.start_session(track),
            None => {
                debug!("queue exhausted");
                self.stop();
            }
        }
    }

    /// Restart the current track when past the threshold, else step back.
    ///
    /// At the start of the queue this keeps the current track playing.
    pub fn previous(&mut self) {
        if self.state.current_time > self.restart_threshold {
            self.seek(0.0);
            return;
        }
        if self.queue.is_empty() {
            return;
        }
        if let Some(track) = self.queue.retreat() {
            self.start_session(track);
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let seconds = seconds.max(0.0);
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let reached = active.session.seek(seconds);
        debug!(requested = seconds, reached, "seek");
        self.publish(|s| s.current_time = seconds);
    }

    /// Set the volume, clamped into `[0, 1]`. While muted only the published
    /// level changes; it is pushed to the session on unmute.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.publish(|s| s.volume = volume);
        if !self.state.is_muted {
            if let Some(active) = self.active.as_mut() {
                active.session.set_volume(volume);
            }
        }
    }

    pub fn toggle_mute(&mut self) {
        let was_muted = self.state.is_muted;
        self.publish(|s| s.is_muted = !was_muted);
        let level = if was_muted { self.state.volume } else { 0.0 };
        if let Some(active) = self.active.as_mut() {
            active.session.set_volume(level);
        }
    }

    pub fn add_to_queue(&mut self, track: Track) {
        self.queue.append(track);
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Single entry point for session lifecycle events.
    ///
    /// Events from any session other than the active one are dropped.
    pub fn handle_event(&mut self, event: SessionEvent) {
        if self.active_session() != Some(event.session) {
            debug!(session = event.session.0, kind = ?event.kind, "discarding stale session event");
            return;
        }

        match event.kind {
            SessionEventKind::Loaded { duration_seconds } => {
                let declared = self
                    .state
                    .current_track
                    .as_ref()
                    .map_or(0.0, |t| t.duration_seconds);
                let duration = if duration_seconds.is_finite() && duration_seconds > 0.0 {
                    duration_seconds
                } else {
                    declared
                };
                self.publish(|s| {
                    s.duration = duration;
                    s.is_loading = false;
                });
            }
            SessionEventKind::Playing => {
                self.publish(|s| {
                    s.is_playing = true;
                    s.is_loading = false;
                });
                let now = Instant::now();
                self.sampler.start(event.session, now);
                self.sample(now);
            }
            SessionEventKind::Paused => {
                self.sampler.cancel();
                self.publish(|s| s.is_playing = false);
            }
            SessionEventKind::Stopped => {
                self.sampler.cancel();
                self.publish(|s| {
                    s.is_playing = false;
                    s.current_time = 0.0;
                });
            }
            SessionEventKind::Ended => {
                if let Some(active) = self.active.as_mut() {
                    active.ended = true;
                }
                self.finish_track();
            }
            SessionEventKind::LoadError { reason } => {
                warn!(session = event.session.0, %reason, "load error");
                self.release_session();
                self.publish(|s| {
                    s.is_loading = false;
                    s.is_playing = false;
                });
            }
        }
    }

    /// Run one sampler tick if it is due.
    pub fn tick(&mut self, now: Instant) {
        let Some(id) = self.active_session() else {
            self.sampler.cancel();
            return;
        };
        if self.sampler.is_due(id, now) {
            self.sample(now);
        }
    }

    /// Report the finished track with its declared duration, then advance
    /// through the same path as `next`.
    fn finish_track(&mut self) {
        self.sampler.cancel();
        if let Some(track) = self.state.current_track.as_ref() {
            info!(track = %track.id, "track finished");
            self.reporter.report_play(&track.id, track.duration_seconds);
        }
        self.publish(|s| s.is_playing = false);
        self.next();
    }

    /// Recreate the session for the current track if the active one has
    /// drained. Returns whether it did.
    fn restart_if_ended(&mut self) -> bool {
        if !self.active.as_ref().is_some_and(|a| a.ended) {
            return false;
        }
        match self.state.current_track.clone() {
            Some(track) => {
                debug!(track = %track.id, "replaying finished track");
                self.start_session(track);
            }
            None => self.release_session(),
        }
        true
    }

    fn sample(&mut self, now: Instant) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let position = active.session.position();
        let still_playing = active.session.is_playing();

        self.publish(|s| s.current_time = position);
        if still_playing {
            self.sampler.reschedule(now);
        } else {
            self.sampler.cancel();
        }
    }

    fn start_session(&mut self, track: Track) {
        self.release_session();

        self.last_session += 1;
        let id = SessionId(self.last_session);
        let volume = if self.state.is_muted {
            0.0
        } else {
            self.state.volume
        };

        info!(session = id.0, track = %track.id, "starting session");
        let mut session = self.backend.create(id, &track.stream_url, volume);
        session.play();
        self.active = Some(ActiveSession {
            id,
            session,
            ended: false,
        });

        self.publish(|s| {
            s.current_track = Some(track);
            s.is_loading = true;
            s.is_playing = false;
            s.current_time = 0.0;
            s.duration = 0.0;
        });
    }

    /// Unload the active session and cancel its sampler.
    fn release_session(&mut self) {
        self.sampler.cancel();
        if let Some(mut active) = self.active.take() {
            debug!(session = active.id.0, "releasing session");
            active.session.unload();
        }
    }

    fn publish(&mut self, update: impl FnOnce(&mut PlayerState)) {
        let before = self.state.clone();
        update(&mut self.state);
        if self.state != before {
            for observer in self.observers.iter_mut() {
                observer(&self.state);
            }
        }
    }
}

impl<B: Backend, R: PlayReporter> Drop for PlaybackEngine<B, R> {
    fn drop(&mut self) {
        self.release_session();
    }
}
