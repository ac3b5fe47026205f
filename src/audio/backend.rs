//! Seams between the engine and the outside world.
//!
//! `Backend` creates decode/output sessions, `Session` drives one of them and
//! `PlayReporter` records completed plays. The engine is generic over all
//! three so tests can swap in in-memory doubles.

use super::types::SessionId;

/// Factory for decode/output sessions.
pub trait Backend {
    type Session: Session;

    /// Start loading `stream_url` in the background and return immediately.
    ///
    /// Lifecycle events for the new session must carry `id`.
    fn create(&mut self, id: SessionId, stream_url: &str, initial_volume: f32) -> Self::Session;
}

/// One live binding between a track and the audio output.
pub trait Session {
    /// Start or resume. Before load completes this only records the intent.
    fn play(&mut self);
    fn pause(&mut self);
    /// Move to `seconds`; returns the position actually reached (best effort).
    fn seek(&mut self, seconds: f64) -> f64;
    fn set_volume(&mut self, volume: f32);
    /// Elapsed seconds.
    fn position(&self) -> f64;
    /// Whether audio is currently audible.
    fn is_playing(&self) -> bool;
    /// Release the output and stop emitting events. Safe to call repeatedly.
    fn unload(&mut self);
}

/// Receives completed plays. Fire-and-forget.
pub trait PlayReporter {
    fn report_play(&self, track_id: &str, duration_seconds: f64);
}
