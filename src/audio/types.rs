//! Audio-related small types.
//!
//! This module defines the published player state, session identities and
//! the tagged lifecycle events sessions emit.

use crate::library::Track;

/// Identity of one playback session.
///
/// Every session-creating command gets a fresh id; events carrying any other
/// id belong to a torn-down session and are ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Lifecycle notification from a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub kind: SessionEventKind,
}

impl SessionEvent {
    pub fn new(session: SessionId, kind: SessionEventKind) -> Self {
        Self { session, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEventKind {
    /// Decoding is ready; `duration_seconds` is 0 when the decoder cannot tell.
    Loaded { duration_seconds: f64 },
    /// Audio became audible.
    Playing,
    /// Audio halted, position retained.
    Paused,
    /// Audio halted and rewound.
    Stopped,
    /// The track played to its end.
    Ended,
    /// The stream could not be fetched or decoded.
    LoadError { reason: String },
}

/// Runtime playback information published to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub is_loading: bool,
    /// Elapsed seconds of the current track.
    pub current_time: f64,
    /// Seconds; 0 until the session has loaded.
    pub duration: f64,
    /// 0.0 - 1.0, kept while muted so unmuting restores it.
    pub volume: f32,
    pub is_muted: bool,
}

impl PlayerState {
    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            is_loading: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 0.8,
            is_muted: false,
        }
    }
}

/// Coarse transport phase, derived from state and session presence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Playing,
    Paused,
}
