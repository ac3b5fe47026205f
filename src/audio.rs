//! Playback: the session state machine and its `rodio` backend.
//!
//! `engine` holds the semantics and is generic over the `backend` seam;
//! `sink`, `thread` and `stream` are the real decode/output adapter;
//! `player` joins the two with the event channel.

mod backend;
mod engine;
mod player;
mod queue;
mod sampler;
mod sink;
mod stream;
mod thread;
mod types;

pub use backend::{Backend, PlayReporter, Session};
pub use engine::{EngineOptions, PlaybackEngine};
pub use player::{AudioPlayer, StreamingPlayer};
pub use queue::Queue;
pub use types::{PlaybackPhase, PlayerState, SessionEvent, SessionEventKind, SessionId};

#[cfg(test)]
pub(crate) mod testing;
