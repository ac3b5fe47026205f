//! In-memory doubles for the backend seam, shared by engine and runtime tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::backend::{Backend, PlayReporter, Session};
use super::types::SessionId;
use crate::library::Track;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    Unload,
}

/// Everything the fake backend observed.
#[derive(Debug, Default)]
pub struct Ledger {
    /// `(id, stream_url, initial_volume)` per `create`.
    pub created: Vec<(SessionId, String, f32)>,
    pub calls: Vec<(SessionId, Call)>,
    pub live: BTreeSet<SessionId>,
    /// Highest number of sessions alive at once.
    pub max_live: usize,
    pub positions: BTreeMap<SessionId, f64>,
    pub playing: BTreeMap<SessionId, bool>,
}

impl Ledger {
    pub fn calls_for(&self, id: SessionId) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|(s, _)| *s == id)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn last_created(&self) -> Option<SessionId> {
        self.created.last().map(|(id, _, _)| *id)
    }
}

pub type SharedLedger = Rc<RefCell<Ledger>>;

#[derive(Default)]
pub struct FakeBackend {
    pub ledger: SharedLedger,
}

impl Backend for FakeBackend {
    type Session = FakeSession;

    fn create(&mut self, id: SessionId, stream_url: &str, initial_volume: f32) -> FakeSession {
        let mut ledger = self.ledger.borrow_mut();
        ledger.created.push((id, stream_url.to_string(), initial_volume));
        ledger.live.insert(id);
        ledger.max_live = ledger.max_live.max(ledger.live.len());
        FakeSession {
            id,
            ledger: self.ledger.clone(),
        }
    }
}

/// Playing/position are driven by the ledger so tests can move them.
pub struct FakeSession {
    id: SessionId,
    ledger: SharedLedger,
}

impl FakeSession {
    fn record(&self, call: Call) {
        self.ledger.borrow_mut().calls.push((self.id, call));
    }
}

impl Session for FakeSession {
    fn play(&mut self) {
        self.record(Call::Play);
        self.ledger.borrow_mut().playing.insert(self.id, true);
    }

    fn pause(&mut self) {
        self.record(Call::Pause);
        self.ledger.borrow_mut().playing.insert(self.id, false);
    }

    fn seek(&mut self, seconds: f64) -> f64 {
        self.record(Call::Seek(seconds));
        self.ledger.borrow_mut().positions.insert(self.id, seconds);
        seconds
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Call::SetVolume(volume));
    }

    fn position(&self) -> f64 {
        self.ledger
            .borrow()
            .positions
            .get(&self.id)
            .copied()
            .unwrap_or(0.0)
    }

    fn is_playing(&self) -> bool {
        self.ledger
            .borrow()
            .playing
            .get(&self.id)
            .copied()
            .unwrap_or(false)
    }

    fn unload(&mut self) {
        self.record(Call::Unload);
        let mut ledger = self.ledger.borrow_mut();
        ledger.live.remove(&self.id);
        ledger.playing.insert(self.id, false);
    }
}

#[derive(Default, Clone)]
pub struct RecordingReporter {
    pub reports: Rc<RefCell<Vec<(String, f64)>>>,
}

impl PlayReporter for RecordingReporter {
    fn report_play(&self, track_id: &str, duration_seconds: f64) {
        self.reports
            .borrow_mut()
            .push((track_id.to_string(), duration_seconds));
    }
}

pub fn track(id: &str, duration_seconds: f64) -> Track {
    Track {
        id: id.to_string(),
        album_id: "album".to_string(),
        title: format!("Title {id}"),
        track_number: None,
        disc_number: 1,
        duration_seconds,
        format: "flac".to_string(),
        sample_rate: None,
        bit_depth: None,
        channels: 2,
        bitrate: None,
        artist_name: None,
        album_title: None,
        stream_url: format!("http://test/api/v1/tracks/{id}/stream"),
    }
}
