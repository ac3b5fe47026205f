//! The play queue: an ordered list of tracks plus a cursor.
//!
//! The cursor is `None` when no entry is selected (a cleared queue, or a
//! replacement whose start index was out of range).

use crate::library::Track;

#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole queue and point the cursor at `start_index`.
    ///
    /// An empty `tracks` leaves the existing queue untouched.
    pub fn replace(&mut self, tracks: Vec<Track>, start_index: usize) {
        if tracks.is_empty() {
            return;
        }
        self.cursor = (start_index < tracks.len()).then_some(start_index);
        self.tracks = tracks;
    }

    /// Append without moving the cursor.
    pub fn append(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = None;
    }

    /// Step forward. With no cursor this lands on the first entry.
    pub fn advance(&mut self) -> Option<Track> {
        let next = self.cursor.map_or(0, |c| c + 1);
        let track = self.tracks.get(next)?.clone();
        self.cursor = Some(next);
        Some(track)
    }

    /// Step back; `None` when already at the start (or nothing is selected).
    pub fn retreat(&mut self) -> Option<Track> {
        let prev = self.cursor?.checked_sub(1)?;
        let track = self.tracks.get(prev)?.clone();
        self.cursor = Some(prev);
        Some(track)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
