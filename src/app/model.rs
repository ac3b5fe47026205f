//! Application model type: `App`.
//!
//! `App` only tracks what the terminal front end needs on top of the engine:
//! which queue row is selected, whether the selection follows playback, and
//! whether the screen needs redrawing.

use std::cell::Cell;
use std::rc::Rc;

/// The front-end model.
pub struct App {
    pub selected: usize,
    pub follow_playback: bool,
    pub metadata_window: bool,
    redraw: Rc<Cell<bool>>,
}

impl App {
    /// Create a new `App`; the first frame is always drawn.
    pub fn new(follow_playback: bool) -> Self {
        Self {
            selected: 0,
            follow_playback,
            metadata_window: false,
            redraw: Rc::new(Cell::new(true)),
        }
    }

    /// Shared flag for engine observers to request a redraw.
    pub fn redraw_handle(&self) -> Rc<Cell<bool>> {
        self.redraw.clone()
    }

    pub fn mark_dirty(&self) {
        self.redraw.set(true);
    }

    /// Return whether a redraw was requested and clear the request.
    pub fn take_dirty(&self) -> bool {
        self.redraw.replace(false)
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
        self.mark_dirty();
    }

    /// Enable following playback (cursor follows the queue cursor).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the selection onto the playing entry when following.
    pub fn follow(&mut self, queue_cursor: Option<usize>) {
        if !self.follow_playback {
            return;
        }
        if let Some(idx) = queue_cursor {
            if self.selected != idx {
                self.selected = idx;
                self.mark_dirty();
            }
        }
    }

    /// Keep `selected` inside a queue of `len` entries.
    pub fn clamp_selection(&mut self, len: usize) {
        let clamped = self.selected.min(len.saturating_sub(1));
        if clamped != self.selected {
            self.selected = clamped;
            self.mark_dirty();
        }
    }

    /// Move selection to the next row, wrapping to the first.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
        self.mark_dirty();
    }

    /// Move selection to the previous row, wrapping to the last.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = match self.selected {
            0 => len - 1,
            i => (i - 1).min(len - 1),
        };
        self.mark_dirty();
    }
}
