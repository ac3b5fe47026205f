//! Application module: exposes the front-end model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the queue cursor, the
//! follow flag and the redraw signal. Playback state itself stays in the
//! engine.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
