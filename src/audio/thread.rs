use std::io;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};
use tracing::{debug, warn};

use super::stream::HttpRangeReader;
use super::types::{SessionEvent, SessionEventKind, SessionId};

/// State a session shares with its loader thread.
///
/// Commands that arrive before the sink exists are recorded here and applied
/// once decoding is ready.
pub(super) struct Shared {
    pub sink: Option<Sink>,
    pub want_playing: bool,
    pub volume: f32,
    pub pending_seek: Option<f64>,
    /// Set by `unload`; the thread exits without emitting anything further.
    pub released: bool,
}

impl Shared {
    pub fn new(volume: f32) -> Self {
        Self {
            sink: None,
            want_playing: false,
            volume,
            pending_seek: None,
            released: false,
        }
    }
}

pub(super) type SharedSession = Arc<Mutex<Shared>>;

pub(super) struct SessionThread {
    pub id: SessionId,
    pub url: String,
    pub agent: ureq::Agent,
    pub mixer: Mixer,
    pub shared: SharedSession,
    pub events: Sender<SessionEvent>,
    pub end_poll: Duration,
}

/// Spawn the thread that loads one session and then watches it for the end.
pub(super) fn spawn_session_thread(ctx: SessionThread) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("encore-session-{}", ctx.id.0))
        .spawn(move || ctx.run())
}

impl SessionThread {
    fn run(self) {
        let source = match open_source(&self.agent, &self.url) {
            Ok(source) => source,
            Err(reason) => {
                if !self.is_released() {
                    self.emit(SessionEventKind::LoadError { reason });
                }
                return;
            }
        };
        let duration_seconds = source.total_duration().map_or(0.0, |d| d.as_secs_f64());

        {
            let Ok(mut shared) = self.shared.lock() else {
                return;
            };
            if shared.released {
                debug!(session = self.id.0, "released before load finished");
                return;
            }

            // A fresh sink starts playing; hold it until the intent is known.
            let sink = Sink::connect_new(&self.mixer);
            sink.pause();
            sink.set_volume(shared.volume);
            sink.append(source);

            if let Some(seconds) = shared.pending_seek.take() {
                if let Err(e) = sink.try_seek(Duration::from_secs_f64(seconds)) {
                    warn!(session = self.id.0, error = %e, "initial seek failed");
                }
            }

            self.emit(SessionEventKind::Loaded { duration_seconds });
            if shared.want_playing {
                sink.play();
                self.emit(SessionEventKind::Playing);
            }
            shared.sink = Some(sink);
        }

        self.watch_for_end();
    }

    fn watch_for_end(&self) {
        loop {
            thread::sleep(self.end_poll);
            let Ok(shared) = self.shared.lock() else {
                return;
            };
            if shared.released {
                return;
            }
            if shared.sink.as_ref().is_some_and(|s| s.empty()) {
                self.emit(SessionEventKind::Ended);
                return;
            }
        }
    }

    fn is_released(&self) -> bool {
        self.shared.lock().map(|s| s.released).unwrap_or(true)
    }

    fn emit(&self, kind: SessionEventKind) {
        let _ = self.events.send(SessionEvent::new(self.id, kind));
    }
}

/// Open `url` and build a decoder that can seek in both directions.
pub(super) fn open_source(
    agent: &ureq::Agent,
    url: &str,
) -> Result<Decoder<HttpRangeReader>, String> {
    let reader = HttpRangeReader::open(agent.clone(), url).map_err(|e| e.to_string())?;
    let len = reader.len();
    debug!(url, len, "decoding stream");

    let mut builder = Decoder::builder().with_data(reader).with_seekable(true);
    // Symphonia refuses backward seeks without a byte length.
    if let Some(len) = len {
        builder = builder.with_byte_len(len);
    }
    builder
        .build()
        .map_err(|e| format!("undecodable stream: {e}"))
}
