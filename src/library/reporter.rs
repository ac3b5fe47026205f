use std::thread;

use tracing::{debug, warn};

use super::client::LibraryClient;
use crate::audio::PlayReporter;

/// Records completed plays on the library server.
///
/// Each report runs on its own short-lived thread so the engine never waits
/// on the network; failures are logged and dropped.
pub struct HttpPlayReporter {
    client: LibraryClient,
}

impl HttpPlayReporter {
    pub fn new(client: LibraryClient) -> Self {
        Self { client }
    }
}

impl PlayReporter for HttpPlayReporter {
    fn report_play(&self, track_id: &str, duration_seconds: f64) {
        let client = self.client.clone();
        let track_id = track_id.to_string();
        let duration = (duration_seconds > 0.0).then_some(duration_seconds);

        let spawned = thread::Builder::new()
            .name("encore-report".into())
            .spawn(move || match client.record_play(&track_id, duration) {
                Ok(()) => debug!(track = %track_id, "recorded play"),
                Err(e) => warn!(track = %track_id, error = %e, "failed to record play"),
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not spawn play reporter thread");
        }
    }
}
