use std::io::Read;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::model::{Album, AlbumDetail, Page, Track};
use crate::config::ServerSettings;
use crate::error::{Error, Result};

const API_PREFIX: &str = "/api/v1";

/// Blocking client for the library server's REST API.
///
/// Only the handful of endpoints the player needs: album and track lookup,
/// stream URL resolution and play recording.
#[derive(Clone)]
pub struct LibraryClient {
    agent: ureq::Agent,
    base: String,
}

#[derive(Serialize)]
struct PlayBody {
    duration: Option<f64>,
}

impl LibraryClient {
    pub fn new(settings: &ServerSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
            .timeout_read(Duration::from_secs(settings.read_timeout_secs))
            .user_agent(concat!("encore/", env!("CARGO_PKG_VERSION")))
            .redirects(10)
            .build();

        Self {
            agent,
            base: api_base(&settings.base_url),
        }
    }

    /// The HTTP agent, shared with the streaming reader so both use the same
    /// timeouts and connection pool.
    pub fn agent(&self) -> ureq::Agent {
        self.agent.clone()
    }

    pub fn stream_url(&self, track_id: &str) -> String {
        format!("{}/tracks/{}/stream", self.base, track_id)
    }

    /// Album plus its tracks, each with a resolved stream URL.
    pub fn album(&self, album_id: &str) -> Result<AlbumDetail> {
        let mut detail: AlbumDetail = self.get_json(&format!("/albums/{album_id}"))?;
        for track in &mut detail.tracks {
            track.stream_url = self.stream_url(&track.id);
        }
        debug!(album = %detail.album.title, tracks = detail.tracks.len(), "fetched album");
        Ok(detail)
    }

    pub fn track(&self, track_id: &str) -> Result<Track> {
        let mut track: Track = self.get_json(&format!("/tracks/{track_id}"))?;
        track.stream_url = self.stream_url(&track.id);
        Ok(track)
    }

    pub fn recent_albums(&self, limit: u32) -> Result<Vec<Album>> {
        let page: Page<Album> = self.get_json(&format!("/albums/recent?limit={limit}"))?;
        debug!(total = page.total, returned = page.items.len(), "fetched recent albums");
        Ok(page.items)
    }

    /// Record a completed play of `track_id`.
    pub fn record_play(&self, track_id: &str, duration_seconds: Option<f64>) -> Result<()> {
        let url = format!("{}/tracks/{}/play", self.base, track_id);
        let body = serde_json::to_string(&PlayBody {
            duration: duration_seconds,
        })?;
        self.agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| Error::from_ureq(&url, e))?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| Error::from_ureq(&url, e))?;

        let mut body = String::new();
        response.into_reader().read_to_string(&mut body)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Normalize a configured server URL into the API root.
fn api_base(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.ends_with(API_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_PREFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_appends_prefix_once() {
        assert_eq!(api_base("http://host:8080"), "http://host:8080/api/v1");
        assert_eq!(api_base("http://host:8080/"), "http://host:8080/api/v1");
        assert_eq!(api_base(" http://host/api/v1/ "), "http://host/api/v1");
    }

    #[test]
    fn stream_url_points_at_track_stream_endpoint() {
        let client = LibraryClient::new(&ServerSettings {
            base_url: "http://music.local".into(),
            ..ServerSettings::default()
        });
        assert_eq!(
            client.stream_url("t-42"),
            "http://music.local/api/v1/tracks/t-42/stream"
        );
    }

    #[test]
    fn play_body_serializes_duration_field() {
        let body = serde_json::to_string(&PlayBody {
            duration: Some(180.5),
        })
        .unwrap();
        assert_eq!(body, r#"{"duration":180.5}"#);
    }
}
