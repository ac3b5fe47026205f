use serde::{Deserialize, Deserializer};

/// A track as served by the library API.
///
/// Read-only to the player: the engine clones it into the queue and into the
/// published state, but never changes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub album_id: String,
    pub title: String,
    pub track_number: Option<u32>,
    #[serde(default = "default_disc")]
    pub disc_number: u32,
    /// Declared duration; the decoder's figure wins once a session has loaded.
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub format: String,
    pub sample_rate: Option<u32>,
    pub bit_depth: Option<u32>,
    #[serde(default)]
    pub channels: u32,
    pub bitrate: Option<u32>,
    pub artist_name: Option<String>,
    pub album_title: Option<String>,
    /// Resolved by `LibraryClient`; not part of the wire object.
    #[serde(skip)]
    pub stream_url: String,
}

fn default_disc() -> u32 {
    1
}

impl Track {
    /// "Artist - Title", or just the title when the artist is unknown.
    pub fn display(&self) -> String {
        match self.artist_name.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }

    /// Quality summary such as `24bit/96kHz FLAC`.
    pub fn quality(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let (Some(bits), Some(rate)) = (self.bit_depth, self.sample_rate) {
            let khz = if rate % 1000 == 0 {
                format!("{}", rate / 1000)
            } else {
                format!("{:.1}", rate as f64 / 1000.0)
            };
            parts.push(format!("{bits}bit/{khz}kHz"));
        }
        if !self.format.is_empty() {
            parts.push(self.format.to_uppercase());
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub artist_name: Option<String>,
    #[serde(default)]
    pub track_count: u32,
    #[serde(default)]
    pub duration_seconds: f64,
}

/// `GET /albums/{id}` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumDetail {
    pub album: Album,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tracks: Vec<Track>,
}

/// Paginated list envelope used by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(deserialize_with = "null_as_empty")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

/// Go encodes empty slices as `null`; treat that as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
