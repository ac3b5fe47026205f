//! Error types shared by the outer layers (config, library client, startup).
//!
//! The playback engine itself never returns these: its commands are total and
//! adapter failures surface as `LoadError` session events instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Config file or environment could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Settings parsed but hold values the player cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Transport-level failure talking to the library server.
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("server returned {status} for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// Response body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// No usable audio output device.
    #[error("audio output unavailable: {0}")]
    AudioOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad command line.
    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Convert a `ureq` failure into either a status or transport error.
    ///
    /// Status errors keep the server's `{"error": "..."}` message when the body
    /// carries one.
    pub fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                Error::Status {
                    url: url.to_string(),
                    status,
                    message: server_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
                }
            }
            ureq::Error::Transport(t) => Error::Http {
                url: url.to_string(),
                message: t.to_string(),
            },
        }
    }
}

/// Pull the `error` field out of a JSON error body.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
