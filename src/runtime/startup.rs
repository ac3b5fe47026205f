//! Command line parsing and the initial play request.

use tracing::info;

use crate::audio::{Backend, PlayReporter, PlaybackEngine};
use crate::error::{Error, Result};
use crate::library::LibraryClient;

pub const USAGE: &str = "\
usage: encore [album] <album-id> [start-index]
       encore track <track-id>
       encore recent
       encore --print-config";

/// What to do once the player is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    Album { id: String, start: usize },
    Track { id: String },
    /// The most recently added album.
    Recent,
    PrintConfig,
    Help,
}

pub fn parse_args<I>(args: I) -> Result<LaunchTarget>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let words: Vec<&str> = args.iter().map(String::as_str).collect();

    match words.as_slice() {
        ["-h" | "--help"] => Ok(LaunchTarget::Help),
        ["--print-config"] => Ok(LaunchTarget::PrintConfig),
        ["recent"] => Ok(LaunchTarget::Recent),
        ["track", id] => Ok(LaunchTarget::Track { id: id.to_string() }),
        ["album", id] => album(id, None),
        ["album", id, start] => album(id, Some(*start)),
        [id] if !id.starts_with('-') => album(id, None),
        [id, start] if !id.starts_with('-') => album(id, Some(*start)),
        _ => Err(Error::Usage(USAGE.to_string())),
    }
}

fn album(id: &str, start: Option<&str>) -> Result<LaunchTarget> {
    let start = match start {
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| Error::Usage(format!("start index must be a number, got {s:?}")))?,
        None => 0,
    };
    Ok(LaunchTarget::Album {
        id: id.to_string(),
        start,
    })
}

/// Fetch whatever `target` names and hand it to the engine.
pub fn start_playback<B: Backend, R: PlayReporter>(
    target: &LaunchTarget,
    client: &LibraryClient,
    engine: &mut PlaybackEngine<B, R>,
) -> Result<()> {
    match target {
        LaunchTarget::Album { id, start } => play_album(client, engine, id, *start),
        LaunchTarget::Recent => {
            let recent = client.recent_albums(1)?;
            let Some(latest) = recent.first() else {
                return Err(Error::Usage("the library has no albums yet".to_string()));
            };
            play_album(client, engine, &latest.id, 0)
        }
        LaunchTarget::Track { id } => {
            let track = client.track(id)?;
            info!(track = %track.id, "starting single track");
            engine.play_track_with_queue(track.clone(), vec![track], 0);
            Ok(())
        }
        LaunchTarget::PrintConfig | LaunchTarget::Help => Ok(()),
    }
}

fn play_album<B: Backend, R: PlayReporter>(
    client: &LibraryClient,
    engine: &mut PlaybackEngine<B, R>,
    album_id: &str,
    start: usize,
) -> Result<()> {
    let detail = client.album(album_id)?;
    if detail.tracks.is_empty() {
        return Err(Error::Usage(format!("album {:?} has no tracks", detail.album.title)));
    }
    if start >= detail.tracks.len() {
        return Err(Error::Usage(format!(
            "start index {start} is out of range; {:?} has {} tracks",
            detail.album.title,
            detail.tracks.len()
        )));
    }
    info!(
        album = %detail.album.id,
        title = %detail.album.title,
        artist = ?detail.album.artist_name,
        year = ?detail.album.year,
        tracks = detail.album.track_count,
        seconds = detail.album.duration_seconds,
        start,
        "starting album"
    );
    engine.play_album(detail.tracks, start);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<LaunchTarget> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn bare_id_is_an_album() {
        assert_eq!(
            parse(&["a1"]).unwrap(),
            LaunchTarget::Album {
                id: "a1".into(),
                start: 0
            }
        );
        assert_eq!(
            parse(&["a1", "3"]).unwrap(),
            LaunchTarget::Album {
                id: "a1".into(),
                start: 3
            }
        );
    }

    #[test]
    fn explicit_subcommands() {
        assert_eq!(
            parse(&["album", "a1", "2"]).unwrap(),
            LaunchTarget::Album {
                id: "a1".into(),
                start: 2
            }
        );
        assert_eq!(
            parse(&["track", "t9"]).unwrap(),
            LaunchTarget::Track { id: "t9".into() }
        );
        assert_eq!(parse(&["recent"]).unwrap(), LaunchTarget::Recent);
        assert_eq!(parse(&["--print-config"]).unwrap(), LaunchTarget::PrintConfig);
        assert_eq!(parse(&["--help"]).unwrap(), LaunchTarget::Help);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse(&[]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["--verbose"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["a1", "two"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["track"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["a", "b", "c", "d"]), Err(Error::Usage(_))));
    }
}
