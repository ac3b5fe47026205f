use super::*;

const ALBUM_JSON: &str = r#"{
  "album": {
    "id": "al-1",
    "artist_id": "ar-1",
    "title": "Kind of Blue",
    "sort_title": "kind of blue",
    "year": 1959,
    "track_count": 2,
    "disc_count": 1,
    "duration_seconds": 1400.5,
    "artist_name": "Miles Davis",
    "created_at": "2024-01-01T00:00:00Z",
    "updated_at": "2024-01-01T00:00:00Z"
  },
  "tracks": [
    {
      "id": "t-1",
      "album_id": "al-1",
      "artist_id": "ar-1",
      "title": "So What",
      "track_number": 1,
      "disc_number": 1,
      "duration_seconds": 562.0,
      "file_size": 1234,
      "format": "flac",
      "sample_rate": 96000,
      "bit_depth": 24,
      "channels": 2,
      "artist_name": "Miles Davis",
      "album_title": "Kind of Blue",
      "created_at": "2024-01-01T00:00:00Z",
      "updated_at": "2024-01-01T00:00:00Z"
    },
    {
      "id": "t-2",
      "album_id": "al-1",
      "artist_id": "ar-1",
      "title": "Freddie Freeloader",
      "disc_number": 1,
      "duration_seconds": 589.0,
      "file_size": 1234,
      "format": "mp3",
      "sample_rate": 44100,
      "bit_depth": 16,
      "channels": 2,
      "created_at": "2024-01-01T00:00:00Z",
      "updated_at": "2024-01-01T00:00:00Z"
    }
  ]
}"#;

#[test]
fn album_detail_decodes_server_json() {
    let detail: AlbumDetail = serde_json::from_str(ALBUM_JSON).unwrap();
    assert_eq!(detail.album.title, "Kind of Blue");
    assert_eq!(detail.album.year, Some(1959));
    assert_eq!(detail.tracks.len(), 2);

    let first = &detail.tracks[0];
    assert_eq!(first.id, "t-1");
    assert_eq!(first.track_number, Some(1));
    assert_eq!(first.duration_seconds, 562.0);
    assert!(first.stream_url.is_empty());

    let second = &detail.tracks[1];
    assert_eq!(second.track_number, None);
    assert_eq!(second.artist_name, None);
}

#[test]
fn album_detail_accepts_null_track_list() {
    let json = r#"{"album": {"id": "al-2", "title": "Empty"}, "tracks": null}"#;
    let detail: AlbumDetail = serde_json::from_str(json).unwrap();
    assert!(detail.tracks.is_empty());
}

#[test]
fn page_accepts_null_items() {
    let page: Page<Album> = serde_json::from_str(r#"{"items": null, "total": 0}"#).unwrap();
    assert!(page.items.is_empty());
}

#[test]
fn display_prefers_artist_dash_title() {
    let detail: AlbumDetail = serde_json::from_str(ALBUM_JSON).unwrap();
    assert_eq!(detail.tracks[0].display(), "Miles Davis - So What");
    assert_eq!(detail.tracks[1].display(), "Freddie Freeloader");
}

#[test]
fn quality_summarizes_depth_rate_and_format() {
    let detail: AlbumDetail = serde_json::from_str(ALBUM_JSON).unwrap();
    assert_eq!(detail.tracks[0].quality(), "24bit/96kHz FLAC");
    assert_eq!(detail.tracks[1].quality(), "16bit/44.1kHz MP3");
}
