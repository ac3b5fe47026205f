//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the engine's published state with `ratatui`: a
//! header, the status box, the queue list, an optional track detail popup
//! and the controls footer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::App;
use crate::audio::{PlaybackPhase, PlayerState, Queue};
use crate::config::{ControlsSettings, Settings, TimeField, UiSettings};
use crate::library::Track;

/// Render the controls help text, incorporating step sizes.
fn controls_text(controls: &ControlsSettings) -> String {
    let seek = format_step(controls.seek_seconds);
    let volume = (controls.volume_step * 100.0).round() as u32;
    [
        "[j/k] up/down".to_string(),
        "[enter] play selected".to_string(),
        "[space] play/pause".to_string(),
        format!("[←/→] seek -/+{seek}s"),
        "[shift+←/→ | p/n] prev/next".to_string(),
        format!("[↑/↓] volume ±{volume}%"),
        "[m] mute".to_string(),
        "[x] stop".to_string(),
        "[C] clear queue".to_string(),
        "[K] details".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn format_step(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as u64)
    } else {
        format!("{seconds:.1}")
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn seconds(s: f64) -> Duration {
    if s.is_finite() && s > 0.0 {
        Duration::from_secs_f64(s)
    } else {
        Duration::ZERO
    }
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(elapsed)),
            TimeField::Total => total.map(format_mmss),
            TimeField::Remaining => total.map(|t| format!("-{}", format_mmss(t.saturating_sub(elapsed)))),
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn phase_text(phase: PlaybackPhase, state: &PlayerState) -> &'static str {
    match phase {
        PlaybackPhase::Loading => "Loading",
        PlaybackPhase::Playing => "Playing",
        PlaybackPhase::Paused => "Paused",
        // A track without a session is one whose load failed.
        PlaybackPhase::Idle if state.current_track.is_some() => "Load failed",
        PlaybackPhase::Idle => "Stopped",
    }
}

fn volume_text(state: &PlayerState) -> String {
    if state.is_muted {
        "VOL: muted".to_string()
    } else {
        format!("VOL: {}%", (state.volume * 100.0).round() as u32)
    }
}

fn status_text(state: &PlayerState, phase: PlaybackPhase, queue: &Queue, app: &App, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    if app.follow_playback {
        parts.push(" CURSOR: Follow".to_string());
    } else {
        parts.push(" CURSOR: Free-roam".to_string());
    }

    if let Some(track) = &state.current_track {
        let total = (state.duration > 0.0).then(|| seconds(state.duration));
        match now_playing_time_text(seconds(state.current_time), total, ui) {
            Some(time) => parts.push(format!("Song: {} [{}]", track.display(), time)),
            None => parts.push(format!("Song: {}", track.display())),
        }
    }
    parts.push(phase_text(phase, state).to_string());
    parts.push(volume_text(state));

    match queue.cursor() {
        Some(i) => parts.push(format!("QUEUE: {}/{}", i + 1, queue.len())),
        None if !queue.is_empty() => parts.push(format!("QUEUE: -/{}", queue.len())),
        None => {}
    }

    parts.join(" • ")
}

fn track_details(track: &Track) -> String {
    let number = match track.track_number {
        Some(n) => format!("{}-{n}", track.disc_number),
        None => "-".to_string(),
    };
    format!(
        "Title: {}\nArtist: {}\nAlbum: {} ({})\nTrack: {}\nDuration: {}\nQuality: {}, {}ch{}\nId: {}",
        track.title,
        track.artist_name.as_deref().unwrap_or("-"),
        track.album_title.as_deref().unwrap_or("-"),
        track.album_id,
        number,
        format_mmss(seconds(track.duration_seconds)),
        track.quality(),
        track.channels,
        track.bitrate.map(|b| format!(", {} kbps", b / 1000)).unwrap_or_default(),
        track.id,
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    state: &PlayerState,
    phase: PlaybackPhase,
    queue: &Queue,
    settings: &Settings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = status_text(state, phase, queue, app, &settings.ui);
    let mut status_par = Paragraph::new(status)
        .block(Block::bordered().padding(left_padded()).title(" status "))
        .wrap(Wrap { trim: true });
    if phase == PlaybackPhase::Loading {
        status_par = status_par.slow_blink();
    }
    frame.render_widget(status_par, chunks[1]);

    // Queue list, windowed around the selection.
    {
        let tracks = queue.tracks();
        let total = tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let marker = if queue.cursor() == Some(start + offset) {
                    "♪ "
                } else {
                    "  "
                };
                let length = format_mmss(seconds(track.duration_seconds));
                ListItem::new(format!("{marker}{} ({length})", track.display()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" queue "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if total > 0 {
            list_state.select(Some(sel - start));
        }
        frame.render_stateful_widget(list, chunks[2], &mut list_state);
    }

    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 9, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let details = match queue.tracks().get(app.selected).or(state.current_track.as_ref()) {
            Some(track) => track_details(track),
            None => "No track selected".to_string(),
        };
        let popup = Paragraph::new(details)
            .block(
                Block::default()
                    .padding(left_padded())
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }

    let footer = Paragraph::new(controls_text(&settings.controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_text_follows_configured_fields() {
        let ui = UiSettings {
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total, TimeField::Remaining],
            ..UiSettings::default()
        };
        let text = now_playing_time_text(Duration::from_secs(65), Some(Duration::from_secs(200)), &ui);
        assert_eq!(text.as_deref(), Some("01:05 / 03:20 / -02:15"));

        // Unknown total drops the fields that need it.
        let text = now_playing_time_text(Duration::from_secs(5), None, &ui);
        assert_eq!(text.as_deref(), Some("00:05"));
    }

    #[test]
    fn volume_and_phase_labels() {
        let mut state = PlayerState::with_volume(0.37);
        assert_eq!(volume_text(&state), "VOL: 37%");
        state.is_muted = true;
        assert_eq!(volume_text(&state), "VOL: muted");

        assert_eq!(phase_text(PlaybackPhase::Idle, &state), "Stopped");
        state.current_track = Some(crate::audio::testing::track("t", 1.0));
        assert_eq!(phase_text(PlaybackPhase::Idle, &state), "Load failed");
    }

    #[test]
    fn controls_mention_step_sizes() {
        let text = controls_text(&ControlsSettings::default());
        assert!(text.contains("seek -/+10s"));
        assert!(text.contains("volume ±5%"));
    }
}
