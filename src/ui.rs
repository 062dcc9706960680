//! UI rendering for the terminal front-end.
//!
//! Everything here is a pure function of `App`, a `PlayerStatus` snapshot
//! and the play order names; nothing touches the player.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::{Duration, SystemTime};

use crate::app::App;
use crate::audio::Transport;
use crate::config::UiSettings;
use crate::library::TrackDetails;
use crate::player::PlayerStatus;

const CONTROLS: &[(&str, &str)] = &[
    ("space", "play/pause"),
    ("n/l", "next"),
    ("p/h", "prev"),
    ("x", "stop"),
    ("m", "mute"),
    ("+/-", "volume"),
    ("s", "reshuffle"),
    ("o", "in order"),
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected"),
    ("d", "directory"),
    ("K", "details"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

/// Rough age of a timestamp, e.g. `3d ago`.
fn format_age(t: SystemTime, now: SystemTime) -> String {
    let Ok(age) = now.duration_since(t) else {
        return "just now".to_string();
    };
    let secs = age.as_secs();
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86400 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86400),
    }
}

fn volume_text(status: &PlayerStatus) -> String {
    let pct = (status.volume * 100.0).round() as u32;
    if status.muted {
        format!("Volume: {pct}% (muted)")
    } else {
        format!("Volume: {pct}%")
    }
}

fn status_text(app: &App, status: &PlayerStatus) -> String {
    let mut parts: Vec<String> = Vec::new();

    let transport = match status.transport {
        Transport::Playing => "Playing",
        Transport::Paused => "Paused",
        Transport::Stopped => "Stopped",
    };
    parts.push(format!(" {transport}"));

    if let Some(track) = &status.loaded {
        match status.position {
            Some(p) if status.current.as_ref() == Some(track) => {
                parts.push(format!("{} [{}/{}]", track.name, p + 1, status.total))
            }
            _ => parts.push(track.name.clone()),
        }
    }

    parts.push(volume_text(status));

    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }

    if let Some(dir) = &status.directory {
        parts.push(format!("Dir: {}", dir.display()));
    }

    if let Some(msg) = &app.message {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn details_text(details: Option<&TrackDetails>) -> String {
    let Some(d) = details else {
        return "No details available".to_string();
    };
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    format!(
        "File: {}\nType: {}\nSize: {}\nModified: {}\nTitle: {}\nArtist: {}\nAlbum: {}\nDuration: {}",
        d.name,
        or_dash(&d.extension),
        format_size(d.size),
        d.modified
            .map(|m| format_age(m, SystemTime::now()))
            .unwrap_or_else(|| "-".to_string()),
        or_dash(&d.title),
        or_dash(&d.artist),
        or_dash(&d.album),
        d.duration.map(format_mmss).unwrap_or_else(|| "-".to_string()),
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

/// First visible row so that `selected` sits mid-window when possible.
fn window_start(selected: usize, total: usize, height: usize) -> usize {
    if total <= height || height == 0 {
        return 0;
    }
    let half = height / 2;
    selected.saturating_sub(half).min(total - height)
}

fn padded_left() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the whole UI.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    status: &PlayerStatus,
    tracks: &[String],
    ui_settings: &UiSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" spindle ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app, status))
        .block(Block::bordered().padding(padded_left()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Only the visible window is turned into list items.
    {
        let total = tracks.len();
        let height = chunks[2].height.saturating_sub(2) as usize;
        let start = window_start(app.selected, total, height);
        let end = (start + height.max(1)).min(total);

        let playing = status.position;
        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, name)| {
                let item = ListItem::new(name.as_str());
                if playing == Some(start + offset) && status.loaded.is_some() {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let title = format!(" play order ({total}) ");
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(app.selected - start));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(details_text(app.details.as_ref()))
            .block(
                Block::default()
                    .padding(padded_left())
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }

    // The prompt takes over the footer while it is open.
    let footer = match &app.prompt {
        Some(input) => Paragraph::new(format!("{input}_")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" directory (enter loads, esc cancels) ")
                .padding(padded_left()),
        ),
        None => Paragraph::new(controls_text())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" controls ")
                    .padding(padded_left()),
            )
            .wrap(Wrap { trim: true }),
    };
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Track;
    use std::path::PathBuf;

    #[test]
    fn window_keeps_selection_centered_and_in_bounds() {
        assert_eq!(window_start(3, 5, 10), 0);
        assert_eq!(window_start(0, 100, 10), 0);
        assert_eq!(window_start(50, 100, 10), 45);
        assert_eq!(window_start(99, 100, 10), 90);
    }

    #[test]
    fn sizes_and_ages_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");

        let now = SystemTime::now();
        assert_eq!(format_age(now, now), "just now");
        assert_eq!(format_age(now - Duration::from_secs(120), now), "2m ago");
        assert_eq!(format_age(now - Duration::from_secs(7200), now), "2h ago");
        assert_eq!(format_age(now - Duration::from_secs(3 * 86400), now), "3d ago");
        assert_eq!(format_mmss(Duration::from_secs(125)), "02:05");
    }

    fn stopped() -> PlayerStatus {
        PlayerStatus {
            transport: Transport::Stopped,
            loaded: None,
            active: false,
            volume: 0.55,
            muted: false,
            current: None,
            position: None,
            total: 0,
            directory: None,
        }
    }

    #[test]
    fn volume_text_marks_mute() {
        let mut status = stopped();
        assert_eq!(volume_text(&status), "Volume: 55%");
        status.muted = true;
        assert_eq!(volume_text(&status), "Volume: 55% (muted)");
    }

    #[test]
    fn position_shown_only_for_the_track_under_the_cursor() {
        let a = Track::new(PathBuf::from("/music/a.mp3"));
        let b = Track::new(PathBuf::from("/music/b.mp3"));
        let app = App::new(true);
        let mut status = PlayerStatus {
            transport: Transport::Playing,
            loaded: Some(a.clone()),
            current: Some(a),
            position: Some(1),
            total: 3,
            ..stopped()
        };
        assert!(status_text(&app, &status).contains("a.mp3 [2/3]"));

        status.current = Some(b);
        let text = status_text(&app, &status);
        assert!(text.contains("a.mp3"));
        assert!(!text.contains("[2/3]"));
    }
}
