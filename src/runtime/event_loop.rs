use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::App;
use crate::audio::{OutputDevice, Toggle};
use crate::config;
use crate::library;
use crate::player::{Player, PlayerStatus};
use crate::runtime::startup;
use crate::store::{self, StateStore};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last loaded track written to the store.
    last_played: Option<PathBuf>,
}

impl EventLoopState {
    pub fn new<D: OutputDevice>(player: &Player<D>) -> Self {
        Self {
            pending_gg: false,
            last_played: player.status().loaded.map(|t| t.path),
        }
    }
}

/// Main terminal event loop: syncs the view with the player, draws and
/// handles input. Returns `Ok(())` when the user quits.
pub fn run<D: OutputDevice>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &Player<D>,
    store: &mut StateStore,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let status = player.status();
        let tracks = player.play_order_names();
        sync(app, player, store, state, &status, tracks.len());

        terminal.draw(|f| ui::draw(f, app, &status, &tracks, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, store, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Pull watcher-driven changes into the view and the store.
fn sync<D: OutputDevice>(
    app: &mut App,
    player: &Player<D>,
    store: &mut StateStore,
    state: &mut EventLoopState,
    status: &PlayerStatus,
    len: usize,
) {
    app.set_len(len);

    if app.follow_playback && app.prompt.is_none() && status.loaded.is_some() {
        if let Some(pos) = status.position {
            if app.selected != pos {
                app.set_selected(pos);
            }
        }
    }

    let loaded = status.loaded.as_ref().map(|t| &t.path);
    if loaded != state.last_played.as_ref() {
        if let Some(path) = loaded {
            if let Err(e) = store.set(store::LAST_PLAYED, path.display().to_string()) {
                warn!("failed to persist last played track: {e}");
            }
        }
        state.last_played = loaded.cloned();
    }

    if app.metadata_window {
        let path = player.track_at(app.selected).map(|t| t.path);
        if app.details_stale(path.as_deref()) {
            let details = path.as_deref().and_then(library::details);
            app.set_details(path, details);
        }
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key_event<D: OutputDevice>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &Player<D>,
    store: &mut StateStore,
    state: &mut EventLoopState,
) -> bool {
    if app.prompt.is_some() {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => {
                if let Some(input) = app.submit_prompt() {
                    load_directory(&input, settings, app, player, store);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(' ') => {
            app.follow_playback_on();
            let msg = match player.toggle_play_pause() {
                Toggle::Paused => "Paused",
                Toggle::Playing => "Playing",
                Toggle::NoTrack => "No track loaded",
            };
            app.set_message(msg);
        }
        KeyCode::Char('n') | KeyCode::Char('l') => {
            app.follow_playback_on();
            report(app, player.play_next().map(|t| format!("Playing: {}", t.name)));
        }
        KeyCode::Char('p') | KeyCode::Char('h') => {
            app.follow_playback_on();
            report(app, player.play_previous().map(|t| format!("Playing: {}", t.name)));
        }
        KeyCode::Char('x') => {
            player.stop();
            app.set_message("Stopped");
        }
        KeyCode::Char('m') => {
            let msg = if player.toggle_mute() { "Muted" } else { "Unmuted" };
            app.set_message(msg);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = player.increase_volume(settings.audio.volume_step);
            player.persist_volume(store);
            app.set_message(format!("Volume: {}%", (v * 100.0).round() as u32));
        }
        KeyCode::Char('-') => {
            let v = player.decrease_volume(settings.audio.volume_step);
            player.persist_volume(store);
            app.set_message(format!("Volume: {}%", (v * 100.0).round() as u32));
        }
        KeyCode::Char('s') => {
            app.follow_playback_on();
            app.select_first();
            report(
                app,
                player
                    .shuffle_and_play()
                    .map(|t| format!("Reshuffled, playing: {}", t.name)),
            );
        }
        KeyCode::Char('o') => {
            app.follow_playback_on();
            report(
                app,
                player
                    .restore_natural_order()
                    .map(|()| "Playing in directory order".to_string()),
            );
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            if app.has_tracks() {
                app.follow_playback_on();
                let played = player.play_at(app.selected);
                report(app, played.map(|t| format!("Playing: {}", t.name)));
            }
        }
        KeyCode::Char('d') => {
            let current = player
                .status()
                .directory
                .map(|d| d.display().to_string())
                .unwrap_or_default();
            app.open_prompt(current);
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}

fn report<E: std::fmt::Display>(app: &mut App, result: Result<String, E>) {
    match result {
        Ok(msg) => app.set_message(msg),
        Err(e) => app.set_message(e.to_string()),
    }
}

fn load_directory<D: OutputDevice>(
    input: &str,
    settings: &config::Settings,
    app: &mut App,
    player: &Player<D>,
    store: &mut StateStore,
) {
    let dir = startup::expand_home(input);
    match startup::open_directory(player, settings, store, &dir) {
        Ok(0) => app.set_message(format!("No audio files in {}", dir.display())),
        Ok(count) => {
            app.follow_playback_on();
            app.select_first();
            let msg = match player.play_current() {
                Ok(t) => format!("Loaded {count} tracks, playing: {}", t.name),
                Err(e) => format!("Loaded {count} tracks: {e}"),
            };
            app.set_message(msg);
        }
        Err(e) => app.set_message(e.to_string()),
    }
}
