use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::{PlaybackEngine, RodioDevice};
use crate::config;
use crate::logging;
use crate::player::{Player, Watcher};
use crate::store::StateStore;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let _log_guard = logging::init(&settings);
    info!("spindle starting");

    let mut store = match config::resolve_state_path() {
        Some(path) => StateStore::open(path),
        None => StateStore::in_memory(),
    };
    let dir = startup::choose_directory(env::args().nth(1), &store);

    let device = startup::open_output(RodioDevice::open());
    let no_output = device.unavailable_reason().map(str::to_string);
    let player = Player::new(PlaybackEngine::new(device, settings.audio.initial_volume));

    let mut app = App::new(settings.ui.follow_playback);
    let loaded = startup::prepare(&player, &settings, &mut store, &dir);
    app.set_message(startup::startup_message(loaded, no_output.as_deref()));

    let watcher = Watcher::spawn(
        player.clone(),
        Duration::from_millis(settings.audio.poll_interval_ms),
    )?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(&player);
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &player,
        &mut store,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    watcher.shutdown();
    player.stop();
    player.persist_to(&mut store);
    info!("spindle stopped");

    run_result
}
