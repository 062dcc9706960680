//! The shared player: one lock around the playback engine and the playlist.
//!
//! Front-ends and the auto-advance watcher both go through `Player`, so
//! every command and every watcher decision is serialized on the same
//! mutex.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::audio::{OutputDevice, PlaybackEngine, Toggle, Transport};
use crate::config::LibrarySettings;
use crate::error::{CommandError, CursorError, PlaybackError, ScanError};
use crate::library::{self, Catalog, Track};
use crate::playlist::PlaylistCursor;
use crate::store::{self, StateStore};

mod watcher;

pub use watcher::{Watcher, advance_if_finished};

/// State guarded by the player lock.
pub struct Session<D> {
    pub engine: PlaybackEngine<D>,
    pub cursor: PlaylistCursor,
    pub directory: Option<PathBuf>,
}

/// Snapshot of the player for front-ends.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub transport: Transport,
    pub loaded: Option<Track>,
    pub active: bool,
    pub volume: f32,
    pub muted: bool,
    /// Track under the cursor; differs from `loaded` after a scan or a
    /// failed advance.
    pub current: Option<Track>,
    pub position: Option<usize>,
    pub total: usize,
    pub directory: Option<PathBuf>,
}

pub struct Player<D> {
    session: Arc<Mutex<Session<D>>>,
}

impl<D> Clone for Player<D> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<D: OutputDevice> Player<D> {
    pub fn new(engine: PlaybackEngine<D>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                engine,
                cursor: PlaylistCursor::new(),
                directory: None,
            })),
        }
    }

    /// Lock the session. A poisoned lock is recovered: no operation leaves
    /// the session half-updated.
    pub fn lock(&self) -> MutexGuard<'_, Session<D>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- catalog ---

    /// Scan `dir` and replace the playlist with its tracks.
    ///
    /// The walk runs without the lock; the swap is atomic. The play order is
    /// left empty; see `load_directory` for a ready-to-play playlist.
    pub fn scan(&self, dir: &Path, settings: &LibrarySettings) -> Result<usize, ScanError> {
        let catalog = library::scan(dir, settings)?;
        Ok(self.install(catalog, |_| {}))
    }

    /// Scan `dir` and prepare the play order, shuffled or in scan order.
    pub fn load_directory(
        &self,
        dir: &Path,
        settings: &LibrarySettings,
        shuffle: bool,
    ) -> Result<usize, ScanError> {
        let catalog = library::scan(dir, settings)?;
        let count = self.install(catalog, |cursor| {
            let _ = if shuffle {
                cursor.shuffle()
            } else {
                cursor.restore_natural_order()
            };
        });
        info!("loaded {count} tracks from {}", dir.display());
        Ok(count)
    }

    fn install(&self, catalog: Catalog, arrange: impl FnOnce(&mut PlaylistCursor)) -> usize {
        let count = catalog.len();
        let mut s = self.lock();
        s.cursor.load(catalog.tracks);
        if count > 0 {
            arrange(&mut s.cursor);
        }
        s.directory = Some(catalog.root);
        count
    }

    // --- cursor ---

    pub fn shuffle(&self) -> Result<(), CursorError> {
        self.lock().cursor.shuffle()
    }

    pub fn restore_natural_order(&self) -> Result<(), CursorError> {
        self.lock().cursor.restore_natural_order()
    }

    pub fn next(&self) -> Option<Track> {
        self.lock().cursor.next().cloned()
    }

    pub fn previous(&self) -> Option<Track> {
        self.lock().cursor.previous().cloned()
    }

    pub fn current(&self) -> Option<Track> {
        self.lock().cursor.current().cloned()
    }

    pub fn jump_to(&self, index: usize) -> Result<Track, CursorError> {
        self.lock().cursor.jump_to(index).cloned()
    }

    pub fn size(&self) -> usize {
        self.lock().cursor.size()
    }

    /// Display names in play order.
    pub fn play_order_names(&self) -> Vec<String> {
        self.lock().cursor.play_order().map(|t| t.name.clone()).collect()
    }

    /// Track at `index` in the play order.
    pub fn track_at(&self, index: usize) -> Option<Track> {
        self.lock().cursor.play_order().nth(index).cloned()
    }

    // --- engine ---

    pub fn play(&self, track: Track) -> Result<(), PlaybackError> {
        self.lock().engine.play(track)
    }

    pub fn pause(&self) -> Result<(), PlaybackError> {
        self.lock().engine.pause()
    }

    pub fn unpause(&self) -> Result<(), PlaybackError> {
        self.lock().engine.unpause()
    }

    pub fn toggle_play_pause(&self) -> Toggle {
        self.lock().engine.toggle_play_pause()
    }

    pub fn stop(&self) {
        self.lock().engine.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.lock().engine.is_playing()
    }

    pub fn is_muted(&self) -> bool {
        self.lock().engine.is_muted()
    }

    pub fn volume(&self) -> f32 {
        self.lock().engine.volume()
    }

    pub fn set_volume(&self, volume: f32) -> f32 {
        self.lock().engine.set_volume(volume)
    }

    pub fn increase_volume(&self, step: f32) -> f32 {
        self.lock().engine.increase_volume(step)
    }

    pub fn decrease_volume(&self, step: f32) -> f32 {
        self.lock().engine.decrease_volume(step)
    }

    pub fn toggle_mute(&self) -> bool {
        self.lock().engine.toggle_mute()
    }

    // --- composite commands ---

    /// Play the cursor's current track.
    pub fn play_current(&self) -> Result<Track, PlaybackError> {
        let mut s = self.lock();
        let track = s.cursor.current().cloned().ok_or(PlaybackError::NothingLoaded)?;
        s.engine.play(track.clone())?;
        Ok(track)
    }

    /// Advance the cursor and play the new current track.
    pub fn play_next(&self) -> Result<Track, PlaybackError> {
        let mut s = self.lock();
        let track = s.cursor.next().cloned().ok_or(PlaybackError::NothingLoaded)?;
        s.engine.play(track.clone())?;
        Ok(track)
    }

    /// Step the cursor back and play the new current track.
    pub fn play_previous(&self) -> Result<Track, PlaybackError> {
        let mut s = self.lock();
        let track = s
            .cursor
            .previous()
            .cloned()
            .ok_or(PlaybackError::NothingLoaded)?;
        s.engine.play(track.clone())?;
        Ok(track)
    }

    /// Jump to `index` in the play order and play that track.
    pub fn play_at(&self, index: usize) -> Result<Track, CommandError> {
        let mut s = self.lock();
        let track = s.cursor.jump_to(index)?.clone();
        s.engine.play(track.clone())?;
        Ok(track)
    }

    /// Reshuffle and start the first track of the new order.
    pub fn shuffle_and_play(&self) -> Result<Track, CommandError> {
        let mut s = self.lock();
        s.cursor.shuffle()?;
        let track = s.cursor.current().cloned().ok_or(CursorError::Empty)?;
        s.engine.play(track.clone())?;
        Ok(track)
    }

    /// Make the track at `path` current if it is in the playlist.
    pub fn restore_last_played(&self, path: &Path) -> bool {
        let mut s = self.lock();
        match s.cursor.locate(path) {
            Some(idx) => {
                let _ = s.cursor.jump_to(idx);
                info!("restored last played track {}", path.display());
                true
            }
            None => false,
        }
    }

    pub fn status(&self) -> PlayerStatus {
        let s = self.lock();
        PlayerStatus {
            transport: s.engine.transport(),
            loaded: s.engine.loaded_track().cloned(),
            active: s.engine.is_playing(),
            volume: s.engine.volume(),
            muted: s.engine.is_muted(),
            current: s.cursor.current().cloned(),
            position: s.cursor.position(),
            total: s.cursor.size(),
            directory: s.directory.clone(),
        }
    }

    // --- persisted state ---

    /// Seed the volume from the store.
    pub fn seed_from(&self, store: &StateStore, default_volume: f32) -> f32 {
        let volume = store.get(store::VOLUME, default_volume);
        self.set_volume(volume)
    }

    pub fn persist_volume(&self, store: &mut StateStore) {
        if let Err(e) = store.set(store::VOLUME, round_volume(self.volume())) {
            warn!("failed to persist volume: {e}");
        }
    }

    /// Write volume, directory and last played track to the store.
    pub fn persist_to(&self, store: &mut StateStore) {
        let status = self.status();
        let mut result = store.set(store::VOLUME, round_volume(status.volume));
        if let Some(dir) = status.directory {
            result = result.and(store.set(store::MUSIC_DIRECTORY, dir.display().to_string()));
        }
        if let Some(track) = status.loaded {
            result = result.and(store.set(store::LAST_PLAYED, track.path.display().to_string()));
        }
        if let Err(e) = result {
            warn!("failed to persist player state: {e}");
        }
    }
}

/// Two decimals are plenty for a persisted volume.
fn round_volume(v: f32) -> f64 {
    (f64::from(v) * 100.0).round() / 100.0
}
