use std::env;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::audio::{Output, OutputDevice};
use crate::config;
use crate::error::{DeviceError, ScanError};
use crate::player::Player;
use crate::store::{self, StateStore};

/// Expand a leading `~` to `$HOME`.
pub fn expand_home(input: &str) -> PathBuf {
    expand_tilde(input, env::var_os("HOME").map(PathBuf::from).as_deref())
}

fn expand_tilde(input: &str, home: Option<&Path>) -> PathBuf {
    match (input.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(input),
    }
}

/// Directory to open: the command line argument, else the stored one, else
/// `~/Music`.
pub fn choose_directory(arg: Option<String>, store: &StateStore) -> PathBuf {
    let raw = arg.unwrap_or_else(|| store.get(store::MUSIC_DIRECTORY, "~/Music".to_string()));
    expand_home(&raw)
}

/// Keep going without sound when the device failed to open. The failure is
/// logged here, once.
pub fn open_output<D>(opened: Result<D, DeviceError>) -> Output<D> {
    match opened {
        Ok(device) => Output::Open(device),
        Err(e) => {
            error!("starting without audio output: {e}");
            Output::Unavailable(match e {
                DeviceError::Unavailable(reason) => reason,
                other => other.to_string(),
            })
        }
    }
}

/// Status box text after startup. A missing device outranks whatever the
/// load reported.
pub fn startup_message(loaded: String, no_output: Option<&str>) -> String {
    match no_output {
        Some(reason) => format!("No audio output, playback disabled: {reason}"),
        None => loaded,
    }
}

/// Load `dir` into the player and remember it when it holds any tracks.
pub fn open_directory<D: OutputDevice>(
    player: &Player<D>,
    settings: &config::Settings,
    store: &mut StateStore,
    dir: &Path,
) -> Result<usize, ScanError> {
    let count = player.load_directory(dir, &settings.library, settings.playback.shuffle)?;
    if count > 0 {
        if let Some(root) = player.status().directory {
            if let Err(e) = store.set(store::MUSIC_DIRECTORY, root.display().to_string()) {
                warn!("failed to persist music directory: {e}");
            }
        }
    }
    Ok(count)
}

/// Seed the volume, load `dir`, put the last played track back under the
/// cursor and autoplay. Returns the message for the status box.
pub fn prepare<D: OutputDevice>(
    player: &Player<D>,
    settings: &config::Settings,
    store: &mut StateStore,
    dir: &Path,
) -> String {
    player.seed_from(store, settings.audio.initial_volume);

    let count = match open_directory(player, settings, store, dir) {
        Ok(0) => return format!("No audio files in {}", dir.display()),
        Ok(n) => n,
        Err(e) => {
            warn!("startup scan failed: {e}");
            return e.to_string();
        }
    };

    if let Some(last) = store.get::<Option<String>>(store::LAST_PLAYED, None) {
        player.restore_last_played(Path::new(&last));
    }

    if !settings.playback.autoplay {
        return format!("Loaded {count} tracks");
    }
    match player.play_current() {
        Ok(track) => {
            info!("autoplay: {}", track.name);
            format!("Playing: {}", track.name)
        }
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::FakeDevice;
    use crate::audio::{PlaybackEngine, Toggle, Transport};
    use std::fs;

    fn player() -> (Player<FakeDevice>, FakeDevice) {
        let device = FakeDevice::new();
        (Player::new(PlaybackEngine::new(device.clone(), 0.5)), device)
    }

    #[test]
    fn tilde_expands_only_at_the_start() {
        let home = Some(Path::new("/home/me"));
        assert_eq!(expand_tilde("~", home), PathBuf::from("/home/me"));
        assert_eq!(expand_tilde("~/Music", home), PathBuf::from("/home/me/Music"));
        assert_eq!(expand_tilde("/srv/~x", home), PathBuf::from("/srv/~x"));
        assert_eq!(expand_tilde("~other", home), PathBuf::from("~other"));
        assert_eq!(expand_tilde("~/Music", None), PathBuf::from("~/Music"));
    }

    #[test]
    fn argument_beats_stored_directory() {
        let mut store = StateStore::in_memory();
        store.set(store::MUSIC_DIRECTORY, "/stored").unwrap();
        assert_eq!(
            choose_directory(Some("/arg".into()), &store),
            PathBuf::from("/arg")
        );
        assert_eq!(choose_directory(None, &store), PathBuf::from("/stored"));
    }

    #[test]
    fn prepare_restores_last_played_and_autoplays() {
        let music = tempfile::tempdir().unwrap();
        for name in ["a.mp3", "b.ogg", "c.flac"] {
            fs::write(music.path().join(name), b"fake audio").unwrap();
        }
        let root = music.path().canonicalize().unwrap();
        let last = root.join("b.ogg");

        let mut store = StateStore::in_memory();
        store.set(store::VOLUME, 0.3f32).unwrap();
        store.set(store::LAST_PLAYED, last.display().to_string()).unwrap();

        let (player, device) = player();
        let msg = prepare(&player, &config::Settings::default(), &mut store, music.path());

        assert_eq!(msg, "Playing: b.ogg");
        assert_eq!(device.loads(), vec![last]);
        assert_eq!(player.status().transport, Transport::Playing);
        assert!((player.volume() - 0.3).abs() < 1e-6);
        assert_eq!(
            store.get(store::MUSIC_DIRECTORY, String::new()),
            root.display().to_string()
        );
    }

    #[test]
    fn prepare_reports_missing_directory() {
        let mut store = StateStore::in_memory();
        let (player, device) = player();
        let msg = prepare(
            &player,
            &config::Settings::default(),
            &mut store,
            Path::new("/definitely/not/here"),
        );
        assert!(msg.starts_with("directory not found"));
        assert!(device.loads().is_empty());
        assert_eq!(store.get::<Option<String>>(store::MUSIC_DIRECTORY, None), None);
    }

    #[test]
    fn prepare_without_autoplay_stays_stopped() {
        let music = tempfile::tempdir().unwrap();
        fs::write(music.path().join("a.wav"), b"fake audio").unwrap();
        let mut settings = config::Settings::default();
        settings.playback.autoplay = false;

        let mut store = StateStore::in_memory();
        let (player, device) = player();
        let msg = prepare(&player, &settings, &mut store, music.path());

        assert_eq!(msg, "Loaded 1 tracks");
        assert!(device.loads().is_empty());
        assert_eq!(player.status().transport, Transport::Stopped);
    }

    #[test]
    fn missing_output_keeps_the_player_usable() {
        let music = tempfile::tempdir().unwrap();
        fs::write(music.path().join("a.mp3"), b"fake audio").unwrap();

        let device =
            open_output::<FakeDevice>(Err(DeviceError::Unavailable("no sound card".into())));
        assert_eq!(device.unavailable_reason(), Some("no sound card"));
        let player = Player::new(PlaybackEngine::new(device, 0.5));

        let mut store = StateStore::in_memory();
        let msg = prepare(&player, &config::Settings::default(), &mut store, music.path());
        assert_eq!(msg, "audio output unavailable: no sound card");
        assert_eq!(
            startup_message(msg, Some("no sound card")),
            "No audio output, playback disabled: no sound card"
        );

        assert_eq!(player.size(), 1);
        assert_eq!(player.status().transport, Transport::Stopped);
        assert!(player.status().loaded.is_none());
        assert_eq!(player.toggle_play_pause(), Toggle::NoTrack);
        assert!(player.play_current().is_err());

        assert!((player.increase_volume(0.1) - 0.6).abs() < 1e-6);
        assert!(player.toggle_mute());
        assert!(!player.toggle_mute());
        assert!((player.volume() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn opened_output_passes_through() {
        let fake = FakeDevice::new();
        let device = open_output(Ok(fake.clone()));
        assert!(device.unavailable_reason().is_none());
        assert_eq!(startup_message("Loaded 3 tracks".into(), None), "Loaded 3 tracks");

        let music = tempfile::tempdir().unwrap();
        fs::write(music.path().join("a.mp3"), b"fake audio").unwrap();
        let player = Player::new(PlaybackEngine::new(device, 0.5));
        let mut store = StateStore::in_memory();
        let msg = prepare(&player, &config::Settings::default(), &mut store, music.path());
        assert_eq!(msg, "Playing: a.mp3");
        assert_eq!(fake.loads().len(), 1);
    }
}
