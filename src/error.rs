//! Error types shared by the player core.
//!
//! Every core operation reports failure through one of these enums; the
//! `Display` text doubles as the human-readable reason front-ends show.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Directory scan errors.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The path does not exist or is not a directory.
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
}

/// Playlist cursor errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    /// No tracks are loaded.
    #[error("playlist is empty")]
    Empty,

    /// `jump_to` was given an index past the end of the play order.
    #[error("track index {index} out of range (playlist has {len} tracks)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Output device errors.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The audio output could not be initialized at all.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but could not be decoded.
    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("nothing loaded")]
    NothingLoaded,
}

/// Playback engine errors.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("file not found: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("unsupported format: {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("no track loaded")]
    NothingLoaded,

    #[error("nothing is playing")]
    NotPlaying,

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Persisted state store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O: {0}")]
    Io(#[from] io::Error),

    #[error("state file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize state value: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Composite player commands fail either on the cursor or on playback.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}
