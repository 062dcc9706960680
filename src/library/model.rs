use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// An audio file discovered by a scan.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Track {
    pub path: PathBuf,
    /// File name used for display.
    pub name: String,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The result of scanning one directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub root: PathBuf,
    pub tracks: Vec<Track>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// True when the directory existed but held no matching files.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// File details shown in the track info popup.
#[derive(Debug, Clone)]
pub struct TrackDetails {
    pub name: String,
    pub extension: Option<String>,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}
