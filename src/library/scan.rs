use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::ScanError;

use super::model::{Catalog, Track};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Walk `dir` and collect every audio file it contains.
///
/// Tracks come back in traversal order with absolute paths. A path that is
/// not a directory is an error; a directory without matches is an empty
/// catalog.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Catalog, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
    }
    let root = fs::canonicalize(dir).map_err(|_| ScanError::DirectoryNotFound(dir.to_path_buf()))?;

    let mut walker = WalkDir::new(&root).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                None
            }
        })
    {
        let path = entry.path();
        if path.is_file() && is_audio_file(path, settings) {
            tracks.push(Track::new(path));
        }
    }

    info!("found {} audio files in {}", tracks.len(), root.display());
    Ok(Catalog { root, tracks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(catalog: &Catalog) -> Vec<String> {
        let mut v: Vec<String> = catalog.tracks.iter().map(|t| t.name.clone()).collect();
        v.sort();
        v
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.M4a"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_nonexistent_directory_is_an_error() {
        let err = scan(
            Path::new("/nonexistent/spindle-test-dir"),
            &LibrarySettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound(_)));
    }

    #[test]
    fn scan_file_instead_of_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("song.mp3");
        fs::write(&file, b"not real").unwrap();

        assert!(scan(&file, &LibrarySettings::default()).is_err());
    }

    #[test]
    fn scan_empty_directory_returns_empty_catalog() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

        let catalog = scan(dir.path(), &LibrarySettings::default()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn scan_filters_non_audio_and_returns_absolute_paths() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let catalog = scan(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(names(&catalog), vec!["A.ogg", "b.MP3"]);
        assert!(catalog.tracks.iter().all(|t| t.path.is_absolute()));
        assert!(catalog.root.is_absolute());
    }

    #[test]
    fn scan_recurses_into_subdirectories() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("artist").join("album");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.path().join("root.flac"), b"not real").unwrap();
        fs::write(sub.join("deep.wav"), b"not real").unwrap();

        let catalog = scan(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(names(&catalog), vec!["deep.wav", "root.flac"]);
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let catalog = scan(dir.path(), &settings).unwrap();
        assert_eq!(names(&catalog), vec!["visible.mp3"]);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let catalog = scan(dir.path(), &settings).unwrap();
        assert_eq!(names(&catalog), vec!["root.mp3"]);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let catalog = scan(dir.path(), &settings).unwrap();
        assert_eq!(names(&catalog), vec!["one.mp3", "root.mp3"]);
    }
}
