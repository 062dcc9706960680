use std::fs;
use std::path::Path;

use lofty::prelude::*;
use tracing::debug;

use super::model::TrackDetails;

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Read file details for `path`, probing tags when the format allows it.
///
/// Returns `None` when the file cannot be stat'ed.
pub fn details(path: &Path) -> Option<TrackDetails> {
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            debug!("no details for {}: {e}", path.display());
            return None;
        }
    };

    let mut out = TrackDetails {
        name: path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string(),
        extension: path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase()),
        size: meta.len(),
        modified: meta.modified().ok(),
        title: None,
        artist: None,
        album: None,
        duration: None,
    };

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            out.duration = Some(tagged.properties().duration());
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                out.title = non_empty(tag.title());
                out.artist = non_empty(tag.artist());
                out.album = non_empty(tag.album());
            }
        }
        Err(e) => debug!("cannot probe tags of {}: {e}", path.display()),
    }

    Some(out)
}
