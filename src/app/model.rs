//! Front-end view state: `App`.
//!
//! The player owns playback and the playlist; `App` only holds what the
//! terminal needs on top of that: the list selection, popups, the directory
//! prompt and the last command message.

use std::path::{Path, PathBuf};

use crate::library::TrackDetails;

/// The terminal view model.
#[derive(Debug, Default)]
pub struct App {
    /// Selected row, an index into the play order.
    pub selected: usize,
    /// Number of rows in the play order list.
    pub len: usize,

    pub follow_playback: bool,

    pub metadata_window: bool,
    /// Details of the selected track, loaded when the popup opens.
    pub details: Option<TrackDetails>,
    details_for: Option<PathBuf>,

    /// Directory prompt input, `Some` while the prompt is open.
    pub prompt: Option<String>,
    /// Result of the last command, shown in the status box.
    pub message: Option<String>,
}

impl App {
    pub fn new(follow_playback: bool) -> Self {
        Self {
            follow_playback,
            ..Self::default()
        }
    }

    /// Update the row count after the play order changed; keeps the
    /// selection inside the list.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn has_tracks(&self) -> bool {
        self.len > 0
    }

    /// Select `idx`, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.len.saturating_sub(1));
    }

    /// Move selection down, wrapping to the top.
    pub fn next(&mut self) {
        if self.len > 0 {
            self.selected = (self.selected + 1) % self.len;
        }
    }

    /// Move selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.len > 0 {
            self.selected = match self.selected {
                0 => self.len - 1,
                s => s - 1,
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
        if !self.metadata_window {
            self.invalidate_details();
        }
    }

    /// Whether the popup is open and its details are not for `track`, the
    /// file under the selection. Keyed on the path, so a reshuffle or a
    /// new directory under the same row still refreshes.
    pub fn details_stale(&self, track: Option<&Path>) -> bool {
        self.metadata_window && self.details_for.as_deref() != track
    }

    pub fn set_details(&mut self, track: Option<PathBuf>, details: Option<TrackDetails>) {
        self.details = details;
        self.details_for = track;
    }

    fn invalidate_details(&mut self) {
        self.details = None;
        self.details_for = None;
    }

    /// Open the directory prompt pre-filled with `initial`.
    pub fn open_prompt(&mut self, initial: String) {
        self.prompt = Some(initial);
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Close the prompt and return its trimmed input, `None` when blank.
    pub fn submit_prompt(&mut self) -> Option<String> {
        let input = self.prompt.take()?;
        let input = input.trim();
        (!input.is_empty()).then(|| input.to_string())
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }
}
