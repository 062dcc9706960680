//! Playlist cursor: natural order, play order and the current position.
//!
//! The play order is a permutation of indices into the natural order, so
//! shuffling can never add or drop tracks. `next`/`previous` walk the play
//! order and wrap around at both ends.

use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::debug;

use crate::error::CursorError;
use crate::library::Track;

/// The current track with its 1-based position in the play order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: Track,
    pub number: usize,
    pub total: usize,
}

#[derive(Debug, Default, Clone)]
pub struct PlaylistCursor {
    natural: Vec<Track>,
    order: Vec<usize>,
    position: usize,
}

impl PlaylistCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the natural order. The play order stays empty until
    /// `shuffle` or `restore_natural_order` is called.
    pub fn load(&mut self, tracks: Vec<Track>) {
        self.natural = tracks;
        self.order.clear();
        self.position = 0;
    }

    /// Shuffle with the thread-local RNG.
    pub fn shuffle(&mut self) -> Result<(), CursorError> {
        self.shuffle_with(&mut thread_rng())
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CursorError> {
        if self.natural.is_empty() {
            return Err(CursorError::Empty);
        }
        self.order = (0..self.natural.len()).collect();
        self.order.shuffle(rng);
        self.position = 0;
        debug!("shuffled {} tracks", self.order.len());
        Ok(())
    }

    /// Play in scan order. The current track, if any, stays current.
    pub fn restore_natural_order(&mut self) -> Result<(), CursorError> {
        if self.natural.is_empty() {
            return Err(CursorError::Empty);
        }
        let current = self.order.get(self.position).copied();
        self.order = (0..self.natural.len()).collect();
        self.position = current.unwrap_or(0);
        Ok(())
    }

    pub fn current(&self) -> Option<&Track> {
        self.order.get(self.position).map(|&i| &self.natural[i])
    }

    /// Advance one track, wrapping to the start after the last one.
    pub fn next(&mut self) -> Option<&Track> {
        if self.order.is_empty() {
            return None;
        }
        self.position = (self.position + 1) % self.order.len();
        self.current()
    }

    /// Step back one track, wrapping to the end before the first one.
    pub fn previous(&mut self) -> Option<&Track> {
        if self.order.is_empty() {
            return None;
        }
        self.position = match self.position {
            0 => self.order.len() - 1,
            p => p - 1,
        };
        self.current()
    }

    /// Make the track at `index` in the play order current.
    pub fn jump_to(&mut self, index: usize) -> Result<&Track, CursorError> {
        if index >= self.order.len() {
            return Err(CursorError::IndexOutOfRange {
                index,
                len: self.order.len(),
            });
        }
        self.position = index;
        Ok(&self.natural[self.order[index]])
    }

    /// Play-order index of the track at `path`.
    pub fn locate(&self, path: &Path) -> Option<usize> {
        self.order
            .iter()
            .position(|&i| self.natural[i].path.as_path() == path)
    }

    /// Number of distinct tracks, independent of the play order.
    pub fn size(&self) -> usize {
        self.natural.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current play-order index, `None` when nothing is queued.
    pub fn position(&self) -> Option<usize> {
        (!self.order.is_empty()).then_some(self.position)
    }

    pub fn natural(&self) -> &[Track] {
        &self.natural
    }

    pub fn play_order(&self) -> impl Iterator<Item = &Track> + '_ {
        self.order.iter().map(|&i| &self.natural[i])
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.current().map(|track| NowPlaying {
            track: track.clone(),
            number: self.position + 1,
            total: self.order.len(),
        })
    }
}

#[cfg(test)]
mod tests;
