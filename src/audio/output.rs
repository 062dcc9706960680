//! An output that may have failed to open.
//!
//! When no audio device is available the player still runs: the playlist,
//! directory loading and volume/mute all work, and every attempt to play
//! reports why there is no sound.

use std::path::Path;

use crate::error::DeviceError;

use super::types::OutputDevice;

pub enum Output<D> {
    Open(D),
    /// Device init failed; holds the reason.
    Unavailable(String),
}

impl<D> Output<D> {
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Self::Open(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }
}

impl<D: OutputDevice> OutputDevice for Output<D> {
    fn load(&mut self, path: &Path) -> Result<(), DeviceError> {
        match self {
            Self::Open(d) => d.load(path),
            Self::Unavailable(reason) => Err(DeviceError::Unavailable(reason.clone())),
        }
    }

    fn start(&mut self) {
        if let Self::Open(d) = self {
            d.start();
        }
    }

    fn pause(&mut self) {
        if let Self::Open(d) = self {
            d.pause();
        }
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        match self {
            Self::Open(d) => d.resume(),
            Self::Unavailable(reason) => Err(DeviceError::Unavailable(reason.clone())),
        }
    }

    fn stop(&mut self) {
        if let Self::Open(d) = self {
            d.stop();
        }
    }

    fn set_output_volume(&mut self, volume: f32) {
        if let Self::Open(d) = self {
            d.set_output_volume(volume);
        }
    }

    fn is_active(&self) -> bool {
        matches!(self, Self::Open(d) if d.is_active())
    }

    fn is_loaded(&self) -> bool {
        matches!(self, Self::Open(d) if d.is_loaded())
    }
}
