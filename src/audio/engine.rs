//! Single-track playback state machine.

use tracing::{debug, info, warn};

use crate::error::{DeviceError, PlaybackError};
use crate::library::Track;

use super::types::{OutputDevice, Toggle, Transport};

pub struct PlaybackEngine<D> {
    device: D,
    loaded: Option<Track>,
    transport: Transport,
    volume: f32,
    muted: bool,
    saved_volume: f32,
}

impl<D: OutputDevice> PlaybackEngine<D> {
    pub fn new(mut device: D, volume: f32) -> Self {
        let volume = clamp_volume(volume).unwrap_or(0.5);
        device.set_output_volume(volume);
        info!("playback engine ready, volume {volume:.2}");
        Self {
            device,
            loaded: None,
            transport: Transport::Stopped,
            volume,
            muted: false,
            saved_volume: volume,
        }
    }

    /// Load `track` and start it, replacing whatever was playing.
    ///
    /// On failure nothing changes: the previous track (if any) keeps its
    /// state.
    pub fn play(&mut self, track: Track) -> Result<(), PlaybackError> {
        if !track.path.is_file() {
            warn!("file not found: {}", track.path.display());
            return Err(PlaybackError::FileMissing(track.path));
        }

        if let Err(e) = self.device.load(&track.path) {
            warn!("cannot play {}: {e}", track.path.display());
            return Err(match e {
                DeviceError::Decode { path, reason } => {
                    PlaybackError::UnsupportedFormat { path, reason }
                }
                DeviceError::Open { path, source }
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    PlaybackError::FileMissing(path)
                }
                other => PlaybackError::Device(other),
            });
        }

        self.device.set_output_volume(self.effective_volume());
        self.device.start();
        info!("playing: {}", track.name);
        self.loaded = Some(track);
        self.transport = Transport::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.transport != Transport::Playing {
            return Err(PlaybackError::NotPlaying);
        }
        self.device.pause();
        self.transport = Transport::Paused;
        info!("playback paused");
        Ok(())
    }

    pub fn unpause(&mut self) -> Result<(), PlaybackError> {
        if !self.device.is_loaded() {
            debug!("cannot unpause: nothing loaded");
            return Err(PlaybackError::NothingLoaded);
        }
        self.device.resume()?;
        self.transport = Transport::Playing;
        info!("playback resumed");
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) -> Toggle {
        if self.is_playing() {
            return match self.pause() {
                Ok(()) => Toggle::Paused,
                Err(_) => Toggle::NoTrack,
            };
        }

        let Some(track) = self.loaded.clone() else {
            return Toggle::NoTrack;
        };

        if self.device.is_loaded() {
            return match self.unpause() {
                Ok(()) => Toggle::Playing,
                Err(_) => Toggle::NoTrack,
            };
        }

        // Stopped or ran out: start the loaded track again.
        match self.play(track) {
            Ok(()) => Toggle::Playing,
            Err(_) => Toggle::NoTrack,
        }
    }

    /// Halt output. The loaded track is remembered.
    pub fn stop(&mut self) {
        self.device.stop();
        self.transport = Transport::Stopped;
        info!("playback stopped");
    }

    /// Whether the device is producing sound right now.
    pub fn is_playing(&self) -> bool {
        self.device.is_active()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn loaded_track(&self) -> Option<&Track> {
        self.loaded.as_ref()
    }

    /// Store `volume` clamped to `[0, 1]` and return the stored value.
    ///
    /// While muted the new value becomes the one restored on unmute. NaN is
    /// ignored.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let Some(volume) = clamp_volume(volume) else {
            return self.volume;
        };
        self.volume = volume;
        if self.muted {
            self.saved_volume = volume;
        } else {
            self.device.set_output_volume(volume);
            debug!("volume set to {volume:.2}");
        }
        self.volume
    }

    pub fn increase_volume(&mut self, step: f32) -> f32 {
        self.set_volume(self.volume + step)
    }

    pub fn decrease_volume(&mut self, step: f32) -> f32 {
        self.set_volume(self.volume - step)
    }

    /// Flip mute and return the new muted flag.
    pub fn toggle_mute(&mut self) -> bool {
        if self.muted {
            self.device.set_output_volume(self.saved_volume);
            self.volume = self.saved_volume;
            self.muted = false;
            info!("audio unmuted, volume restored to {:.2}", self.saved_volume);
        } else {
            self.saved_volume = self.volume;
            self.device.set_output_volume(0.0);
            self.muted = true;
            info!("audio muted");
        }
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

fn clamp_volume(v: f32) -> Option<f32> {
    (!v.is_nan()).then(|| v.clamp(0.0, 1.0))
}
