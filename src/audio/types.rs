//! Small playback-related types shared by the engine and front-ends.

use std::path::Path;

use crate::error::DeviceError;

/// Transport state of the playback engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What `toggle_play_pause` ended up doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    Paused,
    Playing,
    NoTrack,
}

/// Default step for `increase_volume` / `decrease_volume`.
pub const VOLUME_STEP: f32 = 0.05;

/// The minimal contract the playback engine drives.
///
/// Implementations must return promptly; `is_active` is the source of truth
/// for "is sound coming out right now" and turns false on its own when a
/// track runs out.
pub trait OutputDevice: Send {
    /// Replace whatever is loaded with `path`, left paused.
    fn load(&mut self, path: &Path) -> Result<(), DeviceError>;
    fn start(&mut self);
    fn pause(&mut self);
    fn resume(&mut self) -> Result<(), DeviceError>;
    /// Halt output and drop the loaded source.
    fn stop(&mut self);
    fn set_output_volume(&mut self, volume: f32);
    fn is_active(&self) -> bool;
    /// True while a source with remaining audio is loaded.
    fn is_loaded(&self) -> bool;
}
