//! Playback engine and audio output.
//!
//! `PlaybackEngine` owns the Stopped/Playing/Paused state machine, the
//! logical volume and the mute flag, and drives any `OutputDevice`.
//! `RodioDevice` is the real output; `Output` wraps it so the player keeps
//! running when no device could be opened.

mod engine;
mod output;
mod sink;
mod types;

pub use engine::PlaybackEngine;
pub use output::Output;
pub use sink::RodioDevice;
pub use types::{OutputDevice, Toggle, Transport, VOLUME_STEP};

#[cfg(test)]
pub(crate) mod testing;
