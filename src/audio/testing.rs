//! In-memory `OutputDevice` for tests.
//!
//! Clones share state, so a test can keep one handle while the engine owns
//! another and simulate a track running out with `finish_track`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::DeviceError;

use super::types::OutputDevice;

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub loaded: Option<PathBuf>,
    pub active: bool,
    pub volume: f32,
    pub loads: Vec<PathBuf>,
    pub unsupported: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeDevice {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Simulate the loaded source running out of audio.
    pub fn finish_track(&self) {
        let mut s = self.state();
        s.active = false;
        s.loaded = None;
    }

    pub fn reject(&self, path: &Path) {
        self.state().unsupported.push(path.to_path_buf());
    }

    pub fn loads(&self) -> Vec<PathBuf> {
        self.state().loads.clone()
    }

    pub fn output_volume(&self) -> f32 {
        self.state().volume
    }
}

impl OutputDevice for FakeDevice {
    fn load(&mut self, path: &Path) -> Result<(), DeviceError> {
        let mut s = self.state();
        if s.unsupported.iter().any(|p| p == path) {
            return Err(DeviceError::Decode {
                path: path.to_path_buf(),
                reason: "unrecognized format".to_string(),
            });
        }
        s.loaded = Some(path.to_path_buf());
        s.active = false;
        s.loads.push(path.to_path_buf());
        Ok(())
    }

    fn start(&mut self) {
        let mut s = self.state();
        s.active = s.loaded.is_some();
    }

    fn pause(&mut self) {
        self.state().active = false;
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        let mut s = self.state();
        if s.loaded.is_none() {
            return Err(DeviceError::NothingLoaded);
        }
        s.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        let mut s = self.state();
        s.active = false;
        s.loaded = None;
    }

    fn set_output_volume(&mut self, volume: f32) {
        self.state().volume = volume;
    }

    fn is_active(&self) -> bool {
        self.state().active
    }

    fn is_loaded(&self) -> bool {
        self.state().loaded.is_some()
    }
}
