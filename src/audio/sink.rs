//! `OutputDevice` backed by `rodio`.
//!
//! The `OutputStream` is not `Send` on every platform, so it lives on a
//! small keep-alive thread; the device only holds the stream's mixer and one
//! `Sink` per loaded track.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStreamBuilder, Sink};
use tracing::{debug, info};

use crate::error::DeviceError;

use super::types::OutputDevice;

struct StreamKeeper {
    shutdown: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl Drop for StreamKeeper {
    fn drop(&mut self) {
        // Disconnecting the channel lets the thread drop the stream and exit.
        self.shutdown.take();
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

pub struct RodioDevice {
    mixer: Mixer,
    sink: Option<Sink>,
    volume: f32,
    _stream: StreamKeeper,
}

impl RodioDevice {
    /// Open the default output device.
    pub fn open() -> Result<Self, DeviceError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Mixer, String>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStreamBuilder::open_default_stream() {
                Ok(mut stream) => {
                    // rodio logs to stderr when OutputStream is dropped; noisy for a TUI app.
                    stream.log_on_drop(false);
                    if ready_tx.send(Ok(stream.mixer().clone())).is_err() {
                        return;
                    }
                    // Park until the device is dropped.
                    let _ = shutdown_rx.recv();
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                }
            })
            .map_err(|e| DeviceError::Unavailable(e.to_string()))?;

        let mixer = match ready_rx.recv() {
            Ok(Ok(mixer)) => mixer,
            Ok(Err(reason)) => {
                let _ = join.join();
                return Err(DeviceError::Unavailable(reason));
            }
            Err(_) => {
                let _ = join.join();
                return Err(DeviceError::Unavailable(
                    "audio output thread exited".to_string(),
                ));
            }
        };

        info!("audio output opened");
        Ok(Self {
            mixer,
            sink: None,
            volume: 1.0,
            _stream: StreamKeeper {
                shutdown: Some(shutdown_tx),
                join: Some(join),
            },
        })
    }
}

impl OutputDevice for RodioDevice {
    fn load(&mut self, path: &Path) -> Result<(), DeviceError> {
        let file = File::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| DeviceError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(self.volume);
        sink.append(source);
        sink.pause();
        self.sink = Some(sink);
        debug!("loaded {}", path.display());
        Ok(())
    }

    fn start(&mut self) {
        if let Some(ref s) = self.sink {
            s.play();
        }
    }

    fn pause(&mut self) {
        if let Some(ref s) = self.sink {
            s.pause();
        }
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        match self.sink {
            Some(ref s) => {
                s.play();
                Ok(())
            }
            None => Err(DeviceError::NothingLoaded),
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn set_output_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(ref s) = self.sink {
            s.set_volume(volume);
        }
    }

    fn is_active(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn is_loaded(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }
}
