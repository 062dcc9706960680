//! Auto-advance: move to the next track when the current one runs out.
//!
//! The device offers no completion callback, so a background thread polls.
//! Each tick takes the player lock once and holds it across the check and
//! the follow-up `next` + `play`, so a user command can never slip in
//! between "the device went quiet" and "start the next track".

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{OutputDevice, Transport};
use crate::library::Track;

use super::{Player, Session};

/// One watcher tick. Returns the track that was started, if any.
///
/// A track counts as finished when one is loaded, the device is silent and
/// the transport still says Playing. Paused (user pause) and Stopped (user
/// stop) never advance.
pub fn advance_if_finished<D: OutputDevice>(session: &mut Session<D>) -> Option<Track> {
    let engine = &session.engine;
    let finished = engine.loaded_track().is_some()
        && !engine.is_playing()
        && engine.transport() == Transport::Playing;
    if !finished {
        return None;
    }

    let Some(next) = session.cursor.next().cloned() else {
        debug!("track finished with an empty playlist, stopping");
        session.engine.stop();
        return None;
    };

    match session.engine.play(next.clone()) {
        Ok(()) => {
            info!("auto-advanced to {}", next.name);
            Some(next)
        }
        Err(e) => {
            // Transport stays Playing, so the next tick tries the track after.
            warn!("auto-advance to {} failed: {e}", next.name);
            None
        }
    }
}

/// Handle to the background watcher thread. Dropping it stops the thread.
pub struct Watcher {
    stop: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl Watcher {
    pub fn spawn<D>(player: Player<D>, interval: Duration) -> io::Result<Self>
    where
        D: OutputDevice + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let join = thread::Builder::new()
            .name("auto-advance".to_string())
            .spawn(move || {
                debug!("auto-advance watcher started ({interval:?})");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let mut session = player.lock();
                            advance_if_finished(&mut session);
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("auto-advance watcher stopped");
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            join: Some(join),
        })
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.halt();
    }
}
