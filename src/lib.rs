//! spindle: a local music player.
//!
//! Scans a directory for audio files, plays them in shuffled order, moves
//! on by itself when a track ends and remembers volume, directory and the
//! last played track between runs. The terminal front-end lives in
//! `runtime`, `app` and `ui`; everything else is the player core.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod player;
pub mod playlist;
pub mod runtime;
pub mod store;
pub mod ui;
