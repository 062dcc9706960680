//! Application module: the view model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds the list selection, popups, the
//! directory prompt and the status message.

mod model;

pub use model::*;
