//! Track discovery: directory scanning and per-file details.

mod details;
mod model;
mod scan;

pub use details::details;
pub use model::{Catalog, Track, TrackDetails};
pub use scan::scan;
