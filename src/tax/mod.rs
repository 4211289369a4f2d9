//! GST rates, per-line tax and interstate determination

pub mod gst;
pub mod line;
pub mod state;

pub use gst::*;
pub use line::*;
pub use state::*;
