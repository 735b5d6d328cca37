//! Terminal presentation helpers.

pub mod progress;
pub mod render;

pub use progress::DownloadBar;
pub use render::{render_availability, render_token_usage};
