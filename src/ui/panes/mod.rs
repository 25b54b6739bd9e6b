//! TUI pane rendering modules
//!
//! - [`source`]: source code display with syntax highlighting
//! - [`output`]: run log or translated listing
//! - [`status`]: status bar with keybindings and the current sample
//!
//! Each pane module exports a `render_*` function that takes the frame, its
//! area, the data to draw and a mutable scroll offset it clamps in place.

pub mod output;
pub mod source;
pub mod status;

pub use output::render_output_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
